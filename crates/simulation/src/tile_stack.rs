//! Ordered tiles occupying one cell. Index is the height level, the last
//! entry is the top tile.

use bevy::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileStack {
    tiles: Vec<Entity>,
}

impl TileStack {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn top(&self) -> Option<Entity> {
        self.tiles.last().copied()
    }

    /// Height level of `tile` within this stack.
    pub fn level_of(&self, tile: Entity) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }

    pub(crate) fn push(&mut self, tile: Entity) {
        self.tiles.push(tile);
    }

    /// Remove `tile`, shifting the tiles above it down one level.
    pub(crate) fn remove(&mut self, tile: Entity) -> bool {
        match self.level_of(tile) {
            Some(idx) => {
                self.tiles.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Bottom-to-top.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.tiles.iter().copied()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_order_is_height_order() {
        let (a, b, c) = (Entity::from_raw(1), Entity::from_raw(2), Entity::from_raw(3));
        let mut stack = TileStack::default();
        stack.push(a);
        stack.push(b);
        stack.push(c);
        assert_eq!(stack.top(), Some(c));
        assert_eq!(stack.level_of(b), Some(1));
        assert!(stack.remove(b));
        assert_eq!(stack.level_of(c), Some(1));
        assert!(!stack.remove(b));
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec![a, c]);
    }
}
