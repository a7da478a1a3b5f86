//! Occupancy index: which tiles sit in which cell, in what order.
//!
//! [`TileGrid`] is the only owner of occupancy state. It keeps the per-cell
//! stacks plus a reverse `tile -> cell` map so removal and top-tile checks do
//! not have to scan every stack. Empty stacks are dropped, so an absent entry
//! always means an empty cell.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::DEFAULT_MAX_STACK_HEIGHT;
use crate::errors::GridError;
use crate::grid_frame::{CellCoord, GridFrame};
use crate::tile_stack::TileStack;

/// A broken occupancy invariant, reported by [`TileGrid::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccupancyViolation {
    OverCap { cell: CellCoord, len: usize, max: usize },
    /// The tile is listed in more than one stack or twice in one stack.
    DuplicateTile { tile: Entity },
    /// The reverse map disagrees with the stacks.
    MembershipMismatch { tile: Entity },
    /// An empty stack was left behind.
    EmptyStack { cell: CellCoord },
}

#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    stacks: HashMap<CellCoord, TileStack>,
    membership: HashMap<Entity, CellCoord>,
    max_stack_height: usize,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK_HEIGHT)
    }
}

impl TileGrid {
    pub fn new(max_stack_height: usize) -> Self {
        Self {
            stacks: HashMap::new(),
            membership: HashMap::new(),
            max_stack_height,
        }
    }

    pub fn max_stack_height(&self) -> usize {
        self.max_stack_height
    }

    pub fn height_at(&self, cell: CellCoord) -> usize {
        self.stacks.get(&cell).map_or(0, TileStack::len)
    }

    /// True when `tile` is the last entry of its stack. An untracked tile
    /// (for example a spawn preview) also counts as top.
    pub fn is_top(&self, tile: Entity) -> bool {
        match self.membership.get(&tile) {
            Some(cell) => self.top_of(*cell) == Some(tile),
            None => true,
        }
    }

    pub fn is_tracked(&self, tile: Entity) -> bool {
        self.membership.contains_key(&tile)
    }

    pub fn cell_of(&self, tile: Entity) -> Option<CellCoord> {
        self.membership.get(&tile).copied()
    }

    pub fn level_of(&self, tile: Entity) -> Option<usize> {
        let cell = self.membership.get(&tile)?;
        self.stacks.get(cell)?.level_of(tile)
    }

    pub fn top_of(&self, cell: CellCoord) -> Option<Entity> {
        self.stacks.get(&cell).and_then(TileStack::top)
    }

    pub fn stack(&self, cell: CellCoord) -> Option<&TileStack> {
        self.stacks.get(&cell)
    }

    pub fn tracked_count(&self) -> usize {
        self.membership.len()
    }

    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    /// Occupied cells in ascending order.
    pub fn cells_sorted(&self) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = self.stacks.keys().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Remove `tile` wherever it is. Returns the cell it left, or `None` if
    /// it was not tracked.
    pub fn remove_from_grid(&mut self, tile: Entity) -> Option<CellCoord> {
        let cell = self.membership.remove(&tile)?;
        if let Some(stack) = self.stacks.get_mut(&cell) {
            stack.remove(tile);
            if stack.is_empty() {
                self.stacks.remove(&cell);
            }
        }
        Some(cell)
    }

    /// Put `tile` on top of the stack at `cell` and return its height level.
    ///
    /// The tile is always removed from the grid first, so placing a tracked
    /// top tile again is idempotent. A tile further down the stack is lifted
    /// to the top instead. When `transform` is given it is moved to the
    /// cell's slot and aligned with the frame. On overflow the tile is left
    /// untracked and the caller must discard it.
    pub fn place(
        &mut self,
        frame: &GridFrame,
        tile: Entity,
        cell: CellCoord,
        transform: Option<&mut Transform>,
    ) -> Result<usize, GridError> {
        self.remove_from_grid(tile);

        let level = self.height_at(cell);
        if level >= self.max_stack_height {
            return Err(GridError::StackOverflow {
                cell,
                max: self.max_stack_height,
            });
        }

        if let Some(transform) = transform {
            let target = frame.cell_center_world(cell, level);
            transform.translation = target.translation;
            transform.rotation = target.rotation;
        }

        self.stacks.entry(cell).or_default().push(tile);
        self.membership.insert(tile, cell);
        Ok(level)
    }

    /// Every tracked tile, grouped by cell in ascending cell order, each group
    /// bottom-to-top.
    pub fn snapshot(&self) -> Vec<(CellCoord, Vec<Entity>)> {
        self.cells_sorted()
            .into_iter()
            .filter_map(|cell| {
                self.stacks
                    .get(&cell)
                    .map(|stack| (cell, stack.as_slice().to_vec()))
            })
            .collect()
    }

    pub fn check_invariants(&self) -> Vec<OccupancyViolation> {
        let mut violations = Vec::new();
        let mut seen: HashMap<Entity, CellCoord> = HashMap::new();

        for cell in self.cells_sorted() {
            let Some(stack) = self.stacks.get(&cell) else {
                continue;
            };
            if stack.is_empty() {
                violations.push(OccupancyViolation::EmptyStack { cell });
            }
            if stack.len() > self.max_stack_height {
                violations.push(OccupancyViolation::OverCap {
                    cell,
                    len: stack.len(),
                    max: self.max_stack_height,
                });
            }
            for tile in stack.iter() {
                if seen.insert(tile, cell).is_some() {
                    violations.push(OccupancyViolation::DuplicateTile { tile });
                }
                if self.membership.get(&tile) != Some(&cell) {
                    violations.push(OccupancyViolation::MembershipMismatch { tile });
                }
            }
        }

        for tile in self.membership.keys() {
            if !seen.contains_key(tile) {
                violations.push(OccupancyViolation::MembershipMismatch { tile: *tile });
            }
        }

        violations
    }
}
