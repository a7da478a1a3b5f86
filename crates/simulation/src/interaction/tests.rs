#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::interaction::types::DragState;
    use crate::inventory::PlaceableType;

    #[test]
    fn default_drag_state_is_idle() {
        let state = DragState::default();
        assert!(state.is_idle());
        assert_eq!(state.held(), None);
        assert_eq!(state.label(), "idle");
    }

    #[test]
    fn held_entity_follows_state() {
        let tile = Entity::from_raw(4);
        let dragging = DragState::Dragging {
            tile,
            origin: Transform::IDENTITY,
        };
        assert_eq!(dragging.held(), Some(tile));

        let preview = Entity::from_raw(9);
        let spawning = DragState::Spawning {
            preview,
            kind: PlaceableType::Corn,
            transform: Transform::IDENTITY,
        };
        assert_eq!(spawning.held(), Some(preview));
        assert_eq!(spawning.label(), "spawning");
    }
}
