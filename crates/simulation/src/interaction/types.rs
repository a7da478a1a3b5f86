use bevy::prelude::*;

use crate::inventory::PlaceableType;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Tile(Entity),
    Crop(Entity),
    /// An inventory slot; dragging from it spawns a new tile or crop.
    Spawner(PlaceableType),
    Nothing,
}

/// Discrete pointer input. Positions are world-space points already projected
/// onto the grid by the host; `time` is in seconds.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        pos: Vec3,
        time: f32,
    },
    Move {
        pos: Vec3,
    },
    Up {
        pos: Vec3,
    },
    /// Abandon the current drag without placing anything.
    Cancel,
}

/// Current drag, if any.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down on a tile but has not moved yet. `origin` is the
    /// transform to restore on cancel.
    Selected { tile: Entity, origin: Transform },
    Dragging { tile: Entity, origin: Transform },
    /// A preview entity dragged out of the inventory. `transform` is its
    /// current snapped pose; the entity may not be materialised yet.
    Spawning {
        preview: Entity,
        kind: PlaceableType,
        transform: Transform,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    /// The tile or preview currently held by the pointer.
    pub fn held(&self) -> Option<Entity> {
        match self {
            DragState::Idle => None,
            DragState::Selected { tile, .. } | DragState::Dragging { tile, .. } => Some(*tile),
            DragState::Spawning { preview, .. } => Some(*preview),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Selected { .. } => "selected",
            DragState::Dragging { .. } => "dragging",
            DragState::Spawning { .. } => "spawning",
        }
    }
}
