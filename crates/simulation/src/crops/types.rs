use bevy::prelude::*;
use serde::Serialize;

use crate::inventory::PlaceableType;

// =============================================================================
// Crop component
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrowthState {
    Seedling,
    Mature,
}

/// A crop growing on a land tile.
///
/// `parent_tile` is a non-owning handle to the tile whose
/// [`crate::tiles::PlantSlot`] points back at this crop. It is cleared on
/// harvest.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Crop {
    pub kind: PlaceableType,
    pub growth_time: f32,
    pub value: u32,
    pub parent_tile: Option<Entity>,
    timer: f32,
    state: GrowthState,
}

impl Crop {
    pub fn new(kind: PlaceableType, growth_time: f32, value: u32, parent_tile: Entity) -> Self {
        Self {
            kind,
            growth_time,
            value,
            parent_tile: Some(parent_tile),
            timer: 0.0,
            state: GrowthState::Seedling,
        }
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    pub fn is_mature(&self) -> bool {
        self.state == GrowthState::Mature
    }

    /// Seconds grown so far. Resets to zero on maturing.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Advance the growth timer. Returns true on the tick the crop matures.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state == GrowthState::Mature {
            return false;
        }
        self.timer += dt;
        if self.timer >= self.growth_time {
            self.state = GrowthState::Mature;
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Marker for a crop being dragged out of the inventory. It never grows and
/// is always despawned on release.
#[derive(Component, Debug, Clone, Copy)]
pub struct CropPreview {
    pub kind: PlaceableType,
}

// =============================================================================
// Harvest bookkeeping
// =============================================================================

/// Running total of harvested crop value.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestTally {
    pub total: u64,
    pub harvested: u32,
}

impl HarvestTally {
    pub fn record(&mut self, value: u32) {
        self.total += u64::from(value);
        self.harvested += 1;
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropMatured {
    pub crop: Entity,
    pub kind: PlaceableType,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropHarvested {
    pub crop: Entity,
    pub kind: PlaceableType,
    pub value: u32,
}
