use bevy::prelude::*;

use crate::config::CROP_PLANT_OFFSET;
use crate::errors::GridError;
use crate::game_params::CropEntry;
use crate::simulation_sets::SimulationSet;
use crate::tiles::{GridAnchored, PlantSlot, Tile};

use super::types::{Crop, CropHarvested, CropMatured, HarvestTally};

// =============================================================================
// Planting and harvest
// =============================================================================

/// Plant a crop from `entry` on `tile`, just above its surface.
///
/// Fails without spawning anything when the terrain is not plantable or the
/// slot is taken. On success both sides of the relation are set: the slot
/// points at the new crop and the crop at `tile_entity`.
pub fn try_plant_crop(
    commands: &mut Commands,
    tile_entity: Entity,
    tile: &Tile,
    slot: &mut PlantSlot,
    tile_transform: &Transform,
    entry: &CropEntry,
) -> Result<Entity, GridError> {
    slot.check_plantable(tile.terrain)?;

    let translation = tile_transform.translation + tile_transform.up() * CROP_PLANT_OFFSET;
    let crop = commands
        .spawn((
            Crop::new(entry.kind, entry.growth_time, entry.value, tile_entity),
            Transform::from_translation(translation).with_rotation(tile_transform.rotation),
            GridAnchored,
            Name::new(format!("{:?} crop", entry.kind)),
        ))
        .id();
    slot.try_occupy(tile.terrain, crop)?;
    Ok(crop)
}

/// Harvest a mature crop: free the parent slot and add its value to the
/// tally. The caller despawns the crop entity.
pub fn harvest(
    crop: &mut Crop,
    parent_slot: Option<&mut PlantSlot>,
    tally: &mut HarvestTally,
) -> Result<u32, GridError> {
    if !crop.is_mature() {
        return Err(GridError::CropNotMature);
    }
    if let Some(slot) = parent_slot {
        slot.clear();
    }
    crop.parent_tile = None;
    tally.record(crop.value);
    Ok(crop.value)
}

// =============================================================================
// Systems
// =============================================================================

/// Advance every growing crop by one fixed timestep.
pub fn grow_crops(
    time: Res<Time<Fixed>>,
    mut crops: Query<(Entity, &mut Crop)>,
    mut matured: EventWriter<CropMatured>,
) {
    let dt = time.timestep().as_secs_f32();
    for (entity, mut crop) in &mut crops {
        if crop.is_mature() {
            continue;
        }
        if crop.advance(dt) {
            debug!("{:?} crop {:?} is mature", crop.kind, entity);
            matured.send(CropMatured {
                crop: entity,
                kind: crop.kind,
            });
        }
    }
}

pub struct CropsPlugin;

impl Plugin for CropsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HarvestTally>()
            .add_event::<CropMatured>()
            .add_event::<CropHarvested>()
            .add_systems(FixedUpdate, grow_crops.in_set(SimulationSet::Simulation));
    }
}
