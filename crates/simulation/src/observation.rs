//! Serializable snapshot of the garden for hosts.
//!
//! [`build_observation`] reads the grid, frame, inventory and a few
//! bookkeeping resources straight from the `World` and flattens them into
//! plain data, so the host protocol never hands out ECS types.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::Serialize;

use crate::crops::{Crop, GrowthState, HarvestTally};
use crate::grid_frame::{CellCoord, GridFrame};
use crate::grid_rotation::RotationDrive;
use crate::interaction::DragState;
use crate::interaction_mode::InteractionMode;
use crate::invariant_checks::GridInvariantViolations;
use crate::inventory::{Inventory, PlaceableType};
use crate::outcome_log::{Outcome, OutcomeLog};
use crate::tile_grid::TileGrid;
use crate::tiles::{PlantSlot, TerrainKind, Tile};
use crate::TickCounter;

/// How many recent outcomes an observation carries.
const RECENT_OUTCOMES: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub origin: [f32; 3],
    pub yaw_degrees: f32,
    pub planar_size: f32,
    pub stack_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropSnapshot {
    pub entity: u64,
    pub kind: PlaceableType,
    pub state: GrowthState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSnapshot {
    pub entity: u64,
    pub terrain: Option<TerrainKind>,
    pub position: [f32; 3],
    pub crop: Option<CropSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackSnapshot {
    pub cell: CellCoord,
    /// Bottom-to-top.
    pub tiles: Vec<TileSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GardenObservation {
    pub tick: u64,
    /// `None` when the frame failed to build.
    pub frame: Option<FrameSnapshot>,
    pub stacks: Vec<StackSnapshot>,
    pub inventory: BTreeMap<PlaceableType, u32>,
    pub harvest_total: u64,
    pub preview_mode: bool,
    pub drag: String,
    pub invariant_violations: u64,
    pub recent_outcomes: Vec<Outcome>,
}

fn crop_snapshot(world: &World, slot: Option<&PlantSlot>) -> Option<CropSnapshot> {
    let entity = slot?.crop()?;
    let crop = world.get::<Crop>(entity)?;
    Some(CropSnapshot {
        entity: entity.to_bits(),
        kind: crop.kind,
        state: crop.state(),
    })
}

fn tile_snapshot(world: &World, entity: Entity) -> TileSnapshot {
    let position = world
        .get::<Transform>(entity)
        .map(|t| t.translation.to_array())
        .unwrap_or_default();
    TileSnapshot {
        entity: entity.to_bits(),
        terrain: world.get::<Tile>(entity).map(|t| t.terrain),
        position,
        crop: crop_snapshot(world, world.get::<PlantSlot>(entity)),
    }
}

pub fn build_observation(world: &World) -> GardenObservation {
    let frame = world.get_resource::<GridFrame>().map(|frame| FrameSnapshot {
        origin: frame.origin().to_array(),
        yaw_degrees: world
            .get_resource::<RotationDrive>()
            .map_or(0.0, |d| d.yaw_degrees),
        planar_size: frame.planar_size(),
        stack_height: frame.stack_height(),
    });

    let stacks = world
        .get_resource::<TileGrid>()
        .map(|grid| {
            grid.snapshot()
                .into_iter()
                .map(|(cell, tiles)| StackSnapshot {
                    cell,
                    tiles: tiles.into_iter().map(|e| tile_snapshot(world, e)).collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    GardenObservation {
        tick: world.get_resource::<TickCounter>().map_or(0, |t| t.0),
        frame,
        stacks,
        inventory: world
            .get_resource::<Inventory>()
            .map(|inv| inv.counts().clone())
            .unwrap_or_default(),
        harvest_total: world
            .get_resource::<HarvestTally>()
            .map_or(0, |t| t.total),
        preview_mode: world
            .get_resource::<InteractionMode>()
            .is_some_and(|m| m.is_preview()),
        drag: world
            .get_resource::<DragState>()
            .map_or("idle", DragState::label)
            .to_string(),
        invariant_violations: world
            .get_resource::<GridInvariantViolations>()
            .map_or(0, |v| v.total),
        recent_outcomes: world
            .get_resource::<OutcomeLog>()
            .map(|log| log.last_n(RECENT_OUTCOMES).to_vec())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_world_gives_default_observation() {
        let world = World::new();
        let obs = build_observation(&world);
        assert_eq!(obs.tick, 0);
        assert!(obs.frame.is_none());
        assert!(obs.stacks.is_empty());
        assert_eq!(obs.drag, "idle");
    }

    #[test]
    fn observation_serializes_inventory_by_kind() {
        let mut world = World::new();
        world.insert_resource(Inventory::from_params(
            &crate::game_params::GridParams::default(),
        ));
        let json = serde_json::to_value(build_observation(&world)).unwrap();
        assert_eq!(json["inventory"]["Land"], 20);
    }
}
