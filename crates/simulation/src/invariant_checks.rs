//! Runtime occupancy guards.
//!
//! After every tick the grid is checked for broken invariants: over-cap
//! stacks, tiles in two places, a reverse map out of sync, tracked entities
//! that were despawned, and plant slots whose crop does not point back.
//! Violations are logged and counted; nothing is repaired here.

use bevy::prelude::*;

use crate::crops::Crop;
use crate::simulation_sets::SimulationSet;
use crate::tile_grid::TileGrid;
use crate::tiles::{PlantSlot, Tile};

/// Number of violations found by the last pass, plus a running total. Used by
/// integration tests and the observation snapshot.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct GridInvariantViolations {
    pub occupancy: u32,
    pub missing_tiles: u32,
    pub crop_links: u32,
    pub total: u64,
}

impl GridInvariantViolations {
    pub fn last_pass(&self) -> u32 {
        self.occupancy + self.missing_tiles + self.crop_links
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

pub fn validate_occupancy(
    grid: Res<TileGrid>,
    tiles: Query<(), With<Tile>>,
    mut violations: ResMut<GridInvariantViolations>,
) {
    violations.occupancy = 0;
    violations.missing_tiles = 0;

    for violation in grid.check_invariants() {
        warn!("Invariant violation: {:?}", violation);
        violations.occupancy += 1;
    }

    for (cell, stack) in grid.snapshot() {
        for tile in stack {
            // Despawns are deferred, so a tile discarded this tick is gone by
            // now and must not be tracked any more.
            if !tiles.contains(tile) {
                warn!("Invariant violation: {:?} tracked at {} no longer exists", tile, cell);
                violations.missing_tiles += 1;
            }
        }
    }

    let found = violations.occupancy + violations.missing_tiles;
    violations.total += u64::from(found);
}

pub fn validate_crop_links(
    slots: Query<(Entity, &PlantSlot)>,
    crops: Query<(Entity, &Crop)>,
    mut violations: ResMut<GridInvariantViolations>,
) {
    violations.crop_links = 0;

    for (tile, slot) in &slots {
        let Some(crop_entity) = slot.crop() else {
            continue;
        };
        // A freshly planted crop is spawned through commands and may not
        // exist yet if this runs in the same command batch.
        if let Ok((_, crop)) = crops.get(crop_entity) {
            if crop.parent_tile != Some(tile) {
                warn!(
                    "Invariant violation: {:?} holds {:?} but the crop points at {:?}",
                    tile, crop_entity, crop.parent_tile
                );
                violations.crop_links += 1;
            }
        }
    }

    for (crop_entity, crop) in &crops {
        let Some(tile) = crop.parent_tile else {
            continue;
        };
        let linked = slots
            .get(tile)
            .is_ok_and(|(_, slot)| slot.crop() == Some(crop_entity));
        if !linked {
            warn!(
                "Invariant violation: crop {:?} points at {:?} which does not hold it",
                crop_entity, tile
            );
            violations.crop_links += 1;
        }
    }

    violations.total += u64::from(violations.crop_links);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct InvariantChecksPlugin;

impl Plugin for InvariantChecksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridInvariantViolations>().add_systems(
            FixedUpdate,
            (validate_occupancy, validate_crop_links)
                .chain()
                .in_set(SimulationSet::PostSim),
        );
    }
}
