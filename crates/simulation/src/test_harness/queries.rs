//! Query and simulation-tick methods for `TestGarden`.

use bevy::prelude::*;

use crate::crops::{Crop, HarvestTally};
use crate::grid_frame::{CellCoord, GridFrame};
use crate::interaction::DragState;
use crate::invariant_checks::GridInvariantViolations;
use crate::inventory::{Inventory, ItemCountChanged, ItemStock, PlaceableType};
use crate::observation::{build_observation, GardenObservation};
use crate::outcome_log::{Outcome, OutcomeLog};
use crate::tile_grid::TileGrid;
use crate::tiles::{PlantSlot, Tile};
use crate::TickCounter;

use super::TestGarden;

impl TestGarden {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system entirely, so every tick
    /// advances crops and rotation by exactly one fixed timestep.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
            std::thread::yield_now();
        }
    }

    /// Number of ticks covering `seconds` of simulated time, rounded up.
    pub fn ticks_for(&self, seconds: f32) -> u32 {
        let dt = self.world().resource::<Time<Fixed>>().timestep().as_secs_f32();
        (seconds / dt).ceil() as u32
    }

    // -----------------------------------------------------------------------
    // Queries (note: Bevy's World::query() requires &mut World)
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn grid(&self) -> &TileGrid {
        self.world().resource::<TileGrid>()
    }

    /// `None` when the frame was rejected at startup.
    pub fn frame(&self) -> Option<&GridFrame> {
        self.world().get_resource::<GridFrame>()
    }

    /// World position of the center of `cell` at ground level.
    pub fn cell_center(&self, cell: CellCoord) -> Vec3 {
        self.frame()
            .map(|frame| frame.cell_center_world(cell, 0).translation)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn height_at(&self, cell: CellCoord) -> usize {
        self.grid().height_at(cell)
    }

    pub fn stack_at(&self, cell: CellCoord) -> Vec<Entity> {
        self.grid()
            .stack(cell)
            .map(|stack| stack.as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn top_of(&self, cell: CellCoord) -> Option<Entity> {
        self.grid().top_of(cell)
    }

    pub fn stock(&self, kind: PlaceableType) -> u32 {
        self.world().resource::<Inventory>().count(kind)
    }

    pub fn drag_state(&self) -> DragState {
        *self.world().resource::<DragState>()
    }

    pub fn outcomes(&self) -> &OutcomeLog {
        self.world().resource::<OutcomeLog>()
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.outcomes().last()
    }

    pub fn harvest_tally(&self) -> &HarvestTally {
        self.world().resource::<HarvestTally>()
    }

    pub fn violations(&self) -> &GridInvariantViolations {
        self.world().resource::<GridInvariantViolations>()
    }

    pub fn tick_count(&self) -> u64 {
        self.world().resource::<TickCounter>().0
    }

    pub fn observe(&self) -> GardenObservation {
        build_observation(self.world())
    }

    /// Every `ItemCountChanged` sent so far. Event buffers are never swapped
    /// because the harness only runs `FixedUpdate`.
    pub fn item_changes(&self) -> Vec<ItemCountChanged> {
        self.world()
            .resource::<Events<ItemCountChanged>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    pub fn exists(&self, entity: Entity) -> bool {
        self.world().entities().contains(entity)
    }

    pub fn transform_of(&self, entity: Entity) -> Option<Transform> {
        self.world().get::<Transform>(entity).copied()
    }

    pub fn tile(&self, entity: Entity) -> Option<&Tile> {
        self.world().get::<Tile>(entity)
    }

    pub fn slot(&self, entity: Entity) -> Option<&PlantSlot> {
        self.world().get::<PlantSlot>(entity)
    }

    pub fn crop(&self, entity: Entity) -> Option<&Crop> {
        self.world().get::<Crop>(entity)
    }

    /// The crop planted on `tile`, if any.
    pub fn crop_on(&self, tile: Entity) -> Option<Entity> {
        self.slot(tile).and_then(PlantSlot::crop)
    }

    pub fn tile_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<Tile>>()
            .iter(world)
            .count()
    }

    pub fn crop_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<Crop>>()
            .iter(world)
            .count()
    }
}
