use bevy::prelude::*;

pub mod agent_protocol;
pub mod config;
pub mod crops;
pub mod errors;
pub mod game_params;
pub mod grid_frame;
pub mod grid_rotation;
pub mod interaction;
pub mod interaction_mode;
pub mod invariant_checks;
pub mod inventory;
pub mod observation;
pub mod outcome_log;
pub mod placement;
pub mod simulation_sets;
pub mod spawner;
pub mod tile_grid;
pub mod tile_stack;
pub mod tiles;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use game_params::GridParams;
use grid_frame::GridFrame;
use outcome_log::OutcomeLog;
use simulation_sets::SimulationSet;
use spawner::SpawnTemplates;
use tile_grid::TileGrid;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

/// Build the grid frame from the configured footprint. A degenerate footprint
/// leaves the frame out, which keeps every placement system from running.
fn init_grid_frame(app: &mut App, params: &GridParams) {
    match GridFrame::from_footprint(params.origin(), Quat::IDENTITY, params.footprint()) {
        Ok(frame) => {
            info!(
                "Grid frame ready: cell {} x {}, cap {} tiles",
                frame.planar_size(),
                frame.stack_height(),
                params.max_stack_height
            );
            app.insert_resource(frame);
        }
        Err(err) => {
            error!("Grid placement disabled: {}", err);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// All grid logic. Insert a [`GridParams`] before adding the plugin to
/// override the defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let params = match app.world().get_resource::<GridParams>() {
            Some(params) => params.clone(),
            None => {
                let params = GridParams::default();
                app.insert_resource(params.clone());
                params
            }
        };

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        init_grid_frame(app, &params);
        app.insert_resource(TileGrid::new(params.max_stack_height))
            .insert_resource(SpawnTemplates::from_params(&params))
            .init_resource::<TickCounter>()
            .init_resource::<OutcomeLog>()
            .add_systems(FixedUpdate, tick_counter.in_set(SimulationSet::PostSim));

        app.add_plugins((
            inventory::InventoryPlugin,
            interaction::InteractionPlugin,
            grid_rotation::GridRotationPlugin,
            crops::CropsPlugin,
            invariant_checks::InvariantChecksPlugin,
        ));
    }
}
