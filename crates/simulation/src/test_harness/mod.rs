//! # TestGarden - headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running grid scenarios without a window or renderer. Input goes in as
//! the same pointer and rotation events a host would send; state comes out
//! through the query and assertion helpers.

mod assertions;
mod input;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::game_params::GridParams;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
pub struct TestGarden {
    app: App,
}

impl Default for TestGarden {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGarden {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Empty grid with default parameters: 1 x 0.5 cells, cap of 10.
    pub fn new() -> Self {
        Self::with_params(GridParams::default())
    }

    /// Empty grid with custom parameters. A degenerate footprint yields a
    /// garden without a `GridFrame`, in which placement never runs.
    pub fn with_params(params: GridParams) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // Params must exist before the plugin builds the frame and inventory.
        app.insert_resource(params);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute and resources settle.
        app.update();

        Self { app }
    }

    /// Convenience: default params with a different stack cap.
    pub fn with_max_stack_height(max: usize) -> Self {
        Self::with_params(GridParams {
            max_stack_height: max,
            ..GridParams::default()
        })
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
