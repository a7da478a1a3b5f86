//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.
//! Logs go to stderr so they never interleave with responses.

use bevy::app::App;
use bevy::prelude::*;

use simulation::agent_protocol::{
    make_response, HostCommand, HostResponse, ResponsePayload, MAX_STEP_TICKS,
};
use simulation::crops::{CropHarvested, CropMatured};
use simulation::game_params::GridParams;
use simulation::grid_frame::GridFrame;
use simulation::grid_rotation::RotationInput;
use simulation::interaction::PointerEvent;
use simulation::interaction_mode::InteractionMode;
use simulation::inventory::ItemCountChanged;
use simulation::observation::build_observation;
use simulation::outcome_log::OutcomeLog;
use simulation::TickCounter;

/// Build the headless app: no window, no renderer, just the grid.
pub fn build_agent_app(params: GridParams) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::log::LogPlugin::default());
    app.add_plugins(bevy::state::app::StatesPlugin);
    app.insert_resource(params);
    app.add_plugins(simulation::SimulationPlugin);

    // Initial update so Startup systems execute and resources initialize.
    app.update();
    app
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_agent_mode(params: GridParams) {
    use std::io::{BufRead, Write};

    use simulation::agent_protocol::PROTOCOL_VERSION;

    let mut app = build_agent_app(params);

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let mut send = |response: &HostResponse| -> bool {
        let line = match serde_json::to_string(response) {
            Ok(line) => line,
            Err(e) => {
                error!("cannot encode response: {e}");
                return true;
            }
        };
        writeln!(stdout, "{line}").and_then(|_| stdout.flush()).is_ok()
    };

    // Send the "ready" message so the host knows we are live.
    if !send(&make_response(ResponsePayload::Ready)) {
        return;
    }
    info!(
        "stackfarm agent mode v{} ready, waiting for commands on stdin",
        PROTOCOL_VERSION
    );

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<HostCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        if !send(&response) || is_goodbye {
            break;
        }
    }

    info!("stackfarm agent mode shutting down");
}

// ---------------------------------------------------------------------------
// Ticking
// ---------------------------------------------------------------------------

/// Run `n` fixed ticks. `FixedUpdate` is driven directly so every tick
/// advances exactly one timestep regardless of wall-clock time.
fn advance(app: &mut App, n: u64) {
    for _ in 0..n {
        let world = app.world_mut();
        world.run_schedule(FixedUpdate);
        // Every reader runs each tick, so swapping after each one loses
        // nothing and keeps the buffers bounded.
        world.resource_mut::<Events<PointerEvent>>().update();
        world.resource_mut::<Events<RotationInput>>().update();
        world.resource_mut::<Events<ItemCountChanged>>().update();
        world.resource_mut::<Events<CropMatured>>().update();
        world.resource_mut::<Events<CropHarvested>>().update();
    }
}

/// Run one tick after queueing an input and report what it caused.
fn tick_and_collect(app: &mut App) -> HostResponse {
    let mark = app.world().resource::<OutcomeLog>().total();
    advance(app, 1);
    let outcomes = app.world().resource::<OutcomeLog>().since(mark).to_vec();
    make_response(ResponsePayload::Outcomes { outcomes })
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

pub fn process_command(cmd: HostCommand, app: &mut App) -> HostResponse {
    match cmd {
        HostCommand::Pointer { event } => {
            let frame = app.world().get_resource::<GridFrame>();
            match event.to_event(frame) {
                Ok(event) => {
                    app.world_mut().send_event(event);
                    tick_and_collect(app)
                }
                Err(e) => make_response(ResponsePayload::Error {
                    message: e.to_string(),
                }),
            }
        }

        HostCommand::Rotate { input } => {
            app.world_mut().send_event(RotationInput::from(input));
            tick_and_collect(app)
        }

        HostCommand::SetPreview { enabled } => {
            app.world_mut()
                .resource_mut::<InteractionMode>()
                .set_preview(enabled);
            make_response(ResponsePayload::Ok)
        }

        HostCommand::Step { ticks } => {
            advance(app, ticks.min(MAX_STEP_TICKS));
            let tick = app
                .world()
                .get_resource::<TickCounter>()
                .map(|t| t.0)
                .unwrap_or(0);
            make_response(ResponsePayload::StepComplete { tick })
        }

        HostCommand::Observe => make_response(ResponsePayload::Observation {
            observation: build_observation(app.world()),
        }),

        HostCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}
