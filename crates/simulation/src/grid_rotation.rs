//! Whole-grid rotation.
//!
//! Holding a rotate input turns the frame about its origin at
//! `GridParams::rotation_speed` degrees per second; every grid-anchored
//! entity turns rigidly with it. When the input is released (or after a
//! discrete step) occupancy is replayed against the new frame. Replay waits
//! until no drag is in progress, because a held tile's transform does not
//! reflect the cell it is tracked in.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game_params::GridParams;
use crate::grid_frame::GridFrame;
use crate::interaction::{handle_pointer_events, DragState};
use crate::placement::PlacementEngine;
use crate::simulation_sets::SimulationSet;
use crate::tiles::{GridAnchored, PlantSlot, Tile};

/// Seen from above (+Y looking down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Sign of the rotation angle about +Y.
    pub fn sign(self) -> f32 {
        match self {
            RotationDirection::Clockwise => -1.0,
            RotationDirection::CounterClockwise => 1.0,
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum RotationInput {
    /// Start turning continuously.
    Begin { direction: RotationDirection },
    /// Stop turning and replay occupancy.
    End,
    /// Turn by a fixed angle at once, then replay.
    Step { degrees: f32 },
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RotationDrive {
    pub active: Option<RotationDirection>,
    pub pending_replay: bool,
    /// Accumulated yaw of the frame in degrees, for observation.
    pub yaw_degrees: f32,
}

/// Rotate the frame and everything anchored to it by `delta` about the frame
/// origin. Poses held by an in-progress drag turn as well.
pub fn rotate_grid<'a>(
    frame: &mut GridFrame,
    anchored: impl IntoIterator<Item = Mut<'a, Transform>>,
    drag: &mut DragState,
    delta: Quat,
) {
    let origin = frame.origin();
    frame.rotate(delta);
    for mut transform in anchored {
        transform.rotate_around(origin, delta);
    }
    match drag {
        DragState::Idle => {}
        DragState::Selected { origin: pose, .. } | DragState::Dragging { origin: pose, .. } => {
            pose.rotate_around(origin, delta);
        }
        DragState::Spawning { transform, .. } => transform.rotate_around(origin, delta),
    }
}

// =============================================================================
// Systems
// =============================================================================

pub fn read_rotation_input(
    mut events: EventReader<RotationInput>,
    mut drive: ResMut<RotationDrive>,
    mut frame: ResMut<GridFrame>,
    mut drag: ResMut<DragState>,
    mut anchored: Query<&mut Transform, With<GridAnchored>>,
) {
    for event in events.read() {
        match *event {
            RotationInput::Begin { direction } => drive.active = Some(direction),
            RotationInput::End => {
                if drive.active.take().is_some() {
                    drive.pending_replay = true;
                }
            }
            RotationInput::Step { degrees } => {
                if !degrees.is_finite() {
                    warn!("Ignoring rotation step of {} degrees", degrees);
                    continue;
                }
                let delta = Quat::from_rotation_y(degrees.to_radians());
                rotate_grid(&mut frame, anchored.iter_mut(), &mut drag, delta);
                drive.yaw_degrees = (drive.yaw_degrees + degrees).rem_euclid(360.0);
                drive.pending_replay = true;
            }
        }
    }
}

pub fn drive_rotation(
    time: Res<Time<Fixed>>,
    params: Res<GridParams>,
    mut drive: ResMut<RotationDrive>,
    mut frame: ResMut<GridFrame>,
    mut drag: ResMut<DragState>,
    mut anchored: Query<&mut Transform, With<GridAnchored>>,
) {
    let Some(direction) = drive.active else {
        return;
    };
    let degrees = direction.sign() * params.rotation_speed * time.timestep().as_secs_f32();
    let delta = Quat::from_rotation_y(degrees.to_radians());
    rotate_grid(&mut frame, anchored.iter_mut(), &mut drag, delta);
    drive.yaw_degrees = (drive.yaw_degrees + degrees).rem_euclid(360.0);
}

pub fn replay_after_rotation(
    mut drive: ResMut<RotationDrive>,
    drag: Res<DragState>,
    mut engine: PlacementEngine,
    tiles: Query<(&Transform, &Tile, &PlantSlot)>,
) {
    if !drive.pending_replay || drive.active.is_some() || !drag.is_idle() {
        return;
    }
    drive.pending_replay = false;

    let report = engine.replay_all(|entity| {
        tiles
            .get(entity)
            .ok()
            .map(|(transform, tile, _)| (transform.translation, tile.item))
    });
    // Crops do not outlive a discarded tile.
    for (tile, _) in &report.evicted {
        if let Some(crop) = tiles.get(*tile).ok().and_then(|(_, _, slot)| slot.crop()) {
            engine.commands().entity(crop).despawn();
        }
    }
    info!(
        "Replayed {} tiles after rotation ({} evicted)",
        report.replaced,
        report.evicted.len()
    );
}

pub struct GridRotationPlugin;

impl Plugin for GridRotationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RotationDrive>()
            .add_event::<RotationInput>()
            .add_systems(
                FixedUpdate,
                read_rotation_input
                    .after(handle_pointer_events)
                    .in_set(SimulationSet::PreSim)
                    .run_if(resource_exists::<GridFrame>),
            )
            .add_systems(
                FixedUpdate,
                (drive_rotation, replay_after_rotation)
                    .chain()
                    .in_set(SimulationSet::Simulation)
                    .run_if(resource_exists::<GridFrame>),
            );
    }
}
