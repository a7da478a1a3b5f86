//! Host text protocol types for the headless `--agent` mode.
//!
//! Defines the JSON command/response envelope that external programs
//! (scripts, test drivers, a rendering front end) use to drive the grid over
//! newline-delimited JSON on stdin/stdout.
//!
//! These types live in the `simulation` crate so they can be unit-tested
//! without pulling in the app binary. The I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid_frame::GridFrame;
use crate::grid_rotation::{RotationDirection, RotationInput};
use crate::interaction::{PointerEvent, PointerTarget};
use crate::inventory::PlaceableType;
use crate::observation::GardenObservation;
use crate::outcome_log::Outcome;

// ---------------------------------------------------------------------------
// Commands (stdin → simulation)
// ---------------------------------------------------------------------------

/// What a pointer-down hit, with entities given as their `to_bits` value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    Tile(u64),
    Crop(u64),
    Spawner(PlaceableType),
    Nothing,
}

/// A pointer position: either a world point the host already projected, or
/// a view ray that is intersected with the grid plane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PosSpec {
    Point([f32; 3]),
    Ray { ray: RaySpec },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RaySpec {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerSpec {
    Down {
        target: TargetSpec,
        pos: PosSpec,
        time: f32,
    },
    Move {
        pos: PosSpec,
    },
    Up {
        pos: PosSpec,
    },
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RotateSpec {
    Begin { direction: RotationDirection },
    End,
    Step { degrees: f32 },
}

/// A single command sent by the host over stdin.
///
/// Each line of stdin is parsed as one `HostCommand`. The `cmd` field acts as
/// the discriminator tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum HostCommand {
    /// Deliver one pointer event and run a tick to process it.
    #[serde(rename = "pointer")]
    Pointer { event: PointerSpec },

    /// Deliver one rotation input and run a tick to process it.
    #[serde(rename = "rotate")]
    Rotate { input: RotateSpec },

    /// Turn preview (read-only) mode on or off.
    #[serde(rename = "set_preview")]
    SetPreview { enabled: bool },

    /// Advance the simulation by `ticks` fixed-update ticks.
    #[serde(rename = "step")]
    Step { ticks: u64 },

    /// Request the current garden observation.
    #[serde(rename = "observe")]
    Observe,

    /// Gracefully shut down the session.
    #[serde(rename = "quit")]
    Quit,
}

/// Reasons a command cannot be turned into simulation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    InvalidEntity(u64),
    /// The ray has no direction, misses the grid plane or there is no grid.
    RayMissesGrid,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidEntity(bits) => write!(f, "{bits} is not a valid entity id"),
            CommandError::RayMissesGrid => write!(f, "pointer ray does not hit the grid plane"),
        }
    }
}

impl std::error::Error for CommandError {}

fn entity_from_bits(bits: u64) -> Result<Entity, CommandError> {
    Entity::try_from_bits(bits).map_err(|_| CommandError::InvalidEntity(bits))
}

impl TargetSpec {
    pub fn resolve(self) -> Result<PointerTarget, CommandError> {
        Ok(match self {
            TargetSpec::Tile(bits) => PointerTarget::Tile(entity_from_bits(bits)?),
            TargetSpec::Crop(bits) => PointerTarget::Crop(entity_from_bits(bits)?),
            TargetSpec::Spawner(kind) => PointerTarget::Spawner(kind),
            TargetSpec::Nothing => PointerTarget::Nothing,
        })
    }
}

impl PosSpec {
    /// World position of the pointer. Rays need the current frame.
    pub fn resolve(self, frame: Option<&GridFrame>) -> Result<Vec3, CommandError> {
        match self {
            PosSpec::Point(pos) => Ok(Vec3::from_array(pos)),
            PosSpec::Ray { ray } => {
                let direction = Dir3::new(Vec3::from_array(ray.direction))
                    .map_err(|_| CommandError::RayMissesGrid)?;
                let ray = Ray3d::new(Vec3::from_array(ray.origin), direction);
                frame
                    .and_then(|frame| frame.drag_plane_hit(ray))
                    .ok_or(CommandError::RayMissesGrid)
            }
        }
    }
}

impl PointerSpec {
    pub fn to_event(self, frame: Option<&GridFrame>) -> Result<PointerEvent, CommandError> {
        Ok(match self {
            PointerSpec::Down { target, pos, time } => PointerEvent::Down {
                target: target.resolve()?,
                pos: pos.resolve(frame)?,
                time,
            },
            PointerSpec::Move { pos } => PointerEvent::Move {
                pos: pos.resolve(frame)?,
            },
            PointerSpec::Up { pos } => PointerEvent::Up {
                pos: pos.resolve(frame)?,
            },
            PointerSpec::Cancel => PointerEvent::Cancel,
        })
    }
}

impl From<RotateSpec> for RotationInput {
    fn from(spec: RotateSpec) -> Self {
        match spec {
            RotateSpec::Begin { direction } => RotationInput::Begin { direction },
            RotateSpec::End => RotationInput::End,
            RotateSpec::Step { degrees } => RotationInput::Step { degrees },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses (simulation → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct HostResponse {
    pub protocol_version: u32,
    /// The response payload, flattened into this object.
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// Tagged payload variants for host responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    /// The simulation is ready to accept commands.
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "observation")]
    Observation { observation: GardenObservation },

    /// Outcomes produced while processing a pointer or rotate command.
    #[serde(rename = "outcomes")]
    Outcomes { outcomes: Vec<Outcome> },

    /// The simulation has advanced; reports the current tick counter.
    #[serde(rename = "step_complete")]
    StepComplete { tick: u64 },

    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "error")]
    Error { message: String },

    /// The session is ending (response to `quit`).
    #[serde(rename = "goodbye")]
    Goodbye,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Upper bound on ticks a single `step` command may run.
pub const MAX_STEP_TICKS: u64 = 10_000;

/// Wraps a payload with the current protocol version.
pub fn make_response(payload: ResponsePayload) -> HostResponse {
    HostResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
