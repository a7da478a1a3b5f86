//! Deterministic ordering via `SystemSet` phases.
//!
//! Every grid system runs in `FixedUpdate` inside one of these sets:
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Host input: pointer events (selection, drag, placement,
//!   recycle, planting, harvest) and rotation commands.
//! * **Simulation** – Continuous rotation, post-rotation replay and crop
//!   growth.
//! * **PostSim** – Inventory change notifications, invariant checks and the
//!   tick counter. These only read grid state.
//!
//! Commands issued in one phase are applied before the next starts, so a tile
//! despawned on overflow in `PreSim` is gone by the time `PostSim` validates
//! occupancy.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
