//! Placement protocol: where a released tile lands, what happens when its
//! cell is full, how occupancy is rebuilt after a frame rotation and when a
//! tile may be recycled.
//!
//! [`engine`] holds the pure protocol over [`crate::tile_grid::TileGrid`].
//! [`PlacementEngine`] is the system-param wrapper that applies the side
//! effects: despawning discarded tiles, inventory updates and the outcome log.

mod engine;
mod param;
mod tests;

pub use engine::{recycle, replay_all, try_place, PlacedTile, ReplayReport};
pub use param::PlacementEngine;
