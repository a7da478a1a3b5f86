//! Pointer-driven tile interaction.
//!
//! The host delivers already-resolved [`PointerEvent`]s: what was hit and
//! where. [`handle_pointer_events`] runs them through the drag state machine:
//!
//! ```text
//! Idle -> Selected -> Dragging -> Idle      existing tile
//! Idle -> Spawning -> Idle                  drag out of the inventory
//! ```
//!
//! A pointer-down on the top tile of a stack selects it, or recycles it when
//! it lands within the double-click window of the previous one. Moves snap
//! the held entity to the cell under the pointer without touching occupancy.
//! Release hands the tile to the placement engine.

mod systems;
mod tests;
pub mod types;

pub use systems::{handle_pointer_events, InteractionContext, InteractionPlugin};
pub use types::{DragState, PointerEvent, PointerTarget};
