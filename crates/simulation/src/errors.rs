//! Error taxonomy for the grid engine.
//!
//! Every failure here is local and recoverable: operations return a
//! [`GridError`] and the caller decides what to surface. Nothing in the
//! engine panics on bad input.

use serde::Serialize;

use crate::grid_frame::CellCoord;

/// Why a recycle request was refused. No state changes when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecycleRefusal {
    /// Another tile sits on top of this one.
    NotTopTile,
    /// The tile carries a crop; harvest it first.
    CropPlanted,
}

/// Why a crop could not be planted on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlantRefusal {
    /// Only land tiles accept crops.
    NotPlantable,
    /// The tile already holds a crop.
    SlotOccupied,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GridError {
    /// The tile footprint yields a zero-sized cell or stack unit.
    DegenerateFrame { planar_size: f32, stack_height: f32 },
    /// The target cell already holds `max` tiles.
    StackOverflow { cell: CellCoord, max: usize },
    OccupiedSlot(PlantRefusal),
    RecycleRefused(RecycleRefusal),
    /// Harvest attempted on a crop that is still a seedling.
    CropNotMature,
    /// An event referenced an entity missing the expected components.
    UnknownEntity(u64),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::DegenerateFrame {
                planar_size,
                stack_height,
            } => write!(
                f,
                "degenerate grid frame (planar size {planar_size}, stack height {stack_height})"
            ),
            GridError::StackOverflow { cell, max } => {
                write!(f, "stack at {cell} is full ({max} tiles)")
            }
            GridError::OccupiedSlot(PlantRefusal::NotPlantable) => {
                write!(f, "tile terrain does not accept crops")
            }
            GridError::OccupiedSlot(PlantRefusal::SlotOccupied) => {
                write!(f, "tile already holds a crop")
            }
            GridError::RecycleRefused(RecycleRefusal::NotTopTile) => {
                write!(f, "only the top tile of a stack can be recycled")
            }
            GridError::RecycleRefused(RecycleRefusal::CropPlanted) => {
                write!(f, "tile holds a crop and cannot be moved or recycled")
            }
            GridError::CropNotMature => write!(f, "crop is not mature yet"),
            GridError::UnknownEntity(bits) => write!(f, "unknown entity {bits}"),
        }
    }
}

impl std::error::Error for GridError {}
