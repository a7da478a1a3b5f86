use bevy::prelude::*;

use crate::errors::{GridError, RecycleRefusal};
use crate::grid_frame::{CellCoord, GridFrame};
use crate::inventory::{ItemStock, PlaceableType};
use crate::tile_grid::TileGrid;
use crate::tiles::PlantSlot;

/// Where a tile ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub cell: CellCoord,
    pub level: usize,
}

/// Result of rebuilding occupancy after a frame change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Tiles re-registered successfully.
    pub replaced: usize,
    /// Tiles whose new cell was full. They are no longer tracked and must be
    /// discarded by the caller.
    pub evicted: Vec<(Entity, CellCoord)>,
    /// Tracked entities with no position any more. Dropped from the grid.
    pub stale: Vec<Entity>,
}

/// Place `tile` in the cell under its current translation, snapping the
/// transform onto the top slot of that cell.
pub fn try_place(
    grid: &mut TileGrid,
    frame: &GridFrame,
    tile: Entity,
    transform: &mut Transform,
) -> Result<PlacedTile, GridError> {
    let cell = frame.world_to_cell(transform.translation);
    let level = grid.place(frame, tile, cell, Some(transform))?;
    Ok(PlacedTile { cell, level })
}

/// Re-register every tracked tile against the current frame without moving
/// it. Cells are visited in ascending order and each stack bottom-to-top, so
/// per-cell order survives when tiles stay in their cells.
pub fn replay_all(
    grid: &mut TileGrid,
    frame: &GridFrame,
    mut position_of: impl FnMut(Entity) -> Option<Vec3>,
) -> ReplayReport {
    let mut report = ReplayReport::default();

    for (_, tiles) in grid.snapshot() {
        for tile in tiles {
            let Some(position) = position_of(tile) else {
                grid.remove_from_grid(tile);
                report.stale.push(tile);
                continue;
            };
            let cell = frame.world_to_cell(position);
            match grid.place(frame, tile, cell, None) {
                Ok(_) => report.replaced += 1,
                Err(_) => report.evicted.push((tile, cell)),
            }
        }
    }

    report
}

/// Take `tile` off the grid and hand its item back to `stock`.
///
/// Refused without touching anything when the tile carries a crop or is not
/// the top of its stack. Returns the cell the tile left (`None` for an
/// untracked tile). Despawning is up to the caller.
pub fn recycle<S: ItemStock + ?Sized>(
    grid: &mut TileGrid,
    stock: &mut S,
    tile: Entity,
    item: PlaceableType,
    slot: &PlantSlot,
) -> Result<Option<CellCoord>, GridError> {
    if slot.is_occupied() {
        return Err(GridError::RecycleRefused(RecycleRefusal::CropPlanted));
    }
    if !grid.is_top(tile) {
        return Err(GridError::RecycleRefused(RecycleRefusal::NotTopTile));
    }
    let cell = grid.remove_from_grid(tile);
    stock.return_item(item);
    Ok(cell)
}
