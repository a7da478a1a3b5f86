use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::errors::GridError;
use crate::game_params::GridParams;
use crate::grid_frame::{CellCoord, GridFrame};
use crate::inventory::{Inventory, ItemStock, PlaceableType};
use crate::outcome_log::{Outcome, OutcomeLog};
use crate::tile_grid::TileGrid;
use crate::tiles::PlantSlot;

use super::engine::{self, PlacedTile, ReplayReport};

/// Everything a placement needs, bundled so interaction and rotation systems
/// share one code path for side effects.
#[derive(SystemParam)]
pub struct PlacementEngine<'w, 's> {
    commands: Commands<'w, 's>,
    grid: ResMut<'w, TileGrid>,
    frame: Res<'w, GridFrame>,
    inventory: ResMut<'w, Inventory>,
    params: Res<'w, GridParams>,
    log: ResMut<'w, OutcomeLog>,
}

impl<'w, 's> PlacementEngine<'w, 's> {
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn log_mut(&mut self) -> &mut OutcomeLog {
        &mut self.log
    }

    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }

    /// Drop `tile` into the cell under its transform.
    ///
    /// On overflow the tile is despawned. `refund` names the item to return
    /// when `refund_on_overflow` is set; pass `None` for tiles that were never
    /// paid for.
    pub fn try_place(
        &mut self,
        tile: Entity,
        transform: &mut Transform,
        refund: Option<PlaceableType>,
    ) -> Result<PlacedTile, GridError> {
        match engine::try_place(&mut self.grid, &self.frame, tile, transform) {
            Ok(placed) => {
                debug!(
                    "Placed {:?} at {} level {}",
                    tile, placed.cell, placed.level
                );
                self.log.push(Outcome::Placed {
                    tile,
                    cell: placed.cell,
                    level: placed.level,
                });
                Ok(placed)
            }
            Err(err) => {
                if let GridError::StackOverflow { cell, .. } = err {
                    self.discard(tile, cell, refund);
                }
                Err(err)
            }
        }
    }

    /// Place a freshly spawned tile and charge one `kind` from the inventory
    /// if it lands.
    pub fn place_spawned(
        &mut self,
        tile: Entity,
        kind: PlaceableType,
        transform: &mut Transform,
    ) -> Result<PlacedTile, GridError> {
        let placed = self.try_place(tile, transform, None)?;
        self.inventory.use_item(kind);
        Ok(placed)
    }

    /// Recycle `tile`: remove it, return its item, despawn it. Refusals are
    /// logged and returned unchanged.
    pub fn recycle(
        &mut self,
        tile: Entity,
        item: PlaceableType,
        slot: &PlantSlot,
    ) -> Result<(), GridError> {
        match engine::recycle(&mut self.grid, &mut *self.inventory, tile, item, slot) {
            Ok(cell) => {
                info!("Recycled {:?} tile {:?}", item, tile);
                self.commands.entity(tile).despawn();
                self.log.push(Outcome::Recycled { tile, cell, item });
                Ok(())
            }
            Err(err) => {
                info!("Recycle of {:?} refused: {}", tile, err);
                self.log.refuse(err.clone());
                Err(err)
            }
        }
    }

    /// Rebuild occupancy for every tracked tile. `lookup` returns the tile's
    /// current position and item. Evicted tiles are despawned (and refunded
    /// when configured) and returned in the report.
    pub fn replay_all(
        &mut self,
        mut lookup: impl FnMut(Entity) -> Option<(Vec3, PlaceableType)>,
    ) -> ReplayReport {
        let mut items = Vec::new();
        let report = engine::replay_all(&mut self.grid, &self.frame, |tile| {
            lookup(tile).map(|(position, item)| {
                items.push((tile, item));
                position
            })
        });

        for (tile, cell) in &report.evicted {
            let item = items.iter().find(|(t, _)| t == tile).map(|(_, i)| *i);
            self.discard(*tile, *cell, item);
        }
        if !report.stale.is_empty() {
            warn!(
                "Replay dropped {} tracked tiles with no transform",
                report.stale.len()
            );
        }

        self.log.push(Outcome::Replayed {
            tiles: report.replaced,
            evicted: report.evicted.len(),
            stale: report.stale.len(),
        });
        report
    }

    fn discard(
        &mut self,
        tile: Entity,
        cell: CellCoord,
        refund: Option<PlaceableType>,
    ) {
        let refunded = match refund {
            Some(item) if self.params.refund_on_overflow => self.inventory.return_item(item),
            _ => false,
        };
        info!(
            "Stack at {} is full, discarding {:?} (refunded: {})",
            cell, tile, refunded
        );
        self.commands.entity(tile).despawn();
        self.log.push(Outcome::Discarded {
            tile,
            cell,
            refunded,
        });
    }
}
