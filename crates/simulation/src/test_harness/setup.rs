//! Builder methods that put tiles on the grid directly, bypassing pointer
//! input, for scenarios that only care about the resulting layout.

use bevy::prelude::*;

use crate::errors::GridError;
use crate::grid_frame::{CellCoord, GridFrame};
use crate::inventory::{Inventory, ItemStock, PlaceableType};
use crate::placement::{self, PlacedTile};
use crate::tile_grid::TileGrid;
use crate::tiles::{GridAnchored, PlantSlot, TerrainKind, Tile};

use super::TestGarden;

impl TestGarden {
    // -----------------------------------------------------------------------
    // Tiles
    // -----------------------------------------------------------------------

    /// Spawn an untracked tile at `pos`.
    pub fn spawn_tile(&mut self, terrain: TerrainKind, pos: Vec3) -> Entity {
        self.world_mut()
            .spawn((
                Tile::new(terrain),
                PlantSlot::default(),
                Transform::from_translation(pos),
                GridAnchored,
            ))
            .id()
    }

    /// Spawn a tile at `pos` and place it like a released drag. The tile is
    /// despawned if its cell is full.
    pub fn place_tile_at(
        &mut self,
        terrain: TerrainKind,
        pos: Vec3,
    ) -> Result<(Entity, PlacedTile), GridError> {
        let entity = self.spawn_tile(terrain, pos);
        let world = self.world_mut();
        let mut transform = Transform::from_translation(pos);
        let result = world.resource_scope(|world, mut grid: Mut<TileGrid>| {
            let frame = world.resource::<GridFrame>();
            placement::try_place(&mut grid, frame, entity, &mut transform)
        });
        match result {
            Ok(placed) => {
                world.entity_mut(entity).insert(transform);
                Ok((entity, placed))
            }
            Err(err) => {
                world.despawn(entity);
                Err(err)
            }
        }
    }

    /// Place a tile in `cell`, on top of whatever is already there.
    pub fn place_tile(&mut self, terrain: TerrainKind, cell: CellCoord) -> Entity {
        let pos = self.cell_center(cell);
        self.place_tile_at(terrain, pos)
            .map(|(entity, _)| entity)
            .unwrap_or_else(|err| panic!("placing {terrain:?} at {cell} failed: {err}"))
    }

    /// Builder form of [`TestGarden::place_tile`] stacking `count` tiles.
    pub fn with_stack(mut self, terrain: TerrainKind, cell: CellCoord, count: usize) -> Self {
        for _ in 0..count {
            self.place_tile(terrain, cell);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Inventory
    // -----------------------------------------------------------------------

    /// Drain the stock of `kind` down to `count`.
    pub fn with_stock(mut self, kind: PlaceableType, count: u32) -> Self {
        let mut inventory = self.world_mut().resource_mut::<Inventory>();
        while inventory.count(kind) > count {
            inventory.use_item(kind);
        }
        while inventory.count(kind) < count {
            if !inventory.return_item(kind) {
                break;
            }
        }
        inventory.drain_pending();
        self
    }
}
