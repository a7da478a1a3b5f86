//! Tile entity components.
//!
//! A tile is an entity with a [`Tile`], a [`PlantSlot`], a `Transform` and
//! the [`GridAnchored`] marker. Its occupancy lives in
//! [`crate::tile_grid::TileGrid`], never on the entity itself.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{GridError, PlantRefusal};
use crate::inventory::PlaceableType;

/// Terrain category of a tile. Only land accepts crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Land,
    River,
    Sand,
}

impl TerrainKind {
    pub fn is_plantable(self) -> bool {
        self == TerrainKind::Land
    }

    pub fn item(self) -> PlaceableType {
        match self {
            TerrainKind::Land => PlaceableType::Land,
            TerrainKind::River => PlaceableType::River,
            TerrainKind::Sand => PlaceableType::Sand,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tile {
    pub terrain: TerrainKind,
    /// Inventory kind returned when the tile is recycled.
    pub item: PlaceableType,
    /// True only while the tile is held by the pointer.
    pub selected: bool,
    /// Timestamp of the last pointer-down, for double-click detection.
    pub last_click_time: Option<f32>,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            item: terrain.item(),
            selected: false,
            last_click_time: None,
        }
    }

    /// Whether a pointer-down at `time` completes a double click.
    pub fn is_double_click(&self, time: f32, threshold: f32) -> bool {
        self.last_click_time
            .is_some_and(|last| time >= last && time - last <= threshold)
    }
}

/// At most one crop growing on this tile. The crop is not owned by the tile;
/// it carries its own back-reference in [`crate::crops::Crop::parent_tile`].
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlantSlot {
    crop: Option<Entity>,
}

impl PlantSlot {
    pub fn crop(&self) -> Option<Entity> {
        self.crop
    }

    pub fn is_occupied(&self) -> bool {
        self.crop.is_some()
    }

    pub fn check_plantable(&self, terrain: TerrainKind) -> Result<(), GridError> {
        if !terrain.is_plantable() {
            return Err(GridError::OccupiedSlot(PlantRefusal::NotPlantable));
        }
        if self.crop.is_some() {
            return Err(GridError::OccupiedSlot(PlantRefusal::SlotOccupied));
        }
        Ok(())
    }

    /// Claim the slot for `crop` if the terrain allows it and it is free.
    pub fn try_occupy(&mut self, terrain: TerrainKind, crop: Entity) -> Result<(), GridError> {
        self.check_plantable(terrain)?;
        self.crop = Some(crop);
        Ok(())
    }

    /// Called when the crop is harvested.
    pub fn clear(&mut self) -> Option<Entity> {
        self.crop.take()
    }
}

/// Entities whose transform turns rigidly with the grid frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GridAnchored;
