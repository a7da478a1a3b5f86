//! Spawn templates: what each inventory kind turns into when dragged out.
//!
//! The engine never builds entities on its own. The interaction layer asks
//! [`SpawnTemplates`] for the template of a kind and uses the helpers below
//! to instantiate previews, tiles and crops.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::crops::CropPreview;
use crate::game_params::{CropEntry, GridParams};
use crate::inventory::PlaceableType;
use crate::tiles::{GridAnchored, PlantSlot, TerrainKind, Tile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnTemplate {
    Tile { terrain: TerrainKind },
    Crop(CropEntry),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnTemplates {
    templates: BTreeMap<PlaceableType, SpawnTemplate>,
}

impl SpawnTemplates {
    /// One tile template per terrain kind plus one crop template per entry of
    /// the crop table. Crop kinds without an entry cannot be spawned.
    pub fn from_params(params: &GridParams) -> Self {
        let mut templates = BTreeMap::new();
        for kind in PlaceableType::ALL {
            if let Some(terrain) = kind.terrain() {
                templates.insert(kind, SpawnTemplate::Tile { terrain });
            }
        }
        for entry in &params.crops {
            templates.entry(entry.kind).or_insert(SpawnTemplate::Crop(*entry));
        }
        Self { templates }
    }

    pub fn get(&self, kind: PlaceableType) -> Option<&SpawnTemplate> {
        self.templates.get(&kind)
    }
}

/// Spawn a tile entity. It is not tracked until placed.
pub fn spawn_tile(commands: &mut Commands, terrain: TerrainKind, transform: Transform) -> Entity {
    commands
        .spawn((
            Tile::new(terrain),
            PlantSlot::default(),
            transform,
            GridAnchored,
            Name::new(format!("{:?} tile", terrain)),
        ))
        .id()
}

/// Spawn the stand-in for a crop being dragged from the inventory.
pub fn spawn_crop_preview(
    commands: &mut Commands,
    kind: PlaceableType,
    transform: Transform,
) -> Entity {
    commands
        .spawn((
            CropPreview { kind },
            transform,
            Name::new(format!("{:?} preview", kind)),
        ))
        .id()
}
