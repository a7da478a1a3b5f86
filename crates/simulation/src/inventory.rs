//! Item inventory: how many of each placeable kind the player can still
//! spawn.
//!
//! The engine talks to the inventory through the [`ItemStock`] trait so the
//! placement protocol can be exercised against a plain counter in tests.
//! Every count change queues an [`ItemCountChanged`] which
//! [`flush_item_count_changes`] publishes as a Bevy event in `PostSim`.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game_params::GridParams;
use crate::simulation_sets::SimulationSet;
use crate::tiles::TerrainKind;

// ---------------------------------------------------------------------------
// PlaceableType
// ---------------------------------------------------------------------------

/// Everything that can be spawned from the inventory: terrain tiles and crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlaceableType {
    Land,
    River,
    Sand,
    Corn,
    Wheat,
}

impl PlaceableType {
    pub const ALL: [PlaceableType; 5] = [
        PlaceableType::Land,
        PlaceableType::River,
        PlaceableType::Sand,
        PlaceableType::Corn,
        PlaceableType::Wheat,
    ];

    pub fn is_crop(self) -> bool {
        matches!(self, PlaceableType::Corn | PlaceableType::Wheat)
    }

    /// Terrain of the tile this kind spawns, `None` for crops.
    pub fn terrain(self) -> Option<TerrainKind> {
        match self {
            PlaceableType::Land => Some(TerrainKind::Land),
            PlaceableType::River => Some(TerrainKind::River),
            PlaceableType::Sand => Some(TerrainKind::Sand),
            PlaceableType::Corn | PlaceableType::Wheat => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ItemStock trait
// ---------------------------------------------------------------------------

/// Inventory operations the placement engine depends on.
pub trait ItemStock {
    /// A known kind with at least one unit left.
    fn can_create(&self, kind: PlaceableType) -> bool;
    /// Consume one unit. Returns false (and changes nothing) if none is left.
    fn use_item(&mut self, kind: PlaceableType) -> bool;
    /// Give one unit back. Unknown kinds are ignored and return false.
    fn return_item(&mut self, kind: PlaceableType) -> bool;
    /// Units left; 0 for unknown kinds.
    fn count(&self, kind: PlaceableType) -> u32;
}

// ---------------------------------------------------------------------------
// Inventory resource
// ---------------------------------------------------------------------------

/// Published whenever a count changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemCountChanged {
    pub kind: PlaceableType,
    pub count: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Inventory {
    counts: BTreeMap<PlaceableType, u32>,
    pending: Vec<ItemCountChanged>,
}

impl Inventory {
    /// Seed counts from the parameter table. Duplicate entries keep the first.
    pub fn from_params(params: &GridParams) -> Self {
        let mut counts = BTreeMap::new();
        for stock in &params.stocks {
            counts.entry(stock.kind).or_insert(stock.initial_count);
        }
        Self {
            counts,
            pending: Vec::new(),
        }
    }

    pub fn counts(&self) -> &BTreeMap<PlaceableType, u32> {
        &self.counts
    }

    pub fn drain_pending(&mut self) -> Vec<ItemCountChanged> {
        std::mem::take(&mut self.pending)
    }
}

impl ItemStock for Inventory {
    fn can_create(&self, kind: PlaceableType) -> bool {
        self.counts.get(&kind).is_some_and(|&c| c > 0)
    }

    fn use_item(&mut self, kind: PlaceableType) -> bool {
        let Some(count) = self.counts.get_mut(&kind).filter(|c| **c > 0) else {
            return false;
        };
        *count -= 1;
        let count = *count;
        debug!("Used {:?}, {} left", kind, count);
        self.pending.push(ItemCountChanged { kind, count });
        true
    }

    fn return_item(&mut self, kind: PlaceableType) -> bool {
        let Some(count) = self.counts.get_mut(&kind) else {
            return false;
        };
        *count = count.saturating_add(1);
        let count = *count;
        debug!("Returned {:?}, {} left", kind, count);
        self.pending.push(ItemCountChanged { kind, count });
        true
    }

    fn count(&self, kind: PlaceableType) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn flush_item_count_changes(
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<ItemCountChanged>,
) {
    if inventory.pending.is_empty() {
        return;
    }
    for change in inventory.drain_pending() {
        events.send(change);
    }
}

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        let inventory = app
            .world()
            .get_resource::<GridParams>()
            .map(Inventory::from_params)
            .unwrap_or_default();
        app.insert_resource(inventory)
            .add_event::<ItemCountChanged>()
            .add_systems(
                FixedUpdate,
                flush_item_count_changes.in_set(SimulationSet::PostSim),
            );
    }
}
