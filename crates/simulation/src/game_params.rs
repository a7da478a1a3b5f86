//! Data-driven grid parameters.
//!
//! Collects the tunables of the stacking engine and its collaborators into a
//! single [`GridParams`] resource so they can be swapped without
//! recompilation. The app binary can load an override from a JSON file via
//! [`GridParams::from_json_str`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_GROWTH_TIME, DEFAULT_MAX_STACK_HEIGHT, DEFAULT_ROTATION_SPEED, DEFAULT_TILE_FOOTPRINT,
    DOUBLE_CLICK_THRESHOLD,
};
use crate::inventory::PlaceableType;

// ---------------------------------------------------------------------------
// Stock and crop tables
// ---------------------------------------------------------------------------

/// Initial inventory count for one placeable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub kind: PlaceableType,
    pub initial_count: u32,
}

/// Growth and harvest tunables for one crop kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropEntry {
    pub kind: PlaceableType,
    /// Seconds from seedling to mature.
    pub growth_time: f32,
    /// Amount added to the harvest tally when harvested.
    pub value: u32,
}

// ---------------------------------------------------------------------------
// GridParams resource
// ---------------------------------------------------------------------------

/// All tunables of the grid engine, the inventory and the crop table.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Tile asset footprint (width, height, depth).
    pub tile_footprint: [f32; 3],
    /// World-space origin of the grid frame.
    pub origin: [f32; 3],
    pub max_stack_height: usize,
    pub double_click_threshold: f32,
    /// Degrees per second while a rotate input is held.
    pub rotation_speed: f32,
    /// Return a tile's item to the inventory when it is discarded on stack
    /// overflow. Off by default: an overflowing tile is lost.
    pub refund_on_overflow: bool,
    pub stocks: Vec<StockEntry>,
    pub crops: Vec<CropEntry>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            tile_footprint: DEFAULT_TILE_FOOTPRINT,
            origin: [0.0, 0.0, 0.0],
            max_stack_height: DEFAULT_MAX_STACK_HEIGHT,
            double_click_threshold: DOUBLE_CLICK_THRESHOLD,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            refund_on_overflow: false,
            stocks: vec![
                StockEntry {
                    kind: PlaceableType::Land,
                    initial_count: 20,
                },
                StockEntry {
                    kind: PlaceableType::River,
                    initial_count: 10,
                },
                StockEntry {
                    kind: PlaceableType::Sand,
                    initial_count: 10,
                },
                StockEntry {
                    kind: PlaceableType::Corn,
                    initial_count: 5,
                },
                StockEntry {
                    kind: PlaceableType::Wheat,
                    initial_count: 5,
                },
            ],
            crops: vec![
                CropEntry {
                    kind: PlaceableType::Corn,
                    growth_time: DEFAULT_GROWTH_TIME,
                    value: 3,
                },
                CropEntry {
                    kind: PlaceableType::Wheat,
                    growth_time: DEFAULT_GROWTH_TIME,
                    value: 2,
                },
            ],
        }
    }
}

/// Reasons a parameter file is rejected.
#[derive(Debug)]
pub enum ParamsError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::Parse(e) => write!(f, "failed to parse grid params: {e}"),
            ParamsError::Invalid(msg) => write!(f, "invalid grid params: {msg}"),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Parse(e) => Some(e),
            ParamsError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e)
    }
}

impl GridParams {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: GridParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that do not depend on the frame. A degenerate footprint is left
    /// to [`crate::grid_frame::GridFrame::from_footprint`].
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_stack_height == 0 {
            return Err(ParamsError::Invalid(
                "max_stack_height must be at least 1".to_string(),
            ));
        }
        if !(self.double_click_threshold >= 0.0) {
            return Err(ParamsError::Invalid(format!(
                "double_click_threshold must be non-negative, got {}",
                self.double_click_threshold
            )));
        }
        for crop in &self.crops {
            if !crop.kind.is_crop() {
                return Err(ParamsError::Invalid(format!(
                    "{:?} is not a crop kind",
                    crop.kind
                )));
            }
            if !(crop.growth_time >= 0.0) {
                return Err(ParamsError::Invalid(format!(
                    "growth_time for {:?} must be non-negative",
                    crop.kind
                )));
            }
        }
        Ok(())
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }

    pub fn footprint(&self) -> Vec3 {
        Vec3::from_array(self.tile_footprint)
    }

    pub fn crop_entry(&self, kind: PlaceableType) -> Option<&CropEntry> {
        self.crops.iter().find(|c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(GridParams::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params = GridParams::from_json_str(r#"{"max_stack_height": 3}"#).unwrap();
        assert_eq!(params.max_stack_height, 3);
        assert_eq!(params.tile_footprint, DEFAULT_TILE_FOOTPRINT);
        assert!(!params.refund_on_overflow);
    }

    #[test]
    fn zero_stack_height_is_rejected() {
        let err = GridParams::from_json_str(r#"{"max_stack_height": 0}"#).unwrap_err();
        assert!(matches!(err, ParamsError::Invalid(_)));
    }

    #[test]
    fn terrain_kind_in_crop_table_is_rejected() {
        let json = r#"{"crops":[{"kind":"Land","growth_time":1.0,"value":1}]}"#;
        assert!(GridParams::from_json_str(json).is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = GridParams::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ParamsError::Parse(_)));
    }

    #[test]
    fn crop_entry_lookup() {
        let params = GridParams::default();
        assert_eq!(params.crop_entry(PlaceableType::Corn).map(|c| c.value), Some(3));
        assert!(params.crop_entry(PlaceableType::Sand).is_none());
    }
}
