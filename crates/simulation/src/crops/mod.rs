mod systems;
pub mod types;

pub use systems::{grow_crops, harvest, try_plant_crop, CropsPlugin};
pub use types::{Crop, CropHarvested, CropMatured, CropPreview, GrowthState, HarvestTally};
