/// Default cap on the number of tiles a single cell can hold.
pub const DEFAULT_MAX_STACK_HEIGHT: usize = 10;

/// Smallest planar size / stack height a grid frame accepts.
pub const FRAME_EPSILON: f32 = 0.001;

/// Two pointer-downs on the same tile closer than this (seconds) recycle it.
pub const DOUBLE_CLICK_THRESHOLD: f32 = 0.3;

/// Local height at which a spawn preview hovers over the grid while dragged.
pub const DRAG_PREVIEW_HEIGHT: f32 = 0.1;

/// Offset along the tile's up axis at which a planted crop sits.
pub const CROP_PLANT_OFFSET: f32 = 0.1;

/// Seconds a crop needs to go from seedling to mature.
pub const DEFAULT_GROWTH_TIME: f32 = 20.0;

/// Grid rotation speed while a rotate input is held, in degrees per second.
pub const DEFAULT_ROTATION_SPEED: f32 = 90.0;

/// Tile asset footprint (width, height, depth). Width drives the planar cell
/// size, height drives the vertical stacking unit.
pub const DEFAULT_TILE_FOOTPRINT: [f32; 3] = [1.0, 0.5, 1.0];
