//! Cross beams ("X then +") attack defaults.

pub const CROSS_WARN_TIME: f32 = 0.8;
pub const CROSS_FIRE_TIME: f32 = 0.5;
pub const CROSS_GAP_AFTER_X: f32 = 0.4;
pub const CROSS_WARN_WIDTH: f32 = 0.15;
pub const CROSS_FIRE_WIDTH: f32 = 0.6;
/// Segments shorter than this are not spawned
pub const CROSS_MIN_SEGMENT_LENGTH: f32 = 0.001;
