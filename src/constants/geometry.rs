//! Numeric tolerances shared by the geometry helpers.

/// Squared length under which a direction is considered degenerate
pub const DEGENERATE_DIR_SQ: f32 = 0.0001;
/// Ray/box parallel tolerance
pub const RAY_PARALLEL_EPSILON: f32 = 1.0e-6;
