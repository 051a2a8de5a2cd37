//! Closing walls attack defaults.

/// Delay before each wave's walls appear (seconds, wave 0)
pub const WALLS_WARN_TIME: f32 = 0.6;
/// Slow approach / retreat speed (units per second, wave 0)
pub const WALLS_MOVE_SPEED: f32 = 4.0;
/// Rush speed during the fast approach (units per second, wave 0)
pub const WALLS_FAST_MOVE_SPEED: f32 = 12.0;
/// How long the walls stay pressed together (seconds, wave 0)
pub const WALLS_HOLD_TIME: f32 = 0.6;
/// Pause between waves (seconds, wave 0)
pub const WALLS_WAVE_GAP: f32 = 0.5;
/// Number of waves per attack
pub const WALLS_WAVES: u32 = 3;
/// Speed multiplier applied per wave (speed * mul^wave)
pub const WALLS_SPEED_MUL_PER_WAVE: f32 = 1.2;
/// Time multiplier applied per wave (duration * mul^wave)
pub const WALLS_TIME_MUL_PER_WAVE: f32 = 0.85;

/// Opacity ramp 0 -> 1 during the slow approach
pub const WALLS_FADE_IN_DURATION: f32 = 0.25;
/// Opacity ramp 1 -> 0 once the walls are holding
pub const WALLS_FADE_OUT_DURATION: f32 = 0.25;
/// Colliders keep hurting this long into the fade (clamped to the hold time)
pub const WALLS_COLLIDER_DISABLE_DELAY: f32 = 0.12;
/// Distance under which a wall counts as arrived at its anchor
pub const WALLS_ARRIVAL_EPSILON: f32 = 0.01;
