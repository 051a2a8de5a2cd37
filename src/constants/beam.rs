//! Homing beam defaults.

/// Beam lifetime (seconds)
pub const BEAM_DURATION: f32 = 3.0;
/// Damage rate; each damage tick deals ceil(rate * interval)
pub const BEAM_DAMAGE_PER_TICK: f32 = 1.0;
/// Seconds between damage queries
pub const BEAM_TICK_INTERVAL: f32 = 0.25;
/// Maximum reach before obstacles truncate it
pub const BEAM_MAX_REACH: f32 = 12.0;
/// Visual thickness of the beam
pub const BEAM_THICKNESS: f32 = 0.6;
/// Impulse applied along the aim direction on every hit
pub const BEAM_KNOCKBACK: f32 = 6.0;

/// Non-damaging preview window after initialization (seconds)
pub const BEAM_WARMUP_TIME: f32 = 1.0;
/// Opacity the beam shows while warming up
pub const BEAM_WARMUP_ALPHA: f32 = 0.35;

/// How far in the past the beam aims (seconds)
pub const BEAM_FOLLOW_DELAY: f32 = 0.5;
/// How much target history to retain (seconds)
pub const BEAM_HISTORY_WINDOW: f32 = 2.0;
/// Extra retention on top of the window so the delayed lookup is always bracketed
pub const BEAM_HISTORY_SLACK: f32 = 0.1;
/// Delays at or below this use the live target position
pub const BEAM_MIN_FOLLOW_DELAY: f32 = 0.001;
/// Maximum aim rotation speed (degrees per second)
pub const BEAM_TURN_RATE_DEG: f32 = 120.0;

/// Raw hitbox thickness relative to the visual thickness
pub const BEAM_HITBOX_THICKNESS_FACTOR: f32 = 1.2;
/// Shortest hitbox the beam will query with
pub const BEAM_MIN_HITBOX_LENGTH: f32 = 0.01;

/// Width pulse frequency (radians per second of game time)
pub const BEAM_PULSE_SPEED: f32 = 5.0;
/// Width pulse amplitude (fraction of thickness)
pub const BEAM_PULSE_INTENSITY: f32 = 0.2;
