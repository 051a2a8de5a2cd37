//! Boss controller and damage sink defaults.

/// Idle time between attacks (seconds)
pub const CONTROLLER_IDLE_SECONDS: f32 = 1.5;

/// Damage a hazard collider deals on contact
pub const CONTACT_DAMAGE: i32 = 1;
/// Minimum seconds between contact hits on the same target
pub const CONTACT_DAMAGE_INTERVAL: f32 = 0.5;
/// Contact knockback impulse
pub const CONTACT_KNOCKBACK: f32 = 4.0;

/// Fraction of knockback velocity kept per second
pub const KNOCKBACK_DAMPING_PER_SEC: f32 = 0.02;
/// Velocities below this are zeroed
pub const VELOCITY_SLEEP_THRESHOLD: f32 = 0.01;
