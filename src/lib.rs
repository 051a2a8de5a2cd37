//! Boss attack choreography: closing walls, a homing beam and cross beams,
//! driven by a single-attack controller over a hecs world.

pub mod arena;
pub mod attacks;
pub mod clock;
pub mod collision;
pub mod components;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hazard;
pub mod history;
pub mod layers;
pub mod systems;
pub mod wave;

pub use arena::Arena;
pub use attacks::{Attack, AttackContext, AttackKind};
pub use config::BossConfig;
pub use controller::AttackController;
pub use error::ConfigError;
pub use events::{AttackEvent, EventQueue};
