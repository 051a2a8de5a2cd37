//! Per-frame systems that run outside the attacks.
//!
//! - `combat`: the damage sink, invulnerability and hazard contact damage
//! - `movement`: knockback integration and scripted target paths

pub mod combat;
pub mod movement;

// Re-export commonly used items
pub use combat::{apply_contact_damage, damage_root, take_damage, tick_invulnerability};
pub use movement::{follow_scripted_paths, integrate_velocity, scripted_position};
