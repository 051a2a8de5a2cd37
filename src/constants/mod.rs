//! Tuning constants organized by attack.
//!
//! Every attack reads its defaults from here, so retuning a boss never means
//! hunting for literals inside the phase machines.

mod beam;
mod controller;
mod cross;
mod geometry;
mod walls;

pub use beam::*;
pub use controller::*;
pub use cross::*;
pub use geometry::*;
pub use walls::*;
