//! Movement systems: knockback integration and scripted target paths.

use glam::Vec2;
use hecs::World;

use crate::components::{Position, ScriptedPath, Velocity};
use crate::constants::{KNOCKBACK_DAMPING_PER_SEC, VELOCITY_SLEEP_THRESHOLD};

/// Integrate velocities and damp them.
///
/// Damping is exponential: a velocity keeps `KNOCKBACK_DAMPING_PER_SEC` of
/// itself after one second, regardless of the frame rate.
pub fn integrate_velocity(world: &mut World, dt: f32) {
    let keep = KNOCKBACK_DAMPING_PER_SEC.powf(dt);
    for (_, (pos, vel)) in world.query_mut::<(&mut Position, &mut Velocity)>() {
        if vel.0 == Vec2::ZERO {
            continue;
        }
        pos.0 += vel.0 * dt;
        vel.0 *= keep;
        if vel.0.length_squared() < VELOCITY_SLEEP_THRESHOLD * VELOCITY_SLEEP_THRESHOLD {
            vel.0 = Vec2::ZERO;
        }
    }
}

/// Where a scripted path puts its entity at game time `t`
pub fn scripted_position(path: &ScriptedPath, start: Vec2, t: f32) -> Vec2 {
    match *path {
        ScriptedPath::Orbit {
            center,
            radius,
            angular_speed,
            phase,
        } => center + Vec2::from_angle(phase + angular_speed * t) * radius,
        ScriptedPath::Linear { velocity } => start + velocity * t,
    }
}

/// Move scripted entities along their paths.
///
/// Linear paths step by `velocity * dt`; orbits are driven absolutely by game
/// time, so knockback only displaces an orbiting target until the next frame.
pub fn follow_scripted_paths(world: &mut World, time: f32, dt: f32) {
    for (_, (pos, path)) in world.query_mut::<(&mut Position, &ScriptedPath)>() {
        pos.0 = match *path {
            ScriptedPath::Orbit { .. } => scripted_position(path, pos.0, time),
            ScriptedPath::Linear { velocity } => pos.0 + velocity * dt,
        };
    }
}
