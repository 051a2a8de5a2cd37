//! 2D vector helpers used by the attack integrators.
//!
//! All helpers fall back to a caller-supplied or unchanged value on degenerate
//! input instead of producing NaNs.

use glam::Vec2;

use crate::constants::DEGENERATE_DIR_SQ;

/// Move `current` toward `target` by at most `max_step`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_step || dist == 0.0 {
        return target;
    }
    current + delta / dist * max_step
}

/// Normalize `v`, or return `fallback` when it is too short to have a direction
pub fn safe_normalize(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.length_squared() > DEGENERATE_DIR_SQ {
        v.normalize()
    } else {
        fallback
    }
}

/// Rotate unit vector `current` toward `desired` by at most `max_radians`.
///
/// Returns `desired` exactly once the remaining angle fits in one step.
pub fn rotate_towards(current: Vec2, desired: Vec2, max_radians: f32) -> Vec2 {
    let angle = signed_angle(current, desired);
    if angle.abs() <= max_radians {
        return desired;
    }
    let step = max_radians.copysign(angle);
    Vec2::from_angle(step)
        .rotate(current)
        .try_normalize()
        .unwrap_or(current)
}

/// Signed angle from `a` to `b` in radians, in (-PI, PI]
pub fn signed_angle(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b).atan2(a.dot(b))
}

/// Counter-clockwise perpendicular
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Angle of `v` in radians
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Half-length of an oriented box projected onto `axis` (unit vector)
pub fn extent_along(half_extents: Vec2, angle: f32, axis: Vec2) -> f32 {
    let u = Vec2::from_angle(angle);
    let v = perpendicular(u);
    u.dot(axis).abs() * half_extents.x + v.dot(axis).abs() * half_extents.y
}
