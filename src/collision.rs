//! Spatial queries over collidable entities.
//!
//! Attacks only talk to collision through [`SpatialQuery`], which mirrors the
//! two calls a physics backend would offer: a filtered raycast returning the
//! nearest hit, and an oriented-box overlap returning every matching collider.
//! [`WorldQuery`] answers both by scanning the hecs world directly.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Collider, DamageCollider, Layer, Position};
use crate::constants::RAY_PARALLEL_EPSILON;
use crate::geometry::perpendicular;
use crate::layers::LayerMask;

/// Nearest blocking hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec2,
}

/// Read-only collision service consumed by attacks.
pub trait SpatialQuery {
    /// Nearest collider on `filter` hit by the ray within `max_distance`.
    /// `direction` must be a unit vector.
    fn raycast(
        &self,
        world: &World,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit>;

    /// All colliders on `filter` overlapping the box of full `size`, rotated by
    /// `angle` radians around `center`. An entity appears at most once, but
    /// several collider entities may share one damage root.
    fn overlap_oriented_box(
        &self,
        world: &World,
        center: Vec2,
        size: Vec2,
        angle: f32,
        filter: LayerMask,
    ) -> Vec<Entity>;
}

// =============================================================================
// ORIENTED BOX
// =============================================================================

/// World-space oriented box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub angle: f32,
}

impl OrientedBox {
    pub fn new(center: Vec2, half_extents: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents,
            angle,
        }
    }

    /// Box described by an entity's position and collider
    pub fn from_collider(position: Vec2, collider: &Collider) -> Self {
        Self::new(
            collider.world_center(position),
            collider.half_extents,
            collider.angle,
        )
    }

    /// Local x and y axes in world space
    pub fn axes(&self) -> [Vec2; 2] {
        let u = Vec2::from_angle(self.angle);
        [u, perpendicular(u)]
    }

    /// Projection interval of the box onto `axis` (unit vector)
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let [u, v] = self.axes();
        let c = self.center.dot(axis);
        let r = u.dot(axis).abs() * self.half_extents.x + v.dot(axis).abs() * self.half_extents.y;
        (c - r, c + r)
    }

    /// Separating axis test; touching boxes count as overlapping
    pub fn overlaps(&self, other: &OrientedBox) -> bool {
        let [a0, a1] = self.axes();
        let [b0, b1] = other.axes();
        [a0, a1, b0, b1].iter().all(|&axis| {
            let (min_a, max_a) = self.project(axis);
            let (min_b, max_b) = other.project(axis);
            max_a >= min_b && max_b >= min_a
        })
    }

    /// Distance along the ray to the box surface, 0 if the origin is inside
    pub fn ray_distance(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let to_local = Vec2::from_angle(-self.angle);
        let o = to_local.rotate(origin - self.center);
        let d = to_local.rotate(direction);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for (o, d, h) in [
            (o.x, d.x, self.half_extents.x),
            (o.y, d.y, self.half_extents.y),
        ] {
            if d.abs() < RAY_PARALLEL_EPSILON {
                if o.abs() > h {
                    return None;
                }
                continue;
            }
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        let entry = t_min.max(0.0);
        if t_max < entry || entry > max_distance {
            return None;
        }
        Some(entry)
    }
}

// =============================================================================
// WORLD QUERY
// =============================================================================

/// Brute-force spatial queries over every (Position, Collider, Layer) entity.
/// Colliders whose `DamageCollider` is disabled are invisible to queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldQuery;

impl WorldQuery {
    fn for_each_box(world: &World, filter: LayerMask, mut f: impl FnMut(Entity, OrientedBox)) {
        for (entity, (pos, collider, layer, damage)) in world
            .query::<(&Position, &Collider, &Layer, Option<&DamageCollider>)>()
            .iter()
        {
            if !layer.0.intersects(filter) {
                continue;
            }
            if damage.is_some_and(|d| !d.enabled) {
                continue;
            }
            f(entity, OrientedBox::from_collider(pos.0, collider));
        }
    }
}

impl SpatialQuery for WorldQuery {
    fn raycast(
        &self,
        world: &World,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        Self::for_each_box(world, filter, |entity, obb| {
            let Some(distance) = obb.ray_distance(origin, direction, max_distance) else {
                return;
            };
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    entity,
                    distance,
                    point: origin + direction * distance,
                });
            }
        });
        nearest
    }

    fn overlap_oriented_box(
        &self,
        world: &World,
        center: Vec2,
        size: Vec2,
        angle: f32,
        filter: LayerMask,
    ) -> Vec<Entity> {
        let query_box = OrientedBox::new(center, size * 0.5, angle);
        let mut hits = Vec::new();
        Self::for_each_box(world, filter, |entity, obb| {
            if query_box.overlaps(&obb) {
                hits.push(entity);
            }
        });
        hits
    }
}
