use std::collections::HashMap;

use glam::Vec2;
use hecs::Entity;

use crate::layers::LayerMask;

/// Position component - world coordinates (centre of the entity)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Visual opacity in [0, 1]. Purely cosmetic: never gates damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Opacity {
    pub fn set(&mut self, alpha: f32) {
        self.0 = alpha.clamp(0.0, 1.0);
    }
}

/// Damage-collider flag, toggled independently of opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageCollider {
    pub enabled: bool,
}

/// Oriented box collision shape centred on the entity's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec2,
    /// Rotation in radians (counter-clockwise from +x)
    pub angle: f32,
    /// Offset of the box centre in the entity's local (rotated) frame
    pub offset: Vec2,
}

impl Collider {
    pub fn aabb(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            angle: 0.0,
            offset: Vec2::ZERO,
        }
    }

    /// World-space centre of the box for an entity at `position`
    pub fn world_center(&self, position: Vec2) -> Vec2 {
        position + Vec2::from_angle(self.angle).rotate(self.offset)
    }
}

/// Collision layer of an entity (one bit of a [`LayerMask`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer(pub LayerMask);

/// Marker for entities spawned and owned by an attack
#[derive(Debug, Clone, Copy)]
pub struct Hazard;

/// Health component - the damage sink
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    /// Remaining invulnerability after a landed hit (seconds)
    pub invulnerable_for: f32,
    /// Invulnerability granted by each landed hit (seconds)
    pub invulnerability_window: f32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            invulnerable_for: 0.0,
            invulnerability_window: 0.0,
        }
    }

    pub fn with_invulnerability(mut self, window: f32) -> Self {
        self.invulnerability_window = window.max(0.0);
        self
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    pub fn percentage(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Velocity component - receives knockback impulses
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Points a collider part at the entity that owns its health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoot(pub Entity);

/// Damage dealt by a hazard collider while it is enabled
#[derive(Debug, Clone)]
pub struct ContactDamage {
    pub amount: i32,
    /// Minimum seconds between hits on the same target
    pub interval: f32,
    pub knockback: f32,
    pub targets: LayerMask,
    /// Game time of the last hit per damage root
    pub last_hit: HashMap<Entity, f32>,
}

impl ContactDamage {
    pub fn new(amount: i32, interval: f32, knockback: f32, targets: LayerMask) -> Self {
        Self {
            amount,
            interval,
            knockback,
            targets,
            last_hit: HashMap::new(),
        }
    }

    /// Whether `target` may be hit again at `now`
    pub fn ready_for(&self, target: Entity, now: f32) -> bool {
        self.last_hit
            .get(&target)
            .map_or(true, |&last| now - last >= self.interval)
    }
}

/// Current visual extent of a beam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamExtent {
    pub start: Vec2,
    pub end: Vec2,
    pub direction: Vec2,
    pub length: f32,
    pub width: f32,
}

/// Scripted movement for targets in headless simulations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedPath {
    /// Circle around `center` at `angular_speed` radians per second
    Orbit {
        center: Vec2,
        radius: f32,
        angular_speed: f32,
        phase: f32,
    },
    /// Constant velocity
    Linear { velocity: Vec2 },
}
