//! Hazard entities: spawning, state toggles and teardown.
//!
//! A hazard is an attack-owned entity with a position, a visual opacity and a
//! damage-collider flag. The two are set independently: a telegraph is
//! visible but harmless, a fading wall is faint but still hurts.

use glam::Vec2;
use hecs::{Component, Entity, EntityBuilder, World};
use serde::Deserialize;

use crate::collision::OrientedBox;
use crate::components::{Collider, ContactDamage, DamageCollider, Hazard, Layer, Opacity, Position};
use crate::constants::{CONTACT_DAMAGE, CONTACT_DAMAGE_INTERVAL, CONTACT_KNOCKBACK};
use crate::events::{AttackEvent, EventQueue};
use crate::layers::LayerMask;

/// Contact damage carried by every hazard spawned from a template
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactDamageSpec {
    pub amount: i32,
    pub interval: f32,
    pub knockback: f32,
    pub targets: LayerMask,
}

impl Default for ContactDamageSpec {
    fn default() -> Self {
        Self {
            amount: CONTACT_DAMAGE,
            interval: CONTACT_DAMAGE_INTERVAL,
            knockback: CONTACT_KNOCKBACK,
            targets: LayerMask::PLAYER,
        }
    }
}

/// Blueprint for a hazard entity
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HazardTemplate {
    /// Collision box half extents. `None` spawns a hazard with no shape.
    pub half_extents: Option<Vec2>,
    /// Damage dealt while the collider is enabled
    pub contact_damage: Option<ContactDamageSpec>,
}

impl Default for HazardTemplate {
    fn default() -> Self {
        Self {
            half_extents: Some(Vec2::new(0.5, 4.0)),
            contact_damage: Some(ContactDamageSpec::default()),
        }
    }
}

/// Initial state for a freshly spawned hazard
#[derive(Debug, Clone, Copy)]
pub struct HazardSpawn {
    pub position: Vec2,
    pub angle: f32,
    pub opacity: f32,
    pub damage_enabled: bool,
}

impl HazardSpawn {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
            opacity: 1.0,
            damage_enabled: true,
        }
    }
}

/// Spawn a hazard from a template
pub fn spawn_hazard(
    world: &mut World,
    template: &HazardTemplate,
    spawn: HazardSpawn,
    events: &mut EventQueue,
) -> Entity {
    let mut builder = hazard_builder(template, spawn);
    spawn_built(world, &mut builder, spawn.position, events)
}

/// Spawn a hazard from a template with one extra component in the same bundle
pub fn spawn_hazard_with(
    world: &mut World,
    template: &HazardTemplate,
    spawn: HazardSpawn,
    extra: impl Component,
    events: &mut EventQueue,
) -> Entity {
    let mut builder = hazard_builder(template, spawn);
    builder.add(extra);
    spawn_built(world, &mut builder, spawn.position, events)
}

fn hazard_builder(template: &HazardTemplate, spawn: HazardSpawn) -> EntityBuilder {
    let mut builder = EntityBuilder::new();
    builder.add_bundle((
        Hazard,
        Position(spawn.position),
        Opacity(spawn.opacity.clamp(0.0, 1.0)),
        DamageCollider {
            enabled: spawn.damage_enabled,
        },
        Layer(LayerMask::HAZARD),
    ));

    if let Some(half_extents) = template.half_extents {
        builder.add(Collider {
            half_extents,
            angle: spawn.angle,
            offset: Vec2::ZERO,
        });
    }
    if let Some(spec) = template.contact_damage {
        builder.add(ContactDamage::new(spec.amount, spec.interval, spec.knockback, spec.targets));
    }
    builder
}

fn spawn_built(
    world: &mut World,
    builder: &mut EntityBuilder,
    position: Vec2,
    events: &mut EventQueue,
) -> Entity {
    let entity = world.spawn(builder.build());
    events.push(AttackEvent::HazardSpawned { entity, position });
    entity
}

/// Destroy a hazard if it still exists. Returns true if it was removed.
pub fn despawn_hazard(world: &mut World, entity: Entity, events: &mut EventQueue) -> bool {
    if world.despawn(entity).is_ok() {
        events.push(AttackEvent::HazardDestroyed { entity });
        true
    } else {
        false
    }
}

/// Destroy every hazard in `owned`, leaving it empty
pub fn despawn_all(world: &mut World, owned: &mut Vec<Entity>, events: &mut EventQueue) {
    for entity in owned.drain(..) {
        despawn_hazard(world, entity, events);
    }
}

#[inline]
pub fn is_alive(world: &World, entity: Entity) -> bool {
    world.contains(entity)
}

pub fn position_of(world: &World, entity: Entity) -> Option<Vec2> {
    world.get::<&Position>(entity).ok().map(|p| p.0)
}

pub fn set_position(world: &mut World, entity: Entity, position: Vec2) {
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.0 = position;
    }
}

pub fn opacity_of(world: &World, entity: Entity) -> Option<f32> {
    world.get::<&Opacity>(entity).ok().map(|o| o.0)
}

pub fn set_opacity(world: &mut World, entity: Entity, alpha: f32) {
    if let Ok(mut opacity) = world.get::<&mut Opacity>(entity) {
        opacity.set(alpha);
    }
}

pub fn damage_enabled(world: &World, entity: Entity) -> Option<bool> {
    world.get::<&DamageCollider>(entity).ok().map(|d| d.enabled)
}

pub fn set_damage_enabled(world: &mut World, entity: Entity, enabled: bool) {
    if let Ok(mut collider) = world.get::<&mut DamageCollider>(entity) {
        collider.enabled = enabled;
    }
}

/// World-space collision box, if the hazard has a shape
pub fn bounds_of(world: &World, entity: Entity) -> Option<OrientedBox> {
    let pos = world.get::<&Position>(entity).ok()?;
    let collider = world.get::<&Collider>(entity).ok()?;
    Some(OrientedBox::from_collider(pos.0, &collider))
}
