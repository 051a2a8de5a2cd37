//! Combat system functions: the damage sink and hazard contact damage.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::trace;

use crate::clock::GameClock;
use crate::collision::{OrientedBox, SpatialQuery};
use crate::components::{Collider, ContactDamage, DamageCollider, DamageRoot, Health, Position, Velocity};
use crate::events::{AttackEvent, EventQueue};

/// Entity that owns the health for a collider part
pub fn damage_root(world: &World, entity: Entity) -> Entity {
    world
        .get::<&DamageRoot>(entity)
        .map(|root| root.0)
        .unwrap_or(entity)
}

/// Apply `amount` damage to `target`, pushing it along `direction` by
/// `knockback`. Returns true if the hit landed.
///
/// Hits are ignored while the target is invulnerable or has no health. A
/// landed hit re-arms the invulnerability window.
pub fn take_damage(
    world: &mut World,
    target: Entity,
    amount: i32,
    source: Vec2,
    direction: Vec2,
    knockback: f32,
    events: &mut EventQueue,
) -> bool {
    {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        if health.is_invulnerable() || health.is_dead() {
            return false;
        }
        health.current -= amount;
        health.invulnerable_for = health.invulnerability_window;
    }

    if knockback > 0.0 {
        if let Ok(mut velocity) = world.get::<&mut Velocity>(target) {
            velocity.0 += direction * knockback;
        }
    }

    events.push(AttackEvent::DamageApplied {
        target,
        amount,
        source,
    });
    true
}

/// Count down invulnerability windows
pub fn tick_invulnerability(world: &mut World, dt: f32) {
    for (_, health) in world.query_mut::<&mut Health>() {
        if health.invulnerable_for > 0.0 {
            health.invulnerable_for = (health.invulnerable_for - dt).max(0.0);
        }
    }
}

/// Damage every target touching an enabled hazard collider.
///
/// Each hazard hits a given damage root at most once per its `interval`.
/// Knockback pushes away from the hazard centre.
pub fn apply_contact_damage(
    world: &mut World,
    query: &dyn SpatialQuery,
    clock: &GameClock,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    let now = clock.time;
    let mut sources = Vec::new();
    for (entity, (pos, collider, damage, contact)) in world
        .query::<(&Position, &Collider, &DamageCollider, &ContactDamage)>()
        .iter()
    {
        if damage.enabled {
            sources.push((entity, OrientedBox::from_collider(pos.0, collider), contact.targets));
        }
    }

    for (hazard, bounds, targets) in sources {
        let touching = query.overlap_oriented_box(
            world,
            bounds.center,
            bounds.half_extents * 2.0,
            bounds.angle,
            targets,
        );

        let mut roots: Vec<Entity> = touching.into_iter().map(|e| damage_root(world, e)).collect();
        roots.sort_unstable();
        roots.dedup();

        for root in roots {
            let (amount, knockback, ready) = match world.get::<&ContactDamage>(hazard) {
                Ok(contact) => (contact.amount, contact.knockback, contact.ready_for(root, now)),
                Err(_) => break,
            };
            if !ready {
                continue;
            }

            let target_pos = world
                .get::<&Position>(root)
                .map(|p| p.0)
                .unwrap_or(bounds.center);
            let push = (target_pos - bounds.center).normalize_or_zero();

            if take_damage(world, root, amount, bounds.center, push, knockback, events) {
                trace!(?hazard, ?root, amount, "contact hit");
                if let Ok(mut contact) = world.get::<&mut ContactDamage>(hazard) {
                    contact.last_hit.insert(root, now);
                }
            }
        }
    }
}
