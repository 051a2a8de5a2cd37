//! Homing beam attack.
//!
//! The beam sweeps from the boss toward where the target was `follow_delay`
//! seconds ago, turning no faster than `turn_rate_deg` per second. Its reach
//! is cut short by the first obstacle along the aim. After a warm-up preview
//! it damages everything inside its hitbox once per `tick_interval`.

use std::collections::HashSet;

use glam::Vec2;
use hecs::Entity;
use tracing::{debug, info, warn};

use crate::attacks::{Attack, AttackContext, AttackKind};
use crate::components::BeamExtent;
use crate::config::{BeamConfig, BeamHitbox};
use crate::constants::{
    BEAM_HISTORY_SLACK, BEAM_HITBOX_THICKNESS_FACTOR, BEAM_MIN_FOLLOW_DELAY,
    BEAM_MIN_HITBOX_LENGTH,
};
use crate::events::AttackEvent;
use crate::geometry::{heading, perpendicular, rotate_towards, safe_normalize};
use crate::hazard::{self, HazardSpawn, HazardTemplate};
use crate::history::TargetHistory;
use crate::layers::LayerMask;
use crate::systems::combat::{damage_root, take_damage};

/// One-time beam setup
#[derive(Debug, Clone, Copy)]
pub struct BeamParams {
    pub origin: Entity,
    pub target: Entity,
    pub duration: f32,
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    pub max_reach: f32,
    pub thickness: f32,
    pub knockback: f32,
    pub target_filter: LayerMask,
    pub obstacle_filter: LayerMask,
}

impl BeamParams {
    pub fn from_config(config: &BeamConfig, origin: Entity, target: Entity) -> Self {
        Self {
            origin,
            target,
            duration: config.duration,
            damage_per_tick: config.damage_per_tick,
            tick_interval: config.tick_interval,
            max_reach: config.max_reach,
            thickness: config.thickness,
            knockback: config.knockback,
            target_filter: config.target_layers,
            obstacle_filter: config.obstacle_layers,
        }
    }

    /// Damage per hit, rounded up so a positive rate never rounds to nothing
    pub fn damage_per_hit(&self) -> i32 {
        (self.damage_per_tick * self.tick_interval).ceil() as i32
    }
}

/// Damage region for a beam of `length` along unit `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamHitboxShape {
    pub center: Vec2,
    /// Full (length, thickness)
    pub size: Vec2,
    pub angle: f32,
}

/// Hitbox placed along the beam, with independently tunable length,
/// thickness and offsets
pub fn beam_hitbox(
    origin: Vec2,
    direction: Vec2,
    length: f32,
    thickness: f32,
    tuning: &BeamHitbox,
) -> BeamHitboxShape {
    let length_mul = tuning.length_mul.clamp(0.1, 1.0);
    let thickness_mul = tuning.thickness_mul.clamp(0.2, 2.0);

    let used_length = (length * length_mul).max(BEAM_MIN_HITBOX_LENGTH);
    let used_thickness = thickness * BEAM_HITBOX_THICKNESS_FACTOR * thickness_mul;
    let center = origin
        + direction * (used_length * 0.5 + tuning.forward_offset)
        + perpendicular(direction) * tuning.perp_offset;

    BeamHitboxShape {
        center,
        size: Vec2::new(used_length, used_thickness),
        angle: heading(direction),
    }
}

pub struct HomingBeam {
    params: Option<BeamParams>,
    tuning: BeamConfig,
    beam: Option<Entity>,
    direction: Vec2,
    history: TargetHistory,
    remaining: f32,
    tick_accumulator: f32,
    warmup_elapsed: f32,
    warming_up: bool,
    hits: u32,
    finished: bool,
}

impl HomingBeam {
    pub fn new() -> Self {
        Self {
            params: None,
            tuning: BeamConfig::default(),
            beam: None,
            direction: Vec2::X,
            history: TargetHistory::new(),
            remaining: 0.0,
            tick_accumulator: 0.0,
            warmup_elapsed: 0.0,
            warming_up: true,
            hits: 0,
            finished: false,
        }
    }

    /// Current aim (unit vector)
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn beam_entity(&self) -> Option<Entity> {
        self.beam
    }

    pub fn is_warming_up(&self) -> bool {
        self.warming_up
    }

    /// Hits landed so far
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Spawn the beam aimed straight at the target's current position and
    /// enter the warm-up preview
    pub fn initialize(&mut self, ctx: &mut AttackContext<'_>, params: BeamParams, tuning: &BeamConfig) {
        self.release(ctx);

        let origin = hazard::position_of(ctx.world, params.origin).unwrap_or(Vec2::ZERO);
        let target = hazard::position_of(ctx.world, params.target).unwrap_or(origin);

        self.params = Some(params);
        self.tuning = tuning.clone();
        self.direction = safe_normalize(target - origin, Vec2::X);
        self.history.clear();
        self.remaining = params.duration;
        self.tick_accumulator = 0.0;
        self.warmup_elapsed = 0.0;
        self.warming_up = true;
        self.hits = 0;
        self.finished = false;

        let template = HazardTemplate {
            half_extents: None,
            contact_damage: None,
        };
        let spawn = HazardSpawn {
            position: origin,
            angle: heading(self.direction),
            opacity: tuning.warmup_alpha,
            damage_enabled: false,
        };
        let extent = BeamExtent {
            start: origin,
            end: origin + self.direction * params.max_reach,
            direction: self.direction,
            length: params.max_reach,
            width: params.thickness,
        };
        let beam = hazard::spawn_hazard_with(ctx.world, &template, spawn, extent, ctx.events);
        self.beam = Some(beam);
    }

    /// Despawn the beam entity, if any
    fn release(&mut self, ctx: &mut AttackContext<'_>) {
        if let Some(beam) = self.beam.take() {
            hazard::despawn_hazard(ctx.world, beam, ctx.events);
        }
    }

    fn kill(&mut self, ctx: &mut AttackContext<'_>) {
        self.release(ctx);
        self.finished = true;
    }

    /// Where to aim this frame: the interpolated past position of the target
    fn delayed_target(&self, now: f32, current: Vec2) -> Vec2 {
        if self.tuning.follow_delay <= BEAM_MIN_FOLLOW_DELAY {
            return current;
        }
        self.history
            .position_at(now - self.tuning.follow_delay)
            .unwrap_or(current)
    }

    fn update_visual(&self, ctx: &mut AttackContext<'_>, origin: Vec2, length: f32, thickness: f32) {
        let Some(beam) = self.beam else {
            return;
        };
        let pulse = 1.0 + (ctx.now() * self.tuning.pulse_speed).sin() * self.tuning.pulse_intensity;
        hazard::set_position(ctx.world, beam, origin);
        if let Ok(mut extent) = ctx.world.get::<&mut BeamExtent>(beam) {
            *extent = BeamExtent {
                start: origin,
                end: origin + self.direction * length,
                direction: self.direction,
                length,
                width: thickness * pulse,
            };
        }
    }

    fn end_warmup(&mut self, ctx: &mut AttackContext<'_>) {
        self.warming_up = false;
        if let Some(beam) = self.beam {
            hazard::set_opacity(ctx.world, beam, 1.0);
        }
        debug!("beam warm-up ended");
        ctx.events.push(AttackEvent::BeamWarmupEnded);
    }

    /// Damage everything in the hitbox, once per damage root
    fn apply_damage(&mut self, ctx: &mut AttackContext<'_>, params: &BeamParams, origin: Vec2, length: f32) {
        let shape = beam_hitbox(origin, self.direction, length, params.thickness, &self.tuning.hitbox);
        let overlapping = ctx.query.overlap_oriented_box(
            ctx.world,
            shape.center,
            shape.size,
            shape.angle,
            params.target_filter,
        );

        let amount = params.damage_per_hit();
        let mut struck = HashSet::new();
        for entity in overlapping {
            let root = damage_root(ctx.world, entity);
            if !struck.insert(root) {
                continue;
            }
            if take_damage(
                ctx.world,
                root,
                amount,
                shape.center,
                self.direction,
                params.knockback,
                ctx.events,
            ) {
                self.hits += 1;
            }
        }
    }
}

impl Default for HomingBeam {
    fn default() -> Self {
        Self::new()
    }
}

impl Attack for HomingBeam {
    fn kind(&self) -> AttackKind {
        AttackKind::Beam
    }

    fn start(&mut self, ctx: &mut AttackContext<'_>) {
        if let Err(err) = ctx.config.beam.validate() {
            warn!(%err, "homing beam misconfigured, cancelling attack");
            self.finished = true;
            return;
        }
        let Some(target) = ctx.target.filter(|&t| hazard::is_alive(ctx.world, t)) else {
            warn!("homing beam has no target, cancelling attack");
            self.finished = true;
            return;
        };
        if !hazard::is_alive(ctx.world, ctx.boss) {
            self.finished = true;
            return;
        }

        let tuning = ctx.config.beam.clone();
        let params = BeamParams::from_config(&tuning, ctx.boss, target);
        self.initialize(ctx, params, &tuning);
        ctx.request_extra_spawns(AttackKind::Beam);
        info!(duration = params.duration, "homing beam started");
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if self.finished {
            return;
        }
        puffin::profile_function!();

        let Some(params) = self.params else {
            self.finished = true;
            return;
        };
        let (Some(origin), Some(target)) = (
            hazard::position_of(ctx.world, params.origin),
            hazard::position_of(ctx.world, params.target),
        ) else {
            warn!("homing beam lost its origin or target");
            self.kill(ctx);
            return;
        };

        let dt = ctx.dt();
        let now = ctx.now();
        self.remaining -= dt;
        self.tick_accumulator += dt;

        // Time-based, so skipped frames can't shorten the preview
        if self.warming_up {
            self.warmup_elapsed += dt;
            if self.warmup_elapsed >= self.tuning.warmup_time {
                self.end_warmup(ctx);
            }
        }

        self.history.push(now, target);
        let retention = self.tuning.history_window.max(self.tuning.follow_delay);
        self.history.evict_before(now - retention - BEAM_HISTORY_SLACK);

        let aim_point = self.delayed_target(now, target);
        let desired = safe_normalize(aim_point - origin, self.direction);
        let max_turn = self.tuning.turn_rate_deg.to_radians() * dt;
        self.direction = rotate_towards(self.direction, desired, max_turn);

        let length = ctx
            .query
            .raycast(ctx.world, origin, self.direction, params.max_reach, params.obstacle_filter)
            .map_or(params.max_reach, |hit| hit.distance);

        self.update_visual(ctx, origin, length, params.thickness);

        if self.tick_accumulator >= params.tick_interval {
            self.tick_accumulator = 0.0;
            if !self.warming_up {
                self.apply_damage(ctx, &params, origin, length);
            }
        }

        if self.remaining <= 0.0 {
            info!(hits = self.hits, "homing beam expired");
            self.kill(ctx);
        }
    }

    fn stop(&mut self, ctx: &mut AttackContext<'_>) {
        self.kill(ctx);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacks::test_support::TestBed;
    use crate::components::{Collider, DamageRoot, Health, Layer, Position};
    use crate::config::BossConfig;

    const DT: f32 = 1.0 / 60.0;

    /// Boss at the origin, target on +x inside the beam's path
    fn bed_with(tweak: impl FnOnce(&mut BeamConfig)) -> TestBed {
        let mut config = BossConfig::default();
        tweak(&mut config.beam);
        let mut bed = TestBed::new(config);
        bed.world.insert_one(bed.boss, Position::new(0.0, 0.0)).unwrap();
        let target = spawn_player(&mut bed, Vec2::new(5.0, 0.0));
        bed.target = Some(target);
        bed
    }

    fn spawn_player(bed: &mut TestBed, at: Vec2) -> Entity {
        bed.world.spawn((
            Position(at),
            Collider::aabb(Vec2::splat(0.3)),
            Layer(LayerMask::PLAYER),
            Health::new(100),
        ))
    }

    fn health(bed: &TestBed, e: Entity) -> i32 {
        bed.world.get::<&Health>(e).unwrap().current
    }

    fn move_target(bed: &mut TestBed, to: Vec2) {
        let target = bed.target.unwrap();
        bed.world.get::<&mut Position>(target).unwrap().0 = to;
    }

    #[test]
    fn test_damage_per_hit_rounds_up() {
        let params = BeamParams::from_config(&BeamConfig::default(), Entity::DANGLING, Entity::DANGLING);
        assert_eq!(params.damage_per_hit(), 1);
        let params = BeamParams {
            damage_per_tick: 10.0,
            tick_interval: 0.25,
            ..params
        };
        assert_eq!(params.damage_per_hit(), 3);
    }

    #[test]
    fn test_hitbox_placement() {
        let tuning = BeamHitbox {
            length_mul: 0.5,
            thickness_mul: 1.0,
            forward_offset: 1.0,
            perp_offset: 0.5,
        };
        let shape = beam_hitbox(Vec2::ZERO, Vec2::X, 10.0, 1.0, &tuning);
        assert_eq!(shape.size, Vec2::new(5.0, 1.2));
        assert!(shape.center.distance(Vec2::new(3.5, 0.5)) < 1e-5);

        let tiny = beam_hitbox(Vec2::ZERO, Vec2::X, 0.0, 1.0, &BeamHitbox::default());
        assert_eq!(tiny.size.x, BEAM_MIN_HITBOX_LENGTH);
    }

    #[test]
    fn test_no_damage_during_warmup() {
        let mut bed = bed_with(|b| {
            b.warmup_time = 1.0;
            b.duration = 5.0;
        });
        let target = bed.target.unwrap();
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);

        let beam_entity = beam.beam_entity().unwrap();
        assert_eq!(hazard::opacity_of(&bed.world, beam_entity), Some(0.35));

        // 0.9s: still warming up
        for _ in 0..54 {
            bed.tick(&mut beam, DT);
        }
        assert!(beam.is_warming_up());
        assert_eq!(health(&bed, target), 100);

        // 1.5s: at least one damage tick after warm-up
        for _ in 0..36 {
            bed.tick(&mut beam, DT);
        }
        assert!(!beam.is_warming_up());
        assert!(health(&bed, target) < 100);
        assert_eq!(hazard::opacity_of(&bed.world, beam_entity), Some(1.0));
        assert!(bed.drain_events().contains(&AttackEvent::BeamWarmupEnded));
    }

    #[test]
    fn test_turn_rate_is_limited() {
        let mut bed = bed_with(|b| {
            b.follow_delay = 0.0;
            b.turn_rate_deg = 90.0;
        });
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        assert!(beam.direction().distance(Vec2::X) < 1e-5);

        // Target jumps to +y; one 0.1s tick may only turn 9 degrees
        move_target(&mut bed, Vec2::new(0.0, 5.0));
        bed.tick(&mut beam, 0.1);
        let angle = heading(beam.direction()).to_degrees();
        assert!((angle - 9.0).abs() < 1e-3, "turned {angle} degrees");
    }

    #[test]
    fn test_aims_at_delayed_position() {
        let mut bed = bed_with(|b| {
            b.follow_delay = 0.5;
            b.turn_rate_deg = 100_000.0;
        });
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);

        // Stay on +x for 1s, then jump to +y
        for _ in 0..60 {
            bed.tick(&mut beam, DT);
        }
        move_target(&mut bed, Vec2::new(0.0, 5.0));
        for _ in 0..6 {
            bed.tick(&mut beam, DT);
        }
        // Still aiming where the target was half a second ago
        assert!(beam.direction().distance(Vec2::X) < 1e-3);

        for _ in 0..36 {
            bed.tick(&mut beam, DT);
        }
        assert!(beam.direction().distance(Vec2::Y) < 1e-3);
    }

    #[test]
    fn test_obstacle_truncates_reach() {
        let mut bed = bed_with(|b| b.follow_delay = 0.0);
        bed.world.spawn((
            Position::new(3.0, 0.0),
            Collider::aabb(Vec2::splat(0.5)),
            Layer(LayerMask::OBSTACLE),
        ));
        let target = bed.target.unwrap();
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        for _ in 0..120 {
            bed.tick(&mut beam, DT);
        }

        let extent = *bed
            .world
            .get::<&BeamExtent>(beam.beam_entity().unwrap())
            .unwrap();
        assert!((extent.length - 2.5).abs() < 1e-4);
        assert!(extent.end.distance(Vec2::new(2.5, 0.0)) < 1e-4);
        // Target behind the wall is out of the hitbox
        assert_eq!(health(&bed, target), 100);
    }

    #[test]
    fn test_multi_part_target_hit_once_per_tick() {
        let mut bed = bed_with(|b| {
            b.warmup_time = 0.0;
            b.tick_interval = 0.25;
            b.knockback = 0.0;
        });
        let target = bed.target.unwrap();
        // A second collider part owned by the same target
        bed.world.spawn((
            Position::new(6.0, 0.0),
            Collider::aabb(Vec2::splat(0.3)),
            Layer(LayerMask::PLAYER),
            DamageRoot(target),
        ));
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        bed.tick(&mut beam, 0.25);

        assert_eq!(health(&bed, target), 99);
        assert_eq!(beam.hits(), 1);
    }

    #[test]
    fn test_expires_and_releases_beam() {
        let mut bed = bed_with(|b| b.duration = 0.5);
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        assert_eq!(bed.hazard_count(), 1);
        for _ in 0..31 {
            bed.tick(&mut beam, DT);
        }
        assert!(beam.is_finished());
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_lost_target_kills_beam() {
        let mut bed = bed_with(|_| {});
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        let target = bed.target.unwrap();
        bed.world.despawn(target).unwrap();
        bed.tick(&mut beam, DT);
        assert!(beam.is_finished());
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_lost_origin_kills_beam() {
        let mut bed = bed_with(|_| {});
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        assert_eq!(bed.hazard_count(), 1);
        bed.world.despawn(bed.boss).unwrap();
        bed.tick(&mut beam, DT);
        assert!(beam.is_finished());
        assert!(beam.beam_entity().is_none());
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_target_on_origin_keeps_previous_aim() {
        let mut bed = bed_with(|b| b.follow_delay = 0.0);
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        bed.tick(&mut beam, DT);
        assert!(beam.direction().distance(Vec2::X) < 1e-6);

        move_target(&mut bed, Vec2::ZERO);
        for _ in 0..10 {
            bed.tick(&mut beam, DT);
        }
        assert!(beam.direction().is_finite());
        assert!(beam.direction().distance(Vec2::X) < 1e-6);
        let extent = *bed
            .world
            .get::<&BeamExtent>(beam.beam_entity().unwrap())
            .unwrap();
        assert!(extent.end.is_finite());
    }

    #[test]
    fn test_start_without_target_finishes() {
        let mut bed = bed_with(|_| {});
        bed.target = None;
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        assert!(beam.is_finished());
        assert_eq!(bed.hazard_count(), 0);
        bed.stop(&mut beam);
    }

    #[test]
    fn test_full_reach_without_obstacles() {
        let mut bed = bed_with(|b| b.follow_delay = 0.0);
        let mut beam = HomingBeam::new();
        bed.start(&mut beam);
        bed.tick(&mut beam, DT);
        let extent = *bed
            .world
            .get::<&BeamExtent>(beam.beam_entity().unwrap())
            .unwrap();
        assert_eq!(extent.length, BeamConfig::default().max_reach);
    }
}
