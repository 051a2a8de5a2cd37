//! Headless boss arena - owns the simulation data and drives one frame.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::{debug, info};

use crate::attacks::AttackContext;
use crate::clock::GameClock;
use crate::collision::WorldQuery;
use crate::components::{Collider, Health, Layer, Position, ScriptedPath, Velocity};
use crate::config::BossConfig;
use crate::controller::AttackController;
use crate::events::{AttackEvent, EventQueue};
use crate::layers::LayerMask;
use crate::systems;

/// Distance from the boss at which requested extra enemies appear
const EXTRA_SPAWN_RADIUS: f32 = 2.0;

/// Running totals over a simulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArenaStats {
    pub attacks_started: u32,
    pub attacks_finished: u32,
    pub attacks_preempted: u32,
    /// Hits landed on the player
    pub player_hits: u32,
    pub player_damage: i32,
    pub extra_spawns: u32,
}

/// Boss arena state - owns all simulation data.
pub struct Arena {
    /// The ECS world
    pub world: World,

    /// Simulation clock
    pub clock: GameClock,

    pub config: BossConfig,

    /// Runs one boss attack at a time
    pub controller: AttackController,

    /// Events pushed this frame, drained by `advance`
    pub events: EventQueue,

    pub boss: Entity,
    pub player: Entity,

    query: WorldQuery,
    stats: ArenaStats,
}

impl Arena {
    /// Build the arena: boss, orbiting player and static obstacles
    pub fn new(config: BossConfig) -> Self {
        let mut world = World::new();
        let arena = &config.arena;

        let boss = world.spawn((
            Position(arena.boss_position),
            Layer(LayerMask::ENEMY),
        ));

        let orbit = ScriptedPath::Orbit {
            center: Vec2::ZERO,
            radius: arena.player_orbit_radius,
            angular_speed: arena.player_orbit_speed,
            phase: 0.0,
        };
        let player = world.spawn((
            Position(systems::scripted_position(&orbit, Vec2::ZERO, 0.0)),
            Collider::aabb(arena.player_half_extents),
            Layer(LayerMask::PLAYER),
            Health::new(arena.player_health).with_invulnerability(arena.player_invulnerability),
            Velocity::default(),
            orbit,
        ));

        for obstacle in &arena.obstacles {
            world.spawn((
                Position(obstacle.center),
                Collider::aabb(obstacle.half_extents),
                Layer(LayerMask::OBSTACLE),
            ));
        }

        let controller = AttackController::new(&config.controller);
        Self {
            world,
            clock: GameClock::new(),
            config,
            controller,
            events: EventQueue::new(),
            boss,
            player,
            query: WorldQuery,
            stats: ArenaStats::default(),
        }
    }

    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    pub fn player_health(&self) -> Option<Health> {
        self.world.get::<&Health>(self.player).ok().map(|h| *h)
    }

    /// True once the player has died
    pub fn is_over(&self) -> bool {
        self.player_health().map_or(true, |h| h.is_dead())
    }

    /// Advance one frame by `dt` and return the events it produced
    pub fn advance(&mut self, dt: f32) -> Vec<AttackEvent> {
        puffin::profile_function!();

        self.clock.tick(dt);
        systems::follow_scripted_paths(&mut self.world, self.clock.time, dt);
        systems::integrate_velocity(&mut self.world, dt);
        systems::tick_invulnerability(&mut self.world, dt);

        let mut ctx = AttackContext {
            world: &mut self.world,
            clock: &self.clock,
            config: &self.config,
            query: &self.query,
            events: &mut self.events,
            boss: self.boss,
            target: Some(self.player),
        };
        self.controller.tick(&mut ctx);

        systems::apply_contact_damage(&mut self.world, &self.query, &self.clock, &mut self.events);

        let events: Vec<AttackEvent> = self.events.drain().collect();
        for event in &events {
            self.record(event);
        }
        events
    }

    /// Stop the running attack, if any
    pub fn preempt(&mut self) -> Vec<AttackEvent> {
        let mut ctx = AttackContext {
            world: &mut self.world,
            clock: &self.clock,
            config: &self.config,
            query: &self.query,
            events: &mut self.events,
            boss: self.boss,
            target: Some(self.player),
        };
        self.controller.preempt(&mut ctx);

        let events: Vec<AttackEvent> = self.events.drain().collect();
        for event in &events {
            self.record(event);
        }
        events
    }

    fn record(&mut self, event: &AttackEvent) {
        match *event {
            AttackEvent::AttackStarted { .. } => self.stats.attacks_started += 1,
            AttackEvent::AttackFinished { early, .. } => {
                self.stats.attacks_finished += 1;
                if early {
                    self.stats.attacks_preempted += 1;
                }
            }
            AttackEvent::DamageApplied { target, amount, .. } if target == self.player => {
                self.stats.player_hits += 1;
                self.stats.player_damage += amount;
            }
            AttackEvent::ExtraSpawnsRequested { attack, count } => {
                debug!(attack = attack.name(), count, "spawning extra enemies");
                self.spawn_extra_enemies(count);
            }
            _ => {}
        }
    }

    /// Place `count` enemies evenly on a ring around the boss
    fn spawn_extra_enemies(&mut self, count: u32) {
        let center = self
            .world
            .get::<&Position>(self.boss)
            .map(|p| p.0)
            .unwrap_or(Vec2::ZERO);
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let at = center + Vec2::from_angle(angle) * EXTRA_SPAWN_RADIUS;
            self.world.spawn((
                Position(at),
                Collider::aabb(Vec2::splat(0.3)),
                Layer(LayerMask::ENEMY),
                Health::new(10),
            ));
        }
        self.stats.extra_spawns += count;
        if count > 0 {
            info!(count, "extra enemies joined the fight");
        }
    }
}
