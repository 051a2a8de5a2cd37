//! Closing walls attack.
//!
//! Two walls spawn at fixed anchors and, per wave, run the choreography
//!
//! ```text
//! Warning -> Spawn -> [SlowApproach -> Retreat ->] FastApproach -> Holding -> Gap
//! ```
//!
//! The bracketed stages only run when both midpoint anchors are configured.
//! Every duration is scaled by `time_mul^wave` and every speed by
//! `speed_mul^wave`, so later waves replay the sequence faster and shorter.
//!
//! Opacity and damage are driven separately. Walls spawn invisible and
//! harmless, fade in during the slow approach, become damaging for the rush,
//! and keep their colliders on for a short while into the hold fade so a
//! target caught at impact still gets hit.

use glam::Vec2;
use hecs::Entity;
use tracing::{debug, info, warn};

use crate::attacks::{Attack, AttackContext, AttackKind};
use crate::clock::PhaseTimer;
use crate::config::WallsConfig;
use crate::error::ConfigError;
use crate::events::AttackEvent;
use crate::geometry::{extent_along, move_towards, safe_normalize};
use crate::hazard::{self, HazardSpawn, HazardTemplate};
use crate::wave::WaveScaling;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallsPhase {
    Warning,
    Spawn,
    SlowApproach,
    Retreat,
    FastApproach,
    Holding,
    Gap,
}

/// Collider switch-off time within the hold phase.
///
/// The delay is clamped to the hold duration so the colliders are always off
/// by the time the walls are destroyed.
pub fn collider_disable_time(collider_disable_delay: f32, scaled_hold_time: f32) -> f32 {
    collider_disable_delay.min(scaled_hold_time)
}

/// Validated walls configuration, captured at `start`
#[derive(Debug, Clone)]
struct WallsPlan {
    left_template: HazardTemplate,
    right_template: HazardTemplate,
    left_spawn: Vec2,
    right_spawn: Vec2,
    midpoints: Option<(Vec2, Vec2)>,
    scaling: WaveScaling,
    tuning: WallsConfig,
}

impl WallsPlan {
    fn from_config(config: &WallsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let left_template = config
            .left_template
            .clone()
            .ok_or(ConfigError::MissingTemplate("walls.left_template"))?;
        let right_template = config
            .right_template
            .clone()
            .ok_or(ConfigError::MissingTemplate("walls.right_template"))?;
        let left_spawn = config
            .left_spawn
            .ok_or(ConfigError::MissingAnchor("walls.left_spawn"))?;
        let right_spawn = config
            .right_spawn
            .ok_or(ConfigError::MissingAnchor("walls.right_spawn"))?;

        Ok(Self {
            left_template,
            right_template,
            left_spawn,
            right_spawn,
            midpoints: config.midpoints(),
            scaling: config.scaling(),
            tuning: config.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct WallPair {
    left: Entity,
    right: Entity,
}

pub struct ClosingWalls {
    phase: WallsPhase,
    timer: PhaseTimer,
    wave: u32,
    finished: bool,
    plan: Option<WallsPlan>,
    walls: Option<WallPair>,
    /// Approach axis for the rush, from left wall toward right wall
    rush_axis: Vec2,
    colliders_off: bool,
}

impl ClosingWalls {
    pub fn new() -> Self {
        Self {
            phase: WallsPhase::Warning,
            timer: PhaseTimer::new(),
            wave: 0,
            finished: false,
            plan: None,
            walls: None,
            rush_axis: Vec2::X,
            colliders_off: false,
        }
    }

    pub fn phase(&self) -> WallsPhase {
        self.phase
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Live wall entities (left, right)
    pub fn walls(&self) -> Option<(Entity, Entity)> {
        self.walls.map(|w| (w.left, w.right))
    }

    fn enter_phase(&mut self, phase: WallsPhase, ctx: &mut AttackContext<'_>) {
        debug!(?phase, wave = self.wave, "walls phase");
        self.phase = phase;
        self.timer.reset();
        ctx.events.push(AttackEvent::WallsPhaseEntered {
            phase,
            wave: self.wave,
        });
    }

    /// The pair, if both walls still exist
    fn live_walls(&self, ctx: &AttackContext<'_>) -> Option<WallPair> {
        let pair = self.walls?;
        (hazard::is_alive(ctx.world, pair.left) && hazard::is_alive(ctx.world, pair.right))
            .then_some(pair)
    }

    fn set_both_opacity(ctx: &mut AttackContext<'_>, pair: WallPair, alpha: f32) {
        hazard::set_opacity(ctx.world, pair.left, alpha);
        hazard::set_opacity(ctx.world, pair.right, alpha);
    }

    fn set_both_damage(ctx: &mut AttackContext<'_>, pair: WallPair, enabled: bool) {
        hazard::set_damage_enabled(ctx.world, pair.left, enabled);
        hazard::set_damage_enabled(ctx.world, pair.right, enabled);
    }

    fn destroy_walls(&mut self, ctx: &mut AttackContext<'_>) {
        if let Some(pair) = self.walls.take() {
            hazard::despawn_hazard(ctx.world, pair.left, ctx.events);
            hazard::despawn_hazard(ctx.world, pair.right, ctx.events);
        }
    }

    // =========================================================================
    // PHASES
    // =========================================================================

    fn update_warning(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let warn_time = plan.scaling.scaled_duration(plan.tuning.warn_time, self.wave);
        if self.timer.has_elapsed(warn_time) {
            self.enter_phase(WallsPhase::Spawn, ctx);
            self.spawn_walls(plan, ctx);
        }
    }

    /// Spawn both walls invisible and harmless, then pick the choreography
    fn spawn_walls(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        self.colliders_off = false;
        self.destroy_walls(ctx);

        let hidden = |position| HazardSpawn {
            position,
            angle: 0.0,
            opacity: 0.0,
            damage_enabled: false,
        };
        let left = hazard::spawn_hazard(
            ctx.world,
            &plan.left_template,
            hidden(plan.left_spawn),
            ctx.events,
        );
        let right = hazard::spawn_hazard(
            ctx.world,
            &plan.right_template,
            hidden(plan.right_spawn),
            ctx.events,
        );
        self.walls = Some(WallPair { left, right });
        debug!(left = ?plan.left_spawn, right = ?plan.right_spawn, "walls spawned");

        if plan.midpoints.is_some() {
            self.enter_phase(WallsPhase::SlowApproach, ctx);
        } else {
            self.enter_fast_approach(ctx);
        }
    }

    /// Move both walls toward their targets; true once both are within
    /// `epsilon`. `move_towards` lands exactly on the target, so zero works.
    fn approach(
        ctx: &mut AttackContext<'_>,
        pair: WallPair,
        targets: (Vec2, Vec2),
        step: f32,
        epsilon: f32,
    ) -> bool {
        let mut arrived = true;
        for (entity, target) in [(pair.left, targets.0), (pair.right, targets.1)] {
            let Some(current) = hazard::position_of(ctx.world, entity) else {
                continue;
            };
            let next = move_towards(current, target, step);
            hazard::set_position(ctx.world, entity, next);
            arrived &= next.distance(target) <= epsilon;
        }
        arrived
    }

    fn update_slow_approach(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let (Some(pair), Some(midpoints)) = (self.live_walls(ctx), plan.midpoints) else {
            self.gap_after_error(ctx);
            return;
        };

        let step = plan.scaling.scaled_speed(plan.tuning.move_speed, self.wave) * ctx.dt();
        let arrived = Self::approach(ctx, pair, midpoints, step, plan.tuning.arrival_epsilon);

        // Fade-in runs on its own clock, independent of the approach length
        Self::set_both_opacity(ctx, pair, self.timer.fraction(plan.tuning.fade_in_duration));

        if arrived {
            self.enter_phase(WallsPhase::Retreat, ctx);
        }
    }

    fn update_retreat(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let Some(pair) = self.live_walls(ctx) else {
            self.gap_after_error(ctx);
            return;
        };

        let step = plan.scaling.scaled_speed(plan.tuning.move_speed, self.wave) * ctx.dt();
        let spawns = (plan.left_spawn, plan.right_spawn);
        let arrived = Self::approach(ctx, pair, spawns, step, plan.tuning.arrival_epsilon);
        Self::set_both_opacity(ctx, pair, 1.0);

        if arrived {
            self.enter_fast_approach(ctx);
        }
    }

    fn enter_fast_approach(&mut self, ctx: &mut AttackContext<'_>) {
        if let Some(pair) = self.live_walls(ctx) {
            let left = hazard::position_of(ctx.world, pair.left).unwrap_or(Vec2::ZERO);
            let right = hazard::position_of(ctx.world, pair.right).unwrap_or(Vec2::ZERO);
            self.rush_axis = safe_normalize(right - left, Vec2::X);
            Self::set_both_damage(ctx, pair, true);
        }
        self.enter_phase(WallsPhase::FastApproach, ctx);
    }

    fn update_fast_approach(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let Some(pair) = self.live_walls(ctx) else {
            self.gap_after_error(ctx);
            return;
        };

        let axis = self.rush_axis;
        let speed = plan.scaling.scaled_speed(plan.tuning.fast_move_speed, self.wave);
        let step = axis * speed * ctx.dt();

        let (Some(lp), Some(rp)) = (
            hazard::position_of(ctx.world, pair.left),
            hazard::position_of(ctx.world, pair.right),
        ) else {
            self.gap_after_error(ctx);
            return;
        };
        let (lp, rp) = (lp + step, rp - step);
        hazard::set_position(ctx.world, pair.left, lp);
        hazard::set_position(ctx.world, pair.right, rp);
        Self::set_both_opacity(ctx, pair, 1.0);

        let collided = match (
            hazard::bounds_of(ctx.world, pair.left),
            hazard::bounds_of(ctx.world, pair.right),
        ) {
            (Some(lb), Some(rb)) => {
                let left_edge = lb.center.dot(axis) + extent_along(lb.half_extents, lb.angle, axis);
                let right_edge =
                    rb.center.dot(axis) - extent_along(rb.half_extents, rb.angle, axis);
                let overlap = left_edge - right_edge;
                if overlap > 0.0 {
                    // Split the overlap so the walls end up exactly touching
                    let half = axis * (overlap * 0.5);
                    hazard::set_position(ctx.world, pair.left, lp - half);
                    hazard::set_position(ctx.world, pair.right, rp + half);
                }
                overlap >= 0.0
            }
            // No shapes: contact once the centres cross
            _ => (rp - lp).dot(axis) <= 0.0,
        };

        if collided {
            debug!(wave = self.wave, "walls contact, holding");
            self.enter_phase(WallsPhase::Holding, ctx);
        }
    }

    fn update_holding(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let Some(pair) = self.live_walls(ctx) else {
            self.gap_after_error(ctx);
            return;
        };

        let hold_time = plan.scaling.scaled_duration(plan.tuning.hold_time, self.wave);

        // Visual fade starts immediately
        let alpha = 1.0 - self.timer.fraction(plan.tuning.fade_out_duration);
        Self::set_both_opacity(ctx, pair, alpha);

        // Colliders only switch off after the delay
        let disable_at = collider_disable_time(plan.tuning.collider_disable_delay, hold_time);
        if !self.colliders_off && self.timer.has_elapsed(disable_at) {
            self.colliders_off = true;
            Self::set_both_damage(ctx, pair, false);
            ctx.events.push(AttackEvent::CollidersDisabled {
                phase_time: self.timer.elapsed(),
            });
        }

        if self.timer.has_elapsed(hold_time) {
            self.destroy_walls(ctx);
            self.enter_phase(WallsPhase::Gap, ctx);
        }
    }

    fn update_gap(&mut self, plan: &WallsPlan, ctx: &mut AttackContext<'_>) {
        let gap = plan.scaling.scaled_duration(plan.tuning.wave_gap, self.wave);
        if !self.timer.has_elapsed(gap) {
            return;
        }

        self.wave += 1;
        if self.wave < plan.tuning.waves {
            info!(wave = self.wave + 1, of = plan.tuning.waves, "walls wave warning");
            self.enter_phase(WallsPhase::Warning, ctx);
        } else {
            info!(waves = plan.tuning.waves, "closing walls complete");
            self.finished = true;
        }
    }

    /// A wall vanished out-of-band: clean up and skip to the gap
    fn gap_after_error(&mut self, ctx: &mut AttackContext<'_>) {
        warn!(phase = ?self.phase, wave = self.wave, "wall lost mid-phase, skipping to gap");
        self.destroy_walls(ctx);
        self.enter_phase(WallsPhase::Gap, ctx);
    }
}

impl Default for ClosingWalls {
    fn default() -> Self {
        Self::new()
    }
}

impl Attack for ClosingWalls {
    fn kind(&self) -> AttackKind {
        AttackKind::Walls
    }

    fn start(&mut self, ctx: &mut AttackContext<'_>) {
        self.finished = false;
        self.wave = 0;

        let plan = match WallsPlan::from_config(&ctx.config.walls) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(%err, "closing walls misconfigured, cancelling attack");
                self.finished = true;
                return;
            }
        };
        if plan.tuning.waves == 0 {
            self.finished = true;
            return;
        }
        self.plan = Some(plan);

        ctx.request_extra_spawns(AttackKind::Walls);
        info!(wave = 1, "walls wave warning");
        self.enter_phase(WallsPhase::Warning, ctx);
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if self.finished {
            return;
        }
        puffin::profile_function!();

        let Some(plan) = self.plan.take() else {
            self.finished = true;
            return;
        };

        self.timer.advance(ctx.dt());
        match self.phase {
            WallsPhase::Warning => self.update_warning(&plan, ctx),
            // Spawn is left on the tick it is entered
            WallsPhase::Spawn => {}
            WallsPhase::SlowApproach => self.update_slow_approach(&plan, ctx),
            WallsPhase::Retreat => self.update_retreat(&plan, ctx),
            WallsPhase::FastApproach => self.update_fast_approach(&plan, ctx),
            WallsPhase::Holding => self.update_holding(&plan, ctx),
            WallsPhase::Gap => self.update_gap(&plan, ctx),
        }

        self.plan = Some(plan);
    }

    fn stop(&mut self, ctx: &mut AttackContext<'_>) {
        self.destroy_walls(ctx);
        self.finished = true;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacks::test_support::TestBed;
    use crate::config::BossConfig;
    use crate::hazard::{damage_enabled, opacity_of, position_of};

    const DT: f32 = 1.0 / 64.0;

    fn walls_config(tweak: impl FnOnce(&mut WallsConfig)) -> BossConfig {
        let mut config = BossConfig::default();
        tweak(&mut config.walls);
        config
    }

    fn phases(events: &[AttackEvent]) -> Vec<(WallsPhase, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                AttackEvent::WallsPhaseEntered { phase, wave } => Some((*phase, *wave)),
                _ => None,
            })
            .collect()
    }

    fn run_to_end(bed: &mut TestBed, walls: &mut ClosingWalls, max_ticks: usize) -> Vec<AttackEvent> {
        let mut events = bed.drain_events();
        for _ in 0..max_ticks {
            if walls.is_finished() {
                break;
            }
            bed.tick(walls, DT);
            events.extend(bed.drain_events());
        }
        events
    }

    #[test]
    fn test_collider_disable_time_is_clamped() {
        assert_eq!(collider_disable_time(0.12, 0.05), 0.05);
        assert_eq!(collider_disable_time(0.12, 0.6), 0.12);
    }

    #[test]
    fn test_two_stage_phase_sequence() {
        let mut bed = TestBed::new(walls_config(|w| w.waves = 2));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        let events = run_to_end(&mut bed, &mut walls, 10_000);

        assert!(walls.is_finished());
        use WallsPhase::*;
        let per_wave = [Warning, Spawn, SlowApproach, Retreat, FastApproach, Holding, Gap];
        let expected: Vec<_> = (0..2)
            .flat_map(|w| per_wave.iter().map(move |&p| (p, w)))
            .collect();
        assert_eq!(phases(&events), expected);
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_single_stage_without_midpoints() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.waves = 1;
            w.left_mid = None;
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        let events = run_to_end(&mut bed, &mut walls, 10_000);

        use WallsPhase::*;
        assert_eq!(
            phases(&events),
            vec![(Warning, 0), (Spawn, 0), (FastApproach, 0), (Holding, 0), (Gap, 0)]
        );
    }

    #[test]
    fn test_contact_leaves_walls_exactly_touching() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.left_mid = None;
            w.right_mid = None;
            w.fast_move_speed = 37.0;
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        for _ in 0..1000 {
            bed.tick(&mut walls, DT);
            if walls.phase() == WallsPhase::Holding {
                break;
            }
        }
        assert_eq!(walls.phase(), WallsPhase::Holding);

        let (left, right) = walls.walls().unwrap();
        let lp = position_of(&bed.world, left).unwrap();
        let rp = position_of(&bed.world, right).unwrap();
        // Default template half width is 0.5 on each wall
        assert!(((rp.x - lp.x) - 1.0).abs() < 1e-4, "separation {}", rp.x - lp.x);
    }

    #[test]
    fn test_positions_cross_without_shapes() {
        let shapeless = HazardTemplate {
            half_extents: None,
            contact_damage: None,
        };
        let mut bed = TestBed::new(walls_config(|w| {
            w.left_mid = None;
            w.left_template = Some(shapeless.clone());
            w.right_template = Some(shapeless);
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        for _ in 0..1000 {
            bed.tick(&mut walls, DT);
            if walls.phase() == WallsPhase::Holding {
                break;
            }
        }
        let (left, right) = walls.walls().unwrap();
        let lp = position_of(&bed.world, left).unwrap();
        let rp = position_of(&bed.world, right).unwrap();
        assert!(lp.x >= rp.x);
    }

    #[test]
    fn test_reaches_holding_in_expected_time() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.waves = 1;
            w.left_mid = None;
            w.right_mid = None;
            w.warn_time = 0.2;
            w.fast_move_speed = 100.0;
            w.left_spawn = Some(Vec2::new(-5.0, 0.0));
            w.right_spawn = Some(Vec2::new(5.0, 0.0));
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        let mut elapsed = 0.0;
        while walls.phase() != WallsPhase::Holding && elapsed < 2.0 {
            bed.tick(&mut walls, DT);
            elapsed += DT;
        }
        assert_eq!(walls.phase(), WallsPhase::Holding);
        assert!(elapsed <= 0.2 + 10.0 / 100.0 + DT, "reached holding at {elapsed}");
    }

    #[test]
    fn test_collider_disable_clamped_to_hold() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.waves = 1;
            w.left_mid = None;
            w.hold_time = 0.0625;
            w.collider_disable_delay = 0.12;
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        let events = run_to_end(&mut bed, &mut walls, 10_000);

        let disabled: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                AttackEvent::CollidersDisabled { phase_time } => Some(*phase_time),
                _ => None,
            })
            .collect();
        assert_eq!(disabled, vec![0.0625]);
    }

    #[test]
    fn test_fading_walls_still_damage() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.left_mid = None;
            w.hold_time = 0.6;
            w.collider_disable_delay = 0.125;
            w.fade_out_duration = 0.25;
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        while walls.phase() != WallsPhase::Holding {
            bed.tick(&mut walls, DT);
        }
        let (left, _) = walls.walls().unwrap();

        // 4 ticks in: fading, colliders still live
        for _ in 0..4 {
            bed.tick(&mut walls, DT);
        }
        let alpha = opacity_of(&bed.world, left).unwrap();
        assert!(alpha < 1.0 && alpha > 0.0);
        assert_eq!(damage_enabled(&bed.world, left), Some(true));

        // 8 ticks in: 0.125s elapsed, colliders off
        for _ in 0..4 {
            bed.tick(&mut walls, DT);
        }
        assert_eq!(damage_enabled(&bed.world, left), Some(false));
    }

    #[test]
    fn test_spawned_walls_start_hidden_and_harmless() {
        let mut bed = TestBed::new(BossConfig::default());
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        while walls.phase() != WallsPhase::SlowApproach {
            bed.tick(&mut walls, DT);
        }
        let (left, right) = walls.walls().unwrap();
        assert_eq!(opacity_of(&bed.world, left), Some(0.0));
        assert_eq!(damage_enabled(&bed.world, right), Some(false));
    }

    #[test]
    fn test_later_waves_are_faster() {
        let mut bed = TestBed::new(walls_config(|w| {
            w.waves = 2;
            w.time_mul_per_wave = 0.5;
        }));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);

        let mut warning_ticks = [0u32; 2];
        while !walls.is_finished() {
            if walls.phase() == WallsPhase::Warning {
                warning_ticks[walls.wave() as usize] += 1;
            }
            bed.tick(&mut walls, DT);
        }
        // 0.6s vs 0.3s of warning at 64 ticks per second
        assert!(warning_ticks[1] < warning_ticks[0]);
        assert!(warning_ticks[1].abs_diff(warning_ticks[0] / 2) <= 1);
    }

    #[test]
    fn test_missing_anchor_finishes_immediately() {
        let mut bed = TestBed::new(walls_config(|w| w.right_spawn = None));
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        assert!(walls.is_finished());
        assert!(phases(&bed.drain_events()).is_empty());
        bed.tick(&mut walls, DT);
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_lost_wall_skips_to_gap() {
        let mut bed = TestBed::new(BossConfig::default());
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        while walls.phase() != WallsPhase::SlowApproach {
            bed.tick(&mut walls, DT);
        }
        let (left, _) = walls.walls().unwrap();
        bed.world.despawn(left).unwrap();

        bed.tick(&mut walls, DT);
        assert_eq!(walls.phase(), WallsPhase::Gap);
        assert!(walls.walls().is_none());
        assert_eq!(bed.hazard_count(), 0);
        assert!(!walls.is_finished());
    }

    /// Run to `phase`, despawn the right wall, tick once
    fn lose_right_wall_in(phase: WallsPhase) -> (TestBed, ClosingWalls) {
        let mut bed = TestBed::new(BossConfig::default());
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        for _ in 0..10_000 {
            if walls.phase() == phase {
                break;
            }
            bed.tick(&mut walls, DT);
        }
        assert_eq!(walls.phase(), phase);
        let (_, right) = walls.walls().unwrap();
        bed.world.despawn(right).unwrap();

        bed.tick(&mut walls, DT);
        (bed, walls)
    }

    #[test]
    fn test_lost_wall_in_later_phases_skips_to_gap() {
        for phase in [WallsPhase::Retreat, WallsPhase::FastApproach, WallsPhase::Holding] {
            let (bed, walls) = lose_right_wall_in(phase);
            assert_eq!(walls.phase(), WallsPhase::Gap, "lost in {phase:?}");
            assert!(walls.walls().is_none());
            assert_eq!(bed.hazard_count(), 0, "lost in {phase:?}");
            assert!(!walls.is_finished());
        }
    }

    #[test]
    fn test_zero_arrival_epsilon_still_completes() {
        let config = walls_config(|w| {
            w.waves = 1;
            w.arrival_epsilon = 0.0;
        });
        assert!(config.walls.validate().is_ok());
        let mut bed = TestBed::new(config);
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        let events = run_to_end(&mut bed, &mut walls, 10_000);

        assert!(walls.is_finished());
        assert!(phases(&events).contains(&(WallsPhase::Retreat, 0)));
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_stop_is_idempotent_and_cleans_up() {
        let mut bed = TestBed::new(BossConfig::default());
        let mut walls = ClosingWalls::new();
        // Before start
        bed.stop(&mut walls);
        assert!(walls.is_finished());

        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        while walls.phase() != WallsPhase::Retreat {
            bed.tick(&mut walls, DT);
        }
        assert_eq!(bed.hazard_count(), 2);
        bed.stop(&mut walls);
        bed.stop(&mut walls);
        assert!(walls.is_finished());
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_extra_spawns_requested_on_start() {
        let mut config = BossConfig::default();
        config.extra_spawns.insert(AttackKind::Walls, 4);
        let mut bed = TestBed::new(config);
        let mut walls = ClosingWalls::new();
        bed.start(&mut walls);
        assert!(bed.drain_events().contains(&AttackEvent::ExtraSpawnsRequested {
            attack: AttackKind::Walls,
            count: 4,
        }));
    }
}
