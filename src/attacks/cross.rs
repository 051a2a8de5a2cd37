//! Cross beams attack: an X of diagonal beams, then a + of orthogonal ones.
//!
//! Each pair is first shown as thin harmless telegraphs, then replaced by
//! wide damaging segments. Damage comes from the segments' contact damage,
//! which the host applies while their colliders are enabled.

use glam::Vec2;
use hecs::Entity;
use tracing::{debug, info, warn};

use crate::attacks::{Attack, AttackContext, AttackKind};
use crate::clock::PhaseTimer;
use crate::components::Collider;
use crate::config::CrossConfig;
use crate::constants::CROSS_MIN_SEGMENT_LENGTH;
use crate::events::AttackEvent;
use crate::geometry::heading;
use crate::hazard::{self, HazardSpawn, HazardTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossPhase {
    WarnX,
    FireX,
    Gap,
    WarnPlus,
    FirePlus,
    End,
}

/// The two beams drawn together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Diagonals: top-left to bottom-right, top-right to bottom-left
    X,
    /// Vertical and horizontal through the centre
    Plus,
}

impl Shape {
    fn endpoints(self, config: &CrossConfig) -> [Option<(Vec2, Vec2)>; 2] {
        match self {
            Shape::X => [
                config.top_left.zip(config.bottom_right),
                config.top_right.zip(config.bottom_left),
            ],
            Shape::Plus => [config.top.zip(config.bottom), config.left.zip(config.right)],
        }
    }
}

/// Placement of a beam segment between two anchors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlacement {
    pub center: Vec2,
    pub angle: f32,
    pub length: f32,
}

/// Midpoint, rotation and length of the segment from `a` to `b`, or None
/// when the anchors coincide
pub fn segment_between(a: Vec2, b: Vec2) -> Option<SegmentPlacement> {
    let delta = b - a;
    let length = delta.length();
    if length < CROSS_MIN_SEGMENT_LENGTH {
        return None;
    }
    Some(SegmentPlacement {
        center: (a + b) * 0.5,
        angle: heading(delta),
        length,
    })
}

pub struct CrossBeams {
    phase: CrossPhase,
    timer: PhaseTimer,
    config: Option<CrossConfig>,
    segments: Vec<Entity>,
    finished: bool,
}

impl CrossBeams {
    pub fn new() -> Self {
        Self {
            phase: CrossPhase::WarnX,
            timer: PhaseTimer::new(),
            config: None,
            segments: Vec::new(),
            finished: false,
        }
    }

    pub fn phase(&self) -> CrossPhase {
        self.phase
    }

    pub fn segments(&self) -> &[Entity] {
        &self.segments
    }

    fn enter_phase(&mut self, phase: CrossPhase, ctx: &mut AttackContext<'_>) {
        debug!(?phase, "cross beams phase");
        self.phase = phase;
        self.timer.reset();
        ctx.events.push(AttackEvent::CrossPhaseEntered { phase });
    }

    fn clear_segments(&mut self, ctx: &mut AttackContext<'_>) {
        hazard::despawn_all(ctx.world, &mut self.segments, ctx.events);
    }

    /// Replace the current segments with a new pair
    fn spawn_shape(&mut self, config: &CrossConfig, shape: Shape, firing: bool, ctx: &mut AttackContext<'_>) {
        self.clear_segments(ctx);

        let width = if firing { config.fire_width } else { config.warn_width };
        for (a, b) in shape.endpoints(config).into_iter().flatten() {
            let Some(placement) = segment_between(a, b) else {
                debug!(?a, ?b, "skipping degenerate cross segment");
                continue;
            };

            let size = Vec2::new(placement.length, width) * config.collider_size_mul;
            let template = HazardTemplate {
                half_extents: Some(size * 0.5),
                contact_damage: firing.then_some(config.fire_damage),
            };
            let spawn = HazardSpawn {
                position: placement.center,
                angle: placement.angle,
                opacity: 1.0,
                damage_enabled: firing,
            };
            let segment = hazard::spawn_hazard(ctx.world, &template, spawn, ctx.events);
            if let Ok(mut collider) = ctx.world.get::<&mut Collider>(segment) {
                collider.offset = config.collider_offset;
            }
            self.segments.push(segment);
        }
    }

    fn advance(&mut self, config: &CrossConfig, ctx: &mut AttackContext<'_>) {
        match self.phase {
            CrossPhase::WarnX if self.timer.has_elapsed(config.warn_time) => {
                self.spawn_shape(config, Shape::X, true, ctx);
                self.enter_phase(CrossPhase::FireX, ctx);
            }
            CrossPhase::FireX if self.timer.has_elapsed(config.fire_time) => {
                self.clear_segments(ctx);
                self.enter_phase(CrossPhase::Gap, ctx);
            }
            CrossPhase::Gap if self.timer.has_elapsed(config.gap_after_x) => {
                self.spawn_shape(config, Shape::Plus, false, ctx);
                self.enter_phase(CrossPhase::WarnPlus, ctx);
            }
            CrossPhase::WarnPlus if self.timer.has_elapsed(config.warn_time) => {
                self.spawn_shape(config, Shape::Plus, true, ctx);
                self.enter_phase(CrossPhase::FirePlus, ctx);
            }
            CrossPhase::FirePlus if self.timer.has_elapsed(config.fire_time) => {
                self.clear_segments(ctx);
                self.enter_phase(CrossPhase::End, ctx);
                info!("cross beams complete");
                self.finished = true;
            }
            _ => {}
        }
    }
}

impl Default for CrossBeams {
    fn default() -> Self {
        Self::new()
    }
}

impl Attack for CrossBeams {
    fn kind(&self) -> AttackKind {
        AttackKind::Cross
    }

    fn start(&mut self, ctx: &mut AttackContext<'_>) {
        self.finished = false;
        let config = ctx.config.cross.clone();
        if let Err(err) = config.validate() {
            warn!(%err, "cross beams misconfigured, cancelling attack");
            self.finished = true;
            return;
        }

        ctx.request_extra_spawns(AttackKind::Cross);
        info!("cross beams started");
        self.enter_phase(CrossPhase::WarnX, ctx);
        self.spawn_shape(&config, Shape::X, false, ctx);
        self.config = Some(config);
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if self.finished {
            return;
        }
        puffin::profile_function!();

        let Some(config) = self.config.take() else {
            self.finished = true;
            return;
        };
        self.timer.advance(ctx.dt());
        self.advance(&config, ctx);
        self.config = Some(config);
    }

    fn stop(&mut self, ctx: &mut AttackContext<'_>) {
        self.clear_segments(ctx);
        self.finished = true;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
