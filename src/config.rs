//! Boss configuration: every tunable an attack reads at `start`.
//!
//! All sections are `#[serde(default)]`, so a JSON file only needs to name
//! the values it changes. Optional anchors and templates are `Option`s: a
//! missing required one is a [`ConfigError`] that the attack absorbs by
//! finishing immediately.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use crate::attacks::AttackKind;
use crate::constants::*;
use crate::error::ConfigError;
use crate::hazard::{ContactDamageSpec, HazardTemplate};
use crate::layers::LayerMask;
use crate::wave::WaveScaling;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub controller: ControllerConfig,
    pub walls: WallsConfig,
    pub beam: BeamConfig,
    pub cross: CrossConfig,
    /// Auxiliary enemies requested when each attack starts
    pub extra_spawns: HashMap<AttackKind, u32>,
    pub arena: ArenaConfig,
}

impl BossConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BossConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Checks values that would break the host loop itself. Per-attack
    /// problems are left to the attacks, which finish early on them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("controller.idle_seconds", self.controller.idle_seconds)
    }

    pub fn extra_spawns_for(&self, attack: AttackKind) -> u32 {
        self.extra_spawns.get(&attack).copied().unwrap_or(0)
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// How the controller picks the next attack from its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Random,
    Cycle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub idle_seconds: f32,
    pub pool: Vec<AttackKind>,
    pub selection: Selection,
    pub seed: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            idle_seconds: CONTROLLER_IDLE_SECONDS,
            pool: vec![AttackKind::Walls, AttackKind::Beam, AttackKind::Cross],
            selection: Selection::Random,
            seed: 0,
        }
    }
}

// =============================================================================
// CLOSING WALLS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WallsConfig {
    pub left_template: Option<HazardTemplate>,
    pub right_template: Option<HazardTemplate>,
    pub left_spawn: Option<Vec2>,
    pub right_spawn: Option<Vec2>,
    /// Both midpoints enable the slow approach / retreat choreography
    pub left_mid: Option<Vec2>,
    pub right_mid: Option<Vec2>,

    pub warn_time: f32,
    pub move_speed: f32,
    pub fast_move_speed: f32,
    pub hold_time: f32,
    pub wave_gap: f32,
    pub waves: u32,
    pub speed_mul_per_wave: f32,
    pub time_mul_per_wave: f32,

    pub fade_in_duration: f32,
    pub fade_out_duration: f32,
    pub collider_disable_delay: f32,
    pub arrival_epsilon: f32,
}

impl Default for WallsConfig {
    fn default() -> Self {
        Self {
            left_template: Some(HazardTemplate::default()),
            right_template: Some(HazardTemplate::default()),
            left_spawn: Some(Vec2::new(-8.0, 0.0)),
            right_spawn: Some(Vec2::new(8.0, 0.0)),
            left_mid: Some(Vec2::new(-4.0, 0.0)),
            right_mid: Some(Vec2::new(4.0, 0.0)),
            warn_time: WALLS_WARN_TIME,
            move_speed: WALLS_MOVE_SPEED,
            fast_move_speed: WALLS_FAST_MOVE_SPEED,
            hold_time: WALLS_HOLD_TIME,
            wave_gap: WALLS_WAVE_GAP,
            waves: WALLS_WAVES,
            speed_mul_per_wave: WALLS_SPEED_MUL_PER_WAVE,
            time_mul_per_wave: WALLS_TIME_MUL_PER_WAVE,
            fade_in_duration: WALLS_FADE_IN_DURATION,
            fade_out_duration: WALLS_FADE_OUT_DURATION,
            collider_disable_delay: WALLS_COLLIDER_DISABLE_DELAY,
            arrival_epsilon: WALLS_ARRIVAL_EPSILON,
        }
    }
}

impl WallsConfig {
    pub fn scaling(&self) -> WaveScaling {
        WaveScaling::new(self.speed_mul_per_wave, self.time_mul_per_wave)
    }

    /// Midpoint anchors, only when both are configured
    pub fn midpoints(&self) -> Option<(Vec2, Vec2)> {
        self.left_mid.zip(self.right_mid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.left_template.is_none() {
            return Err(ConfigError::MissingTemplate("walls.left_template"));
        }
        if self.right_template.is_none() {
            return Err(ConfigError::MissingTemplate("walls.right_template"));
        }
        if self.left_spawn.is_none() {
            return Err(ConfigError::MissingAnchor("walls.left_spawn"));
        }
        if self.right_spawn.is_none() {
            return Err(ConfigError::MissingAnchor("walls.right_spawn"));
        }
        positive("walls.fast_move_speed", self.fast_move_speed)?;
        if self.midpoints().is_some() {
            positive("walls.move_speed", self.move_speed)?;
        }
        non_negative("walls.warn_time", self.warn_time)?;
        non_negative("walls.hold_time", self.hold_time)?;
        non_negative("walls.wave_gap", self.wave_gap)?;
        positive("walls.speed_mul_per_wave", self.speed_mul_per_wave)?;
        positive("walls.time_mul_per_wave", self.time_mul_per_wave)?;
        non_negative("walls.fade_in_duration", self.fade_in_duration)?;
        non_negative("walls.fade_out_duration", self.fade_out_duration)?;
        non_negative("walls.collider_disable_delay", self.collider_disable_delay)?;
        non_negative("walls.arrival_epsilon", self.arrival_epsilon)
    }
}

// =============================================================================
// HOMING BEAM
// =============================================================================

/// Shrinks or shifts the beam's damage box relative to its visual
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BeamHitbox {
    /// Fraction of the beam length covered, clamped to [0.1, 1]
    pub length_mul: f32,
    /// Multiplier on the raw hitbox thickness, clamped to [0.2, 2]
    pub thickness_mul: f32,
    /// Shift along the beam axis (world units)
    pub forward_offset: f32,
    /// Shift perpendicular to the beam axis (world units)
    pub perp_offset: f32,
}

impl Default for BeamHitbox {
    fn default() -> Self {
        Self {
            length_mul: 1.0,
            thickness_mul: 1.0,
            forward_offset: 0.0,
            perp_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub duration: f32,
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    pub max_reach: f32,
    pub thickness: f32,
    pub knockback: f32,
    pub target_layers: LayerMask,
    pub obstacle_layers: LayerMask,

    pub warmup_time: f32,
    pub warmup_alpha: f32,

    pub follow_delay: f32,
    pub history_window: f32,
    pub turn_rate_deg: f32,

    pub hitbox: BeamHitbox,
    pub pulse_speed: f32,
    pub pulse_intensity: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            duration: BEAM_DURATION,
            damage_per_tick: BEAM_DAMAGE_PER_TICK,
            tick_interval: BEAM_TICK_INTERVAL,
            max_reach: BEAM_MAX_REACH,
            thickness: BEAM_THICKNESS,
            knockback: BEAM_KNOCKBACK,
            target_layers: LayerMask::PLAYER,
            obstacle_layers: LayerMask::OBSTACLE,
            warmup_time: BEAM_WARMUP_TIME,
            warmup_alpha: BEAM_WARMUP_ALPHA,
            follow_delay: BEAM_FOLLOW_DELAY,
            history_window: BEAM_HISTORY_WINDOW,
            turn_rate_deg: BEAM_TURN_RATE_DEG,
            hitbox: BeamHitbox::default(),
            pulse_speed: BEAM_PULSE_SPEED,
            pulse_intensity: BEAM_PULSE_INTENSITY,
        }
    }
}

impl BeamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("beam.tick_interval", self.tick_interval)?;
        non_negative("beam.duration", self.duration)?;
        non_negative("beam.max_reach", self.max_reach)?;
        non_negative("beam.thickness", self.thickness)?;
        non_negative("beam.warmup_time", self.warmup_time)?;
        non_negative("beam.follow_delay", self.follow_delay)?;
        non_negative("beam.history_window", self.history_window)?;
        non_negative("beam.turn_rate_deg", self.turn_rate_deg)
    }
}

// =============================================================================
// CROSS BEAMS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrossConfig {
    pub top_left: Option<Vec2>,
    pub top_right: Option<Vec2>,
    pub bottom_left: Option<Vec2>,
    pub bottom_right: Option<Vec2>,
    pub top: Option<Vec2>,
    pub bottom: Option<Vec2>,
    pub left: Option<Vec2>,
    pub right: Option<Vec2>,

    pub warn_time: f32,
    pub fire_time: f32,
    pub gap_after_x: f32,
    pub warn_width: f32,
    pub fire_width: f32,

    /// Collider size relative to (segment length, segment width)
    pub collider_size_mul: Vec2,
    /// Collider offset in the segment's local frame
    pub collider_offset: Vec2,
    pub fire_damage: ContactDamageSpec,
}

impl Default for CrossConfig {
    fn default() -> Self {
        Self {
            top_left: Some(Vec2::new(-8.0, 6.0)),
            top_right: Some(Vec2::new(8.0, 6.0)),
            bottom_left: Some(Vec2::new(-8.0, -6.0)),
            bottom_right: Some(Vec2::new(8.0, -6.0)),
            top: Some(Vec2::new(0.0, 6.0)),
            bottom: Some(Vec2::new(0.0, -6.0)),
            left: Some(Vec2::new(-8.0, 0.0)),
            right: Some(Vec2::new(8.0, 0.0)),
            warn_time: CROSS_WARN_TIME,
            fire_time: CROSS_FIRE_TIME,
            gap_after_x: CROSS_GAP_AFTER_X,
            warn_width: CROSS_WARN_WIDTH,
            fire_width: CROSS_FIRE_WIDTH,
            collider_size_mul: Vec2::ONE,
            collider_offset: Vec2::ZERO,
            fire_damage: ContactDamageSpec::default(),
        }
    }
}

impl CrossConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("cross.warn_time", self.warn_time)?;
        non_negative("cross.fire_time", self.fire_time)?;
        non_negative("cross.gap_after_x", self.gap_after_x)?;
        non_negative("cross.warn_width", self.warn_width)?;
        non_negative("cross.fire_width", self.fire_width)
    }
}

// =============================================================================
// ARENA (headless simulation)
// =============================================================================

/// Static obstacle that blocks beams
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ObstacleSpec {
    pub center: Vec2,
    pub half_extents: Vec2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub boss_position: Vec2,
    pub player_health: i32,
    pub player_half_extents: Vec2,
    pub player_invulnerability: f32,
    /// Player orbit around the arena centre (radius, radians per second)
    pub player_orbit_radius: f32,
    pub player_orbit_speed: f32,
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            boss_position: Vec2::new(0.0, 5.0),
            player_health: 100,
            player_half_extents: Vec2::splat(0.3),
            player_invulnerability: 0.0,
            player_orbit_radius: 3.0,
            player_orbit_speed: 1.2,
            obstacles: Vec::new(),
        }
    }
}
