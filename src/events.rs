//! Attack event system for decoupled communication with the host.
//!
//! Attacks push events while they tick; the host drains them at the end of
//! the frame to drive VFX, audio, spawners or logging without the attacks
//! knowing about any of those.

use glam::Vec2;
use hecs::Entity;

use crate::attacks::cross::CrossPhase;
use crate::attacks::walls::WallsPhase;
use crate::attacks::AttackKind;

/// Events that attacks and systems emit
#[derive(Debug, Clone, PartialEq)]
pub enum AttackEvent {
    /// The controller started an attack
    AttackStarted { attack: AttackKind },
    /// An attack was stopped. `early` is set when it was preempted or
    /// aborted instead of running to completion.
    AttackFinished { attack: AttackKind, early: bool },
    /// The closing walls phase machine entered a phase
    WallsPhaseEntered { phase: WallsPhase, wave: u32 },
    /// The cross beams attack entered a phase
    CrossPhaseEntered { phase: CrossPhase },
    /// A hazard entity was spawned into the world
    HazardSpawned { entity: Entity, position: Vec2 },
    /// A hazard entity was removed from the world
    HazardDestroyed { entity: Entity },
    /// Wall colliders switched off during the hold fade
    CollidersDisabled { phase_time: f32 },
    /// The homing beam finished its preview window and now deals damage
    BeamWarmupEnded,
    /// Damage landed on a target
    DamageApplied {
        target: Entity,
        amount: i32,
        source: Vec2,
    },
    /// An attack asks the host for auxiliary enemy spawns
    ExtraSpawnsRequested { attack: AttackKind, count: u32 },
}

/// Simple event queue - events are pushed during update, drained at end of frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<AttackEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: AttackEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = AttackEvent> + '_ {
        self.events.drain(..)
    }

    /// Events pushed since the last drain
    pub fn pending(&self) -> &[AttackEvent] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
