//! Attack controller: the host loop that runs one boss attack at a time.
//!
//! ```text
//! Idle (idle_seconds) -> pick from pool -> start -> tick... -> stop -> Idle
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::attacks::{Attack, AttackContext, AttackKind};
use crate::config::{ControllerConfig, Selection};
use crate::events::AttackEvent;

pub enum ControllerState {
    Idle { remaining: f32 },
    Attacking { kind: AttackKind, attack: Box<dyn Attack> },
}

pub struct AttackController {
    state: ControllerState,
    rng: StdRng,
    next_in_cycle: usize,
    attacks_started: u32,
}

impl AttackController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            state: ControllerState::Idle {
                remaining: config.idle_seconds,
            },
            rng: StdRng::seed_from_u64(config.seed),
            next_in_cycle: 0,
            attacks_started: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ControllerState::Idle { .. })
    }

    /// Kind of the running attack, if any
    pub fn active_kind(&self) -> Option<AttackKind> {
        match &self.state {
            ControllerState::Attacking { kind, .. } => Some(*kind),
            ControllerState::Idle { .. } => None,
        }
    }

    pub fn attacks_started(&self) -> u32 {
        self.attacks_started
    }

    /// Pick the next attack from the pool
    fn select(&mut self, config: &ControllerConfig) -> Option<AttackKind> {
        if config.pool.is_empty() {
            return None;
        }
        let index = match config.selection {
            Selection::Random => self.rng.gen_range(0..config.pool.len()),
            Selection::Cycle => {
                let index = self.next_in_cycle % config.pool.len();
                self.next_in_cycle = index + 1;
                index
            }
        };
        config.pool.get(index).copied()
    }

    /// Start a specific attack now, stopping any running one
    pub fn begin(&mut self, kind: AttackKind, ctx: &mut AttackContext<'_>) {
        self.preempt(ctx);

        info!(attack = kind.name(), "boss attack started");
        ctx.events.push(AttackEvent::AttackStarted { attack: kind });
        let mut attack = kind.instantiate();
        attack.start(ctx);
        self.attacks_started += 1;
        self.state = ControllerState::Attacking { kind, attack };
    }

    pub fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        puffin::profile_function!();
        let idle_seconds = ctx.config.controller.idle_seconds;

        match &mut self.state {
            ControllerState::Idle { remaining } => {
                *remaining -= ctx.dt();
                if *remaining > 0.0 {
                    return;
                }
                match self.select(&ctx.config.controller) {
                    Some(kind) => self.begin(kind, ctx),
                    None => {
                        warn!("attack pool is empty, staying idle");
                        self.state = ControllerState::Idle {
                            remaining: idle_seconds,
                        };
                    }
                }
            }
            ControllerState::Attacking { kind, attack } => {
                attack.tick(ctx);
                if attack.is_finished() {
                    attack.stop(ctx);
                    debug!(attack = kind.name(), "boss attack finished");
                    ctx.events.push(AttackEvent::AttackFinished {
                        attack: *kind,
                        early: false,
                    });
                    self.state = ControllerState::Idle {
                        remaining: idle_seconds,
                    };
                }
            }
        }
    }

    /// Stop the running attack immediately. No-op while idle.
    pub fn preempt(&mut self, ctx: &mut AttackContext<'_>) {
        let idle_seconds = ctx.config.controller.idle_seconds;
        let previous = std::mem::replace(
            &mut self.state,
            ControllerState::Idle {
                remaining: idle_seconds,
            },
        );
        match previous {
            ControllerState::Attacking { kind, mut attack } => {
                attack.stop(ctx);
                info!(attack = kind.name(), "boss attack preempted");
                ctx.events.push(AttackEvent::AttackFinished {
                    attack: kind,
                    early: true,
                });
            }
            idle @ ControllerState::Idle { .. } => self.state = idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacks::test_support::TestBed;
    use crate::config::BossConfig;

    const DT: f32 = 0.1;

    fn cycle_config(pool: Vec<AttackKind>) -> BossConfig {
        let mut config = BossConfig::default();
        config.controller.selection = Selection::Cycle;
        config.controller.pool = pool;
        config.controller.idle_seconds = 0.45;
        config
    }

    fn tick(bed: &mut TestBed, controller: &mut AttackController) {
        bed.clock.tick(DT);
        controller.tick(&mut bed.ctx());
    }

    #[test]
    fn test_idles_before_first_attack() {
        let config = cycle_config(vec![AttackKind::Cross]);
        let mut controller = AttackController::new(&config.controller);
        let mut bed = TestBed::new(config);

        for _ in 0..4 {
            tick(&mut bed, &mut controller);
        }
        assert!(matches!(
            controller.state(),
            ControllerState::Idle { remaining } if *remaining > 0.0 && *remaining < 0.1
        ));
        tick(&mut bed, &mut controller);
        assert_eq!(controller.active_kind(), Some(AttackKind::Cross));
        assert!(bed
            .drain_events()
            .contains(&AttackEvent::AttackStarted { attack: AttackKind::Cross }));
    }

    #[test]
    fn test_cycle_selection_and_return_to_idle() {
        let config = cycle_config(vec![AttackKind::Cross, AttackKind::Walls]);
        let mut controller = AttackController::new(&config.controller);
        let mut bed = TestBed::new(config);

        let mut started = Vec::new();
        let mut finished = Vec::new();
        for _ in 0..400 {
            tick(&mut bed, &mut controller);
            for event in bed.drain_events() {
                match event {
                    AttackEvent::AttackStarted { attack } => started.push(attack),
                    AttackEvent::AttackFinished { attack, early } => {
                        assert!(!early);
                        finished.push(attack);
                    }
                    _ => {}
                }
            }
            if finished.len() == 2 {
                break;
            }
        }
        assert_eq!(started, vec![AttackKind::Cross, AttackKind::Walls]);
        assert_eq!(finished, started);
        assert!(controller.is_idle());
        assert_eq!(bed.hazard_count(), 0);
    }

    #[test]
    fn test_random_selection_is_seeded() {
        let mut config = BossConfig::default().controller;
        config.seed = 42;
        let picks = |config: &ControllerConfig| {
            let mut controller = AttackController::new(config);
            (0..16).map(|_| controller.select(config)).collect::<Vec<_>>()
        };
        assert_eq!(picks(&config), picks(&config));
        assert!(picks(&config).iter().all(|k| k.is_some()));
    }

    #[test]
    fn test_preempt_stops_attack() {
        let config = cycle_config(vec![AttackKind::Walls]);
        let mut controller = AttackController::new(&config.controller);
        let mut bed = TestBed::new(config);

        controller.begin(AttackKind::Walls, &mut bed.ctx());
        for _ in 0..10 {
            tick(&mut bed, &mut controller);
        }
        assert!(bed.hazard_count() > 0);
        bed.drain_events();

        controller.preempt(&mut bed.ctx());
        controller.preempt(&mut bed.ctx());
        assert!(controller.is_idle());
        assert_eq!(bed.hazard_count(), 0);
        let finished: Vec<_> = bed
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, AttackEvent::AttackFinished { .. }))
            .collect();
        assert_eq!(
            finished,
            vec![AttackEvent::AttackFinished {
                attack: AttackKind::Walls,
                early: true
            }]
        );
    }

    #[test]
    fn test_empty_pool_stays_idle() {
        let config = cycle_config(Vec::new());
        let mut controller = AttackController::new(&config.controller);
        let mut bed = TestBed::new(config);
        for _ in 0..20 {
            tick(&mut bed, &mut controller);
        }
        assert!(controller.is_idle());
        assert_eq!(controller.attacks_started(), 0);
    }
}
