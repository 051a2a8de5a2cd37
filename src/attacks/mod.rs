//! Boss attacks.
//!
//! Every attack is a flat state holder driven through the same four-member
//! contract: the host calls [`Attack::start`] once, [`Attack::tick`] every
//! frame until [`Attack::is_finished`], then [`Attack::stop`]. Attacks own the
//! hazards they spawn and must leave none behind after `stop`.
//!
//! - `walls`: closing walls phase machine with per-wave scaling
//! - `beam`: homing beam that aims at a delayed target position
//! - `cross`: diagonal then orthogonal beam telegraphs

pub mod beam;
pub mod cross;
pub mod walls;

pub use beam::HomingBeam;
pub use cross::CrossBeams;
pub use walls::ClosingWalls;

use hecs::{Entity, World};
use serde::Deserialize;
use tracing::debug;

use crate::clock::GameClock;
use crate::collision::SpatialQuery;
use crate::config::BossConfig;
use crate::events::{AttackEvent, EventQueue};

/// Which attack implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Walls,
    Beam,
    Cross,
}

impl AttackKind {
    /// Fresh, not-yet-started attack of this kind
    pub fn instantiate(self) -> Box<dyn Attack> {
        match self {
            AttackKind::Walls => Box::new(ClosingWalls::new()),
            AttackKind::Beam => Box::new(HomingBeam::new()),
            AttackKind::Cross => Box::new(CrossBeams::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::Walls => "closing walls",
            AttackKind::Beam => "homing beam",
            AttackKind::Cross => "cross beams",
        }
    }
}

/// Everything an attack may read or write during one call.
///
/// The world is the only mutable scene state; the clock, configuration and
/// spatial query are shared read-only collaborators.
pub struct AttackContext<'a> {
    pub world: &'a mut World,
    pub clock: &'a GameClock,
    pub config: &'a BossConfig,
    pub query: &'a dyn SpatialQuery,
    pub events: &'a mut EventQueue,
    /// Entity the attack originates from
    pub boss: Entity,
    /// Entity the attack is aimed at, if any
    pub target: Option<Entity>,
}

impl AttackContext<'_> {
    #[inline]
    pub fn dt(&self) -> f32 {
        self.clock.delta
    }

    #[inline]
    pub fn now(&self) -> f32 {
        self.clock.time
    }

    /// Ask the host for the auxiliary enemies configured for `attack`
    pub fn request_extra_spawns(&mut self, attack: AttackKind) {
        let count = self.config.extra_spawns_for(attack);
        if count == 0 {
            return;
        }
        debug!(attack = attack.name(), count, "requesting extra spawns");
        self.events
            .push(AttackEvent::ExtraSpawnsRequested { attack, count });
    }
}

/// One in-progress boss ability.
pub trait Attack {
    fn kind(&self) -> AttackKind;

    /// Validate configuration and enter the first phase. A configuration
    /// error finishes the attack immediately instead of failing.
    fn start(&mut self, ctx: &mut AttackContext<'_>);

    /// Advance by `ctx.dt()`. No-op once finished.
    fn tick(&mut self, ctx: &mut AttackContext<'_>);

    /// Destroy every owned hazard and finish. Safe from any state, including
    /// before `start`, and idempotent.
    fn stop(&mut self, ctx: &mut AttackContext<'_>);

    fn is_finished(&self) -> bool;
}
