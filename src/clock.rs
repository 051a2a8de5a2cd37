//! Frame clock and phase-local timers.
//!
//! The host advances the clock once per frame; attacks only ever read it.

/// Simulation clock (in seconds)
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Current game time in seconds
    pub time: f32,
    /// Elapsed time since the previous tick
    pub delta: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            delta: 0.0,
        }
    }

    /// Advance time by `dt` for the next frame
    pub fn tick(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "Cannot go backwards in time: dt = {}", dt);
        let dt = dt.max(0.0);
        self.delta = dt;
        self.time += dt;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulating timer, reset on every phase entry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimer {
    elapsed: f32,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn has_elapsed(&self, duration: f32) -> bool {
        self.elapsed >= duration
    }

    /// Elapsed fraction of `duration`, clamped to [0, 1]
    pub fn fraction(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / duration).clamp(0.0, 1.0)
    }
}
