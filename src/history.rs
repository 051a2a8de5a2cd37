//! Rolling position history for delayed tracking.
//!
//! The buffer is appended once per tick and evicted from the front, so it
//! stays ordered by timestamp and bounded by the retention window.

use std::collections::VecDeque;

use glam::Vec2;

/// One recorded target position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub time: f32,
    pub position: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct TargetHistory {
    samples: VecDeque<HistorySample>,
}

impl TargetHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(128),
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<HistorySample> {
        self.samples.front().copied()
    }

    pub fn newest(&self) -> Option<HistorySample> {
        self.samples.back().copied()
    }

    /// Append a sample. Samples older than the newest one are dropped to keep
    /// the buffer ordered; a sample at the same time replaces the newest.
    pub fn push(&mut self, time: f32, position: Vec2) {
        match self.samples.back_mut() {
            Some(last) if time < last.time => return,
            Some(last) if time == last.time => {
                last.position = position;
                return;
            }
            _ => {}
        }
        self.samples.push_back(HistorySample { time, position });
    }

    /// Drop samples older than `oldest_time`, always keeping at least one
    pub fn evict_before(&mut self, oldest_time: f32) {
        while self.samples.len() > 1 {
            match self.samples.front() {
                Some(front) if front.time < oldest_time => {
                    self.samples.pop_front();
                }
                _ => break,
            }
        }
    }

    /// Interpolated position at `time`.
    ///
    /// Binary-searches for the bracketing pair and lerps by elapsed-time
    /// fraction. Times outside the recorded range clamp to the earliest or
    /// latest sample. Returns None if the buffer is empty.
    pub fn position_at(&self, time: f32) -> Option<Vec2> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        if self.samples.len() == 1 || time <= first.time {
            return Some(first.position);
        }
        if time >= last.time {
            return Some(last.position);
        }

        // First index whose timestamp is >= time; in 1..len by the checks above
        let upper = self
            .samples
            .partition_point(|s| s.time < time)
            .clamp(1, self.samples.len() - 1);
        let a = self.samples[upper - 1];
        let b = self.samples[upper];
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        Some(a.position.lerp(b.position, t))
    }
}
