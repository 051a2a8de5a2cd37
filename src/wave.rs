//! Per-wave scaling.
//!
//! Wave `w` multiplies every speed by `speed_base^w` and every duration by
//! `time_base^w`. The two progressions are independent.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveScaling {
    /// Speed multiplier base (speed * base^wave)
    pub speed_base: f32,
    /// Duration multiplier base (duration * base^wave)
    pub time_base: f32,
}

impl WaveScaling {
    pub fn new(speed_base: f32, time_base: f32) -> Self {
        Self {
            speed_base,
            time_base,
        }
    }

    pub fn speed_multiplier(&self, wave: u32) -> f32 {
        self.speed_base.powi(wave as i32)
    }

    pub fn time_multiplier(&self, wave: u32) -> f32 {
        self.time_base.powi(wave as i32)
    }

    pub fn scaled_speed(&self, base_speed: f32, wave: u32) -> f32 {
        base_speed * self.speed_multiplier(wave)
    }

    pub fn scaled_duration(&self, base_duration: f32, wave: u32) -> f32 {
        base_duration * self.time_multiplier(wave)
    }
}

impl Default for WaveScaling {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_zero_is_unscaled() {
        let scaling = WaveScaling::new(1.2, 0.85);
        assert_eq!(scaling.scaled_speed(4.0, 0), 4.0);
        assert_eq!(scaling.scaled_duration(0.6, 0), 0.6);
    }

    #[test]
    fn test_geometric_progressions() {
        let scaling = WaveScaling::new(1.2, 0.85);
        let mut expected_speed = 4.0f32;
        let mut expected_duration = 0.6f32;
        for wave in 0..5 {
            let speed = scaling.scaled_speed(4.0, wave);
            let duration = scaling.scaled_duration(0.6, wave);
            assert!((speed - expected_speed).abs() < 1e-4, "wave {wave}: {speed}");
            assert!((duration - expected_duration).abs() < 1e-5, "wave {wave}: {duration}");
            expected_speed *= 1.2;
            expected_duration *= 0.85;
        }
    }

    #[test]
    fn test_progressions_are_independent() {
        let scaling = WaveScaling::new(2.0, 1.0);
        assert_eq!(scaling.scaled_speed(1.0, 3), 8.0);
        assert_eq!(scaling.scaled_duration(1.0, 3), 1.0);
    }
}
