//! Simulated-time utilities
//!
//! The suppression window in the cut deduplicator compares logical
//! timestamps taken from a fixed-step clock driven by the host's update
//! loop. Wall time is never consulted, so replays and paused frames
//! behave identically to live play.

/// Fixed-step simulated clock
///
/// Accumulates host-supplied delta times into a monotonically
/// non-decreasing timestamp in simulated seconds.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SimClock {
    elapsed: f64,
    step_count: u64,
}

impl SimClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            step_count: 0,
        }
    }

    /// Call once per physics/update step with the step's delta time.
    ///
    /// Negative deltas are ignored so the timestamp never runs backwards.
    pub fn tick(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += f64::from(dt);
        }
        self.step_count += 1;
    }

    /// Current simulated time in seconds
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    /// Total number of steps observed
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let clock = SimClock::new();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.step_count(), 0);
    }

    #[test]
    fn test_accumulates_deltas() {
        let mut clock = SimClock::new();
        clock.tick(0.016);
        clock.tick(0.016);
        assert!((clock.now() - 0.032).abs() < 1e-6);
        assert_eq!(clock.step_count(), 2);
    }

    #[test]
    fn test_ignores_negative_delta() {
        let mut clock = SimClock::new();
        clock.tick(0.5);
        clock.tick(-1.0);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.step_count(), 2);
    }
}
