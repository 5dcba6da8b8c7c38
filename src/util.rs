//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ============================================================================
// Tick Meter
// ============================================================================

/// Measures the real tick rate with a rolling average.
///
/// Physics runs per tick, so a host that falls behind 60 Hz plays the show
/// slower; this is what the session logs to make that visible.
pub struct TickMeter {
    intervals: VecDeque<f32>,
    last_tick: Instant,
    sample_count: usize,
    total_ticks: u64,
}

impl TickMeter {
    /// Create a new meter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            intervals: VecDeque::with_capacity(sample_count),
            last_tick: Instant::now(),
            sample_count: sample_count.max(1),
            total_ticks: 0,
        }
    }

    /// Call once per tick
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.record(dt);
    }

    fn record(&mut self, dt: Duration) {
        self.intervals.push_back(dt.as_secs_f32());
        if self.intervals.len() > self.sample_count {
            self.intervals.pop_front();
        }
        self.total_ticks += 1;
    }

    /// Average ticks per second over the sample window
    pub fn avg_rate(&self) -> f32 {
        let avg_dt: f32 = self.intervals.iter().sum::<f32>() / self.intervals.len().max(1) as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg_rate() {
        let mut meter = TickMeter::new(4);
        for _ in 0..4 {
            meter.record(Duration::from_millis(20));
        }
        assert!((meter.avg_rate() - 50.0).abs() < 0.01);
        assert_eq!(meter.total_ticks(), 4);
    }

    #[test]
    fn test_window_rolls() {
        let mut meter = TickMeter::new(2);
        meter.record(Duration::from_millis(100));
        meter.record(Duration::from_millis(10));
        meter.record(Duration::from_millis(10));
        assert!((meter.avg_rate() - 100.0).abs() < 0.01);
        assert_eq!(meter.total_ticks(), 3);
    }

    #[test]
    fn test_empty_meter() {
        let meter = TickMeter::new(8);
        assert_eq!(meter.avg_rate(), 0.0);
    }
}
