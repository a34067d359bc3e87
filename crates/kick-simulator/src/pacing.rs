use std::time::{Duration, Instant};

/// Gain applied to the frame rate error, in seconds per Hz. Negative: running
/// too fast lengthens the delay.
const ADJUSTMENT_GAIN: f64 = -0.000_001;
/// Upper bound on the adjustment, in multiples of the target interval.
const MAX_ADJUSTMENT_FACTOR: f64 = 4.0;

/// Feedback pacing for a fixed-rate tick loop.
///
/// Each tick reports the wall time since the previous tick. The error between the
/// observed rate and the target rate is integrated into an adjustment that is
/// added to the target interval to get the delay before the next tick. The
/// adjustment is floored at `-target_interval`, so the delay is never negative.
#[derive(Debug, Clone)]
pub struct TickPacer {
    target_framerate: f64,
    target_interval: f64,
    adjustment: f64,
    last_tick: Option<Instant>,
    observed_framerate: Option<f64>,
}

impl TickPacer {
    pub fn new(target_framerate: f64) -> Self {
        Self {
            target_framerate,
            target_interval: 1.0 / target_framerate,
            adjustment: 0.0,
            last_tick: None,
            observed_framerate: None,
        }
    }

    pub fn target_interval(&self) -> f64 {
        self.target_interval
    }

    pub fn adjustment(&self) -> f64 {
        self.adjustment
    }

    /// Instantaneous rate measured on the last tick.
    pub fn observed_framerate(&self) -> Option<f64> {
        self.observed_framerate
    }

    /// Seconds since the previous tick, or the target interval if there was none.
    pub fn elapsed(&self, now: Instant) -> f64 {
        self.last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(self.target_interval)
    }

    /// Feed the elapsed time of a finished tick into the adjustment.
    pub fn record(&mut self, dt: f64, finished_at: Instant) {
        self.last_tick = Some(finished_at);
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let observed = 1.0 / dt;
        self.observed_framerate = Some(observed);
        self.adjustment += (self.target_framerate - observed) * ADJUSTMENT_GAIN;
        self.adjustment = self.adjustment.clamp(
            -self.target_interval,
            self.target_interval * MAX_ADJUSTMENT_FACTOR,
        );
    }

    /// Forget the last tick time so the next tick does not count the pause.
    pub fn pause(&mut self) {
        self.last_tick = None;
    }

    /// Delay before the next tick.
    pub fn next_delay(&self) -> Duration {
        Duration::from_secs_f64((self.target_interval + self.adjustment).max(0.0))
    }

    pub fn reset(&mut self) {
        self.adjustment = 0.0;
        self.last_tick = None;
        self.observed_framerate = None;
    }
}
