use std::time::{Duration, Instant};

/// Raw per-refresh event produced by the runtime.
#[derive(Debug, Copy, Clone)]
pub struct HostTick {
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic host tick counter (wraps).
    pub index: u64,
}

impl HostTick {
    pub fn new(now: Instant, index: u64) -> Self {
        Self { now, index }
    }
}

/// Elapsed-time measurement delivered to scheduler callbacks.
#[derive(Debug, Copy, Clone)]
pub struct FrameSample {
    /// Milliseconds since the previous sample.
    ///
    /// `0.0` on the first sample after (re)activation: no baseline exists yet.
    pub elapsed_millis: f64,

    /// Timestamp of the host tick that produced this sample.
    pub now: Instant,

    /// Samples delivered by the owning scheduler before this one.
    pub index: u64,
}

impl FrameSample {
    /// Returns `true` when this sample carries a measured delta.
    #[inline]
    pub fn has_baseline(&self) -> bool {
        self.elapsed_millis > 0.0
    }
}

/// Tracks the baseline instant between consecutive samples.
///
/// Unlike a simulation clock, deltas are reported as measured: no clamping is applied,
/// so rate computations see the real refresh interval.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Drops the baseline so the next tick reports no elapsed time.
    ///
    /// Called on (re)activation so a paused interval never shows up as one huge delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns the current baseline, if any.
    pub fn baseline(&self) -> Option<Instant> {
        self.last
    }

    /// Advances the baseline to `now` and returns the elapsed time in milliseconds.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);

        self.last = Some(now);
        elapsed.as_secs_f64() * 1000.0
    }
}
