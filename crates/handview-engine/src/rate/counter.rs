use crate::time::FrameSample;

/// Snapshot of the rate counter exposed to the UI layer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RateState {
    pub frames_per_second: u32,
    pub frames_processed: u64,
    pub active: bool,
}

/// Instantaneous frame rate plus a running count of processed frames.
///
/// There is no reset: counts live as long as the counter.
#[derive(Debug, Clone, Default)]
pub struct RateCounter {
    fps: u32,
    frames_processed: u64,
}

impl RateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Consumes one sample: recomputes fps and counts the frame.
    pub fn record(&mut self, sample: &FrameSample) {
        self.fps = fps_from_elapsed(sample.elapsed_millis);
        self.frames_processed = self.frames_processed.saturating_add(1);
    }

    pub fn snapshot(&self, active: bool) -> RateState {
        RateState {
            frames_per_second: self.fps,
            frames_processed: self.frames_processed,
            active,
        }
    }
}

/// `floor(1000 / elapsed_millis)`, or 0 when no positive finite delta exists.
pub(crate) fn fps_from_elapsed(elapsed_millis: f64) -> u32 {
    if !elapsed_millis.is_finite() || elapsed_millis <= 0.0 {
        return 0;
    }

    // `as` saturates for values beyond u32::MAX.
    (1000.0 / elapsed_millis).floor() as u32
}
