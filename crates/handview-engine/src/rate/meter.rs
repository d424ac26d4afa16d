use crate::time::{FrameScheduler, HostTick};

use super::band::FpsBand;
use super::counter::{RateCounter, RateState};

/// On-screen fps meter.
///
/// Visibility and counting share one flag: the scheduler's activation. A hidden meter
/// ignores host ticks entirely; showing it again starts a fresh measurement window
/// but keeps the processed-frame total.
#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    scheduler: FrameScheduler,
    counter: RateCounter,
}

impl FpsMeter {
    /// Creates a hidden meter.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn show(&mut self) {
        self.scheduler.start();
    }

    pub fn hide(&mut self) {
        self.scheduler.stop();
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self) -> bool {
        let visible = self.scheduler.toggle();
        log::debug!("fps meter {}", if visible { "shown" } else { "hidden" });
        visible
    }

    /// Feeds one host tick. Returns `true` if the counter advanced.
    pub fn on_tick(&mut self, tick: HostTick) -> bool {
        let counter = &mut self.counter;
        self.scheduler
            .tick(tick, |sample| counter.record(&sample))
            .is_some()
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.counter.fps()
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.counter.frames_processed()
    }

    pub fn band(&self) -> FpsBand {
        FpsBand::classify(self.fps())
    }

    pub fn state(&self) -> RateState {
        self.counter.snapshot(self.is_visible())
    }

    /// Overlay text, e.g. `FPS: 62, Frames processed: 120`.
    pub fn label(&self) -> String {
        format!(
            "FPS: {}, Frames processed: {}",
            self.fps(),
            self.frames_processed()
        )
    }
}
