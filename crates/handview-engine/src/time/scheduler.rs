use std::ops::{Deref, DerefMut};
use std::time::Instant;

use super::frame_clock::{FrameClock, FrameSample, HostTick};

/// Gates a per-refresh callback behind a single activation flag.
///
/// The scheduler never blocks or owns a loop: the runtime drives it by handing in one
/// host tick per presented frame, and the scheduler decides whether the callback runs.
///
/// Invariants:
/// - inactive schedulers never invoke the callback and never touch their baseline
/// - every activation starts a fresh measurement window (baseline cleared)
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    active: bool,
    clock: FrameClock,
    samples: u64,
}

impl FrameScheduler {
    /// Creates an inactive scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates the scheduler. No-op if already active.
    pub fn start(&mut self) {
        self.set_active(true);
    }

    /// Deactivates the scheduler. No-op if already inactive.
    pub fn stop(&mut self) {
        self.set_active(false);
    }

    /// Flips the activation flag and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }

        if active {
            self.clock.reset();
        }
        self.active = active;
    }

    /// Activates the scheduler for the lifetime of the returned scope.
    ///
    /// Dropping the scope deactivates the scheduler, including on early return or unwind.
    pub fn scoped(&mut self) -> ActiveScope<'_> {
        self.start();
        ActiveScope { scheduler: self }
    }

    /// Number of samples delivered since creation.
    pub fn samples_delivered(&self) -> u64 {
        self.samples
    }

    /// Feeds one host tick into the scheduler.
    pub fn tick<F, R>(&mut self, tick: HostTick, f: F) -> Option<R>
    where
        F: FnOnce(FrameSample) -> R,
    {
        self.tick_at(tick.now, f)
    }

    /// Invokes `f` with the elapsed time since the previous invocation, if active.
    ///
    /// Whatever `f` returns (including an `Err`) is handed back untouched.
    pub fn tick_at<F, R>(&mut self, now: Instant, f: F) -> Option<R>
    where
        F: FnOnce(FrameSample) -> R,
    {
        if !self.active {
            return None;
        }

        let sample = FrameSample {
            elapsed_millis: self.clock.tick_at(now),
            now,
            index: self.samples,
        };
        self.samples = self.samples.wrapping_add(1);

        Some(f(sample))
    }
}

/// Scoped activation of a [`FrameScheduler`].
///
/// Derefs to the scheduler so ticks can be fed through the scope.
pub struct ActiveScope<'a> {
    scheduler: &'a mut FrameScheduler,
}

impl Deref for ActiveScope<'_> {
    type Target = FrameScheduler;

    fn deref(&self) -> &FrameScheduler {
        self.scheduler
    }
}

impl DerefMut for ActiveScope<'_> {
    fn deref_mut(&mut self) -> &mut FrameScheduler {
        self.scheduler
    }
}

impl Drop for ActiveScope<'_> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn starts_inactive() {
        assert!(!FrameScheduler::new().is_active());
    }

    #[test]
    fn inactive_never_invokes_callback() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        let mut calls = 0;
        for i in 0..100 {
            let out = sched.tick_at(ms(t0, i * 16), |_| calls += 1);
            assert!(out.is_none());
        }
        assert_eq!(calls, 0);
        assert_eq!(sched.samples_delivered(), 0);
    }

    #[test]
    fn toggle_returns_new_state() {
        let mut sched = FrameScheduler::new();
        assert!(sched.toggle());
        assert!(!sched.toggle());
    }

    // ── elapsed time ──────────────────────────────────────────────────────

    #[test]
    fn first_sample_after_activation_has_no_elapsed_time() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        sched.start();
        let s = sched.tick_at(t0, |s| s).unwrap();
        assert_eq!(s.elapsed_millis, 0.0);
        assert!(!s.has_baseline());
    }

    #[test]
    fn consecutive_samples_report_delta() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        sched.start();
        sched.tick_at(t0, |_| ());
        let s = sched.tick_at(ms(t0, 33), |s| s).unwrap();
        assert!((s.elapsed_millis - 33.0).abs() < 1e-9);
        assert_eq!(s.index, 1);
    }

    #[test]
    fn reactivation_resets_baseline() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        sched.start();
        sched.tick_at(t0, |_| ());
        sched.stop();

        // Ticks while paused must not count toward the next delta.
        sched.tick_at(ms(t0, 500), |_| ());
        sched.start();

        let s = sched.tick_at(ms(t0, 2_000), |s| s).unwrap();
        assert_eq!(s.elapsed_millis, 0.0);

        let s = sched.tick_at(ms(t0, 2_016), |s| s).unwrap();
        assert!((s.elapsed_millis - 16.0).abs() < 1e-9);
    }

    #[test]
    fn start_while_active_keeps_baseline() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        sched.start();
        sched.tick_at(t0, |_| ());
        sched.start();
        let s = sched.tick_at(ms(t0, 20), |s| s).unwrap();
        assert!((s.elapsed_millis - 20.0).abs() < 1e-9);
    }

    // ── callback results ──────────────────────────────────────────────────

    #[test]
    fn callback_errors_propagate() {
        let mut sched = FrameScheduler::new();
        sched.start();
        let out: Option<Result<(), &str>> = sched.tick_at(Instant::now(), |_| Err("boom"));
        assert_eq!(out, Some(Err("boom")));
    }

    #[test]
    fn host_tick_is_forwarded() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        sched.start();
        let s = sched.tick(HostTick::new(t0, 7), |s| s).unwrap();
        assert_eq!(s.now, t0);
        assert_eq!(s.index, 0);
    }

    // ── scoped activation ─────────────────────────────────────────────────

    #[test]
    fn scope_deactivates_on_drop() {
        let t0 = Instant::now();
        let mut sched = FrameScheduler::new();
        {
            let mut scope = sched.scoped();
            assert!(scope.is_active());
            assert!(scope.tick_at(t0, |_| ()).is_some());
        }
        assert!(!sched.is_active());
        assert!(sched.tick_at(ms(t0, 16), |_| ()).is_none());
    }
}
