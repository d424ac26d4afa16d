//! Frame-rate measurement.
//!
//! `RateCounter` owns the arithmetic, `FpsMeter` couples it to a `FrameScheduler`
//! so a single flag controls both visibility and counting.

mod band;
mod counter;
mod meter;

pub use band::FpsBand;
pub use counter::{RateCounter, RateState};
pub use meter::FpsMeter;
