//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - the runtime emits one `HostTick` per presented frame
//! - each consumer owns a `FrameScheduler` and feeds it the host ticks
//! - the scheduler turns ticks into `FrameSample`s only while it is active

mod frame_clock;
mod scheduler;

pub use frame_clock::{FrameClock, FrameSample, HostTick};
pub use scheduler::{ActiveScope, FrameScheduler};
