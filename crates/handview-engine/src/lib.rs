//! Handview engine crate.
//!
//! Frame scheduling and rate measurement for a live camera overlay, plus the
//! platform + GPU runtime that drives them once per display refresh.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod pose;
pub mod rate;
