//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Device/Queue and configuring the window Surface
//! - clearing and presenting one frame per redraw

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuInit, SurfaceErrorAction};
