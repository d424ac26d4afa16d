//! Paint model shared by the overlay and the surface renderer.
//!
//! Only solid colors exist: the surface is cleared with a single color per frame.

pub mod color;

pub use color::Color;
