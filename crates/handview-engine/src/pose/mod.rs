//! Hand-pose plumbing.
//!
//! Model inference, capture and 3D rendering live outside this crate. This module
//! defines the seams they plug into (`FrameSource`, `HandDetector`, `PoseSink`), the
//! fixed hand skeleton, and a pipeline that runs one detection per host tick while
//! both a source and a detector are attached.

mod pipeline;
mod skeleton;
mod types;

pub use pipeline::{DetectorConfig, FrameSource, HandDetector, PoseFrame, PosePipeline, PoseSink};
pub use skeleton::{segments, HAND_CONNECTIONS, HAND_KEYPOINTS};
pub use types::{Hand, Handedness, Keypoint2, Keypoint3, VideoFrame};
