use std::fmt;

/// 2D keypoint in source-frame pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Keypoint2 {
    pub x: f32,
    pub y: f32,
}

impl Keypoint2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 3D keypoint in model space (metric, wrist-relative).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Keypoint3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => f.write_str("Left"),
            Handedness::Right => f.write_str("Right"),
        }
    }
}

/// One detected hand as reported by a `HandDetector`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    pub handedness: Handedness,
    /// Detection confidence in `[0, 1]`.
    pub score: f32,
    pub keypoints: Vec<Keypoint2>,
    pub keypoints_3d: Vec<Keypoint3>,
}

/// Tightly packed RGBA8 camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> anyhow::Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "video frame has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            rgba.len() == expected,
            "video frame is {} bytes, expected {expected} for {width}x{height} RGBA",
            rgba.len()
        );
        Ok(Self { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}
