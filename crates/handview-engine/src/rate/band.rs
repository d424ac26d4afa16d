use std::fmt;

use crate::paint::Color;

/// Presentation-only classification of an fps value.
///
/// Has no effect on counter state; renderers use it for color coding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FpsBand {
    /// Below 30 fps.
    Low,
    /// 30 through 60 fps, inclusive.
    Medium,
    /// Above 60 fps.
    High,
}

impl FpsBand {
    pub const MEDIUM_MIN: u32 = 30;
    pub const MEDIUM_MAX: u32 = 60;

    pub fn classify(fps: u32) -> Self {
        if fps < Self::MEDIUM_MIN {
            FpsBand::Low
        } else if fps <= Self::MEDIUM_MAX {
            FpsBand::Medium
        } else {
            FpsBand::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FpsBand::Low => "low",
            FpsBand::Medium => "medium",
            FpsBand::High => "high",
        }
    }

    /// Red, blue, green.
    pub fn color(self) -> Color {
        match self {
            FpsBand::Low => Color::from_srgb_u8(0xd9, 0x3b, 0x3b, 0xff),
            FpsBand::Medium => Color::from_srgb_u8(0x2f, 0x6f, 0xd6, 0xff),
            FpsBand::High => Color::from_srgb_u8(0x2e, 0xa0, 0x4f, 0xff),
        }
    }
}

impl fmt::Display for FpsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(FpsBand::classify(0), FpsBand::Low);
        assert_eq!(FpsBand::classify(29), FpsBand::Low);
        assert_eq!(FpsBand::classify(30), FpsBand::Medium);
        assert_eq!(FpsBand::classify(60), FpsBand::Medium);
        assert_eq!(FpsBand::classify(61), FpsBand::High);
        assert_eq!(FpsBand::classify(u32::MAX), FpsBand::High);
    }

    #[test]
    fn labels_match_display() {
        for band in [FpsBand::Low, FpsBand::Medium, FpsBand::High] {
            assert_eq!(band.to_string(), band.label());
        }
    }

    #[test]
    fn band_colors_are_distinct_and_opaque() {
        let (l, m, h) = (FpsBand::Low.color(), FpsBand::Medium.color(), FpsBand::High.color());
        assert_ne!(l, m);
        assert_ne!(m, h);
        assert_ne!(l, h);
        assert!([l, m, h].iter().all(|c| c.a == 1.0));
    }
}
