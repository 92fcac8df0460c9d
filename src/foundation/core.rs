use crate::foundation::error::{TwainError, TwainResult};

/// Absolute 0-based frame index in output video timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TwainResult<Self> {
        if den == 0 {
            return Err(TwainError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TwainError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to a frame count, rounding to the nearest frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Portrait 9:16 canvas used for short-form video.
    pub const PORTRAIT_HD: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    pub fn validate(self) -> TwainResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TwainError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(TwainError::validation("canvas width/height exceeds u16"));
        }
        Ok(())
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PORTRAIT_HD
    }
}
