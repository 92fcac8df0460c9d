use serde::{Deserialize, Serialize};

use crate::foundation::core::Fps;
use crate::foundation::error::{TwainError, TwainResult};

/// Slideshow timing: every image is held, then linearly crossfaded into its successor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub fps: Fps,
    pub hold_secs: f64,
    pub fade_secs: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            fps: Fps { num: 30, den: 1 },
            hold_secs: 1.4,
            fade_secs: 0.4,
        }
    }
}

impl Timeline {
    pub fn validate(&self) -> TwainResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.hold_secs.is_finite() || !self.fade_secs.is_finite() {
            return Err(TwainError::validation("timeline durations must be finite"));
        }
        if self.hold_frames() == 0 {
            return Err(TwainError::validation(
                "hold duration must cover at least one frame",
            ));
        }
        if self.fade_secs < 0.0 {
            return Err(TwainError::validation("fade duration must be >= 0"));
        }
        Ok(())
    }

    /// Frames each image is shown unchanged (42 at the defaults).
    pub fn hold_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.hold_secs)
    }

    /// Blend frames between consecutive images (12 at the defaults).
    pub fn fade_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.fade_secs)
    }

    /// Blend weight of fade step `step` (1-based); the last step is exactly 1.
    pub fn fade_alpha(&self, step: u64) -> f32 {
        let n = self.fade_frames();
        if n == 0 {
            return 1.0;
        }
        (step.min(n) as f32) / (n as f32)
    }

    /// Output frames for a slideshow of `images` images.
    pub fn total_frames(&self, images: usize) -> u64 {
        if images == 0 {
            return 0;
        }
        let n = images as u64;
        n * self.hold_frames() + (n - 1) * self.fade_frames()
    }

    pub fn duration_secs(&self, images: usize) -> f64 {
        self.fps.frames_to_secs(self.total_frames(images))
    }
}
