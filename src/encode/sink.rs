use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::TwainResult;
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Sink contract for consuming frames in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing, contiguous `FrameIndex`
/// values starting at 0, between one `begin` and one `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> TwainResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TwainResult<()>;
    fn end(&mut self) -> TwainResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TwainResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TwainResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TwainResult<()> {
        self.ended = true;
        Ok(())
    }
}
