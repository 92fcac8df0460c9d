use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::assets::decode::load_frame;
use crate::effects::composite::crossfade_into;
use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TwainError, TwainResult};
use crate::render::FrameRGBA;
use crate::render::cards::{FrameSlot, frame_file_name};
use crate::video::timeline::Timeline;

/// File name of the assembled video inside a batch directory.
pub const VIDEO_FILE_NAME: &str = "daily_video.mp4";

/// Summary of one assembled video.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyStats {
    pub images: usize,
    pub frames: u64,
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
}

/// Turns an ordered list of card images into a hold-and-crossfade slideshow.
#[derive(Clone, Debug, Default)]
pub struct VideoAssembler {
    timeline: Timeline,
}

impl VideoAssembler {
    pub fn new(timeline: Timeline) -> TwainResult<Self> {
        timeline.validate()?;
        Ok(Self { timeline })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Existing `question_{0..6}.jpg` files in `dir`, in slot order. Missing slots are skipped.
    pub fn collect_frame_paths(dir: &Path) -> Vec<PathBuf> {
        (0..FrameSlot::COUNT)
            .map(|i| dir.join(frame_file_name(i)))
            .filter(|p| p.is_file())
            .collect()
    }

    /// Stream the slideshow for `frames` into `sink`.
    ///
    /// Returns `Ok(None)` without touching the sink when there are no frames. Every frame must
    /// match the first frame's dimensions; this is checked before the sink is started.
    pub fn assemble(
        &self,
        frames: &[FrameRGBA],
        sink: &mut dyn FrameSink,
    ) -> TwainResult<Option<AssemblyStats>> {
        let Some(first) = frames.first() else {
            warn!("no frames to assemble, skipping video");
            return Ok(None);
        };
        let (width, height) = first.dimensions();
        for (i, f) in frames.iter().enumerate() {
            if f.dimensions() != (width, height) {
                return Err(TwainError::validation(format!(
                    "frame {i} is {}x{}, expected {width}x{height}",
                    f.width, f.height
                )));
            }
            if f.data.len() != (width as usize) * (height as usize) * 4 {
                return Err(TwainError::validation(format!(
                    "frame {i} data size mismatch with width*height*4"
                )));
            }
        }

        let hold = self.timeline.hold_frames();
        let fade = self.timeline.fade_frames();
        sink.begin(SinkConfig {
            width,
            height,
            fps: self.timeline.fps,
        })?;

        let mut idx = 0u64;
        let mut blend = FrameRGBA {
            width,
            height,
            data: vec![0u8; first.data.len()],
            premultiplied: first.premultiplied,
        };
        for (i, frame) in frames.iter().enumerate() {
            for _ in 0..hold {
                sink.push_frame(FrameIndex(idx), frame)?;
                idx += 1;
            }
            let Some(next) = frames.get(i + 1) else {
                continue;
            };
            blend.premultiplied = frame.premultiplied;
            for step in 1..=fade {
                let alpha = self.timeline.fade_alpha(step);
                crossfade_into(&mut blend.data, &frame.data, &next.data, alpha)?;
                sink.push_frame(FrameIndex(idx), &blend)?;
                idx += 1;
            }
        }
        sink.end()?;

        Ok(Some(AssemblyStats {
            images: frames.len(),
            frames: idx,
            duration_secs: self.timeline.fps.frames_to_secs(idx),
            width,
            height,
        }))
    }

    /// Load the batch images found in `dir` and stream them into `sink`.
    pub fn assemble_folder_into(
        &self,
        dir: &Path,
        sink: &mut dyn FrameSink,
    ) -> TwainResult<Option<AssemblyStats>> {
        let paths = Self::collect_frame_paths(dir);
        let frames = paths
            .iter()
            .map(|p| load_frame(p))
            .collect::<TwainResult<Vec<_>>>()?;
        self.assemble(&frames, sink)
    }

    /// Encode `dir/daily_video.mp4` from the batch images in `dir`.
    #[tracing::instrument(skip(self), fields(dir = %dir.display()))]
    pub fn assemble_folder(&self, dir: &Path) -> TwainResult<Option<AssemblyStats>> {
        let out = dir.join(VIDEO_FILE_NAME);
        let mut sink = FfmpegSink::new(&out);
        let stats = self.assemble_folder_into(dir, &mut sink)?;
        if let Some(s) = &stats {
            info!(
                out = %out.display(),
                images = s.images,
                frames = s.frames,
                duration_secs = s.duration_secs,
                "video assembled"
            );
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/assembler.rs"]
mod tests;
