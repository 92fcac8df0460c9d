use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::debug;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TwainError, TwainResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::FrameRGBA;

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> TwainResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encodes frames to an H.264 MP4 by piping raw RGBA into a system `ffmpeg` process.
///
/// The child process lives from `begin` to `end`. Dropping the sink mid-stream closes stdin and
/// reaps the child so no process outlives the batch.
pub struct FfmpegSink {
    out_path: PathBuf,
    overwrite: bool,
    bg_rgba: [u8; 4],
    running: Option<Running>,
}

struct Running {
    cfg: SinkConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            running: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Color that translucent pixels are flattened over.
    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn spawn(&self, cfg: SinkConfig) -> TwainResult<(Child, ChildStdin)> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.arg(if self.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&self.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            TwainError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TwainError::encode("failed to open ffmpeg stdin"))?;
        Ok((child, stdin))
    }
}

pub(crate) fn validate_sink_config(cfg: &SinkConfig) -> TwainResult<()> {
    if cfg.width == 0 || cfg.height == 0 {
        return Err(TwainError::validation(
            "encode width/height must be non-zero",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(TwainError::validation(
            "encode width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TwainResult<()> {
        if self.running.is_some() {
            return Err(TwainError::encode("ffmpeg sink already started"));
        }
        validate_sink_config(&cfg)?;
        ensure_parent_dir(&self.out_path)?;

        if !self.overwrite && self.out_path.exists() {
            return Err(TwainError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(TwainError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let (child, stdin) = self.spawn(cfg)?;
        debug!(out = %self.out_path.display(), width = cfg.width, height = cfg.height, "ffmpeg started");
        self.running = Some(Running {
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            child,
            stdin: Some(stdin),
        });
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> TwainResult<()> {
        let Some(run) = self.running.as_mut() else {
            return Err(TwainError::encode("ffmpeg sink is not running"));
        };
        if frame.width != run.cfg.width || frame.height != run.cfg.height {
            return Err(TwainError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, run.cfg.width, run.cfg.height
            )));
        }

        flatten_to_opaque_rgba8(
            &mut run.scratch,
            &frame.data,
            frame.premultiplied,
            self.bg_rgba,
        )?;

        let Some(stdin) = run.stdin.as_mut() else {
            return Err(TwainError::encode("ffmpeg stdin is already closed"));
        };
        stdin.write_all(&run.scratch).map_err(|e| {
            TwainError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> TwainResult<()> {
        let Some(mut run) = self.running.take() else {
            return Ok(());
        };
        drop(run.stdin.take());

        let output = run.child.wait_with_output().map_err(|e| {
            TwainError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TwainError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut run) = self.running.take() {
            drop(run.stdin.take());
            let _ = run.child.kill();
            let _ = run.child.wait();
        }
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> TwainResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TwainError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(u16::from(bg_rgba[c]), inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}
