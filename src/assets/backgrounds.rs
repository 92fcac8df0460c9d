use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::assets::decode::{decode_rgba, load_rgba, resize_to_canvas, save_rgb_jpeg};
use crate::foundation::core::Canvas;
use crate::foundation::error::{TwainError, TwainResult};
use crate::provider::ImageProvider;

/// Prompt sent to the image provider for every pooled background.
pub const BACKGROUND_PROMPT: &str = "A romantic outdoor nature setting at dusk, soft lighting, \
peaceful, wide format, cinematic mood";

/// Pool size the renderer asks for when it finds the pool empty.
pub const DEFAULT_POOL_TARGET: usize = 5;

/// A directory of canvas-sized `bg_{n}.jpg` images generated on demand.
///
/// Members are never modified once written. Population is best effort: a provider, decode or
/// write failure stops filling the pool but keeps everything stored so far.
pub struct BackgroundPool<'a> {
    dir: PathBuf,
    canvas: Canvas,
    provider: &'a dyn ImageProvider,
    prompt: String,
    target: usize,
}

impl<'a> BackgroundPool<'a> {
    pub fn new(dir: impl Into<PathBuf>, canvas: Canvas, provider: &'a dyn ImageProvider) -> Self {
        Self {
            dir: dir.into(),
            canvas,
            provider,
            prompt: BACKGROUND_PROMPT.to_string(),
            target: DEFAULT_POOL_TARGET,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Current pool members, sorted by file name. A missing directory is an empty pool.
    pub fn members(&self) -> TwainResult<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_jpg = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("jpg"));
            if is_jpg && path.is_file() {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Grow the pool to at least `k` members and return the resulting size.
    ///
    /// Idempotent: a pool that already has `k` members is left untouched.
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn ensure_pool(&self, k: usize) -> TwainResult<usize> {
        let mut count = self.members()?.len();
        if count >= k {
            return Ok(count);
        }
        std::fs::create_dir_all(&self.dir)?;

        while count < k {
            let bytes = match self.provider.generate_image(&self.prompt, self.canvas) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(error = %err, count, "background generation failed, keeping current pool");
                    break;
                }
            };
            match self.store(&bytes) {
                Ok(path) => {
                    count += 1;
                    info!(path = %path.display(), count, "background cached");
                }
                Err(err) => {
                    warn!(error = %err, count, "could not store background, keeping current pool");
                    break;
                }
            }
        }
        Ok(count)
    }

    /// Pick a member uniformly at random (with replacement), filling an empty pool first.
    pub fn random_background(&self, rng: &mut impl rand::Rng) -> TwainResult<image::RgbaImage> {
        let mut members = self.members()?;
        if members.is_empty() {
            self.ensure_pool(self.target)?;
            members = self.members()?;
        }
        let path = members.choose(rng).ok_or(TwainError::EmptyPool)?;
        let img = load_rgba(path)?;
        Ok(resize_to_canvas(img, self.canvas))
    }

    fn store(&self, bytes: &[u8]) -> TwainResult<PathBuf> {
        let img = resize_to_canvas(decode_rgba(bytes)?, self.canvas);
        let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
        let path = self.next_free_path();
        save_rgb_jpeg(&rgb, &path)?;
        Ok(path)
    }

    fn next_free_path(&self) -> PathBuf {
        (1usize..)
            .map(|n| self.dir.join(format!("bg_{n}.jpg")))
            .find(|p| !p.exists())
            .unwrap_or_else(|| self.dir.join("bg_overflow.jpg"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/backgrounds.rs"]
mod tests;
