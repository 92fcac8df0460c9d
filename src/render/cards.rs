use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::assets::backgrounds::BackgroundPool;
use crate::assets::decode::{resize_to_canvas, save_frame_jpeg};
use crate::foundation::error::{TwainError, TwainResult};
use crate::layout::metrics::{StackSpacing, centered_box, centered_x, question_stack};
use crate::layout::text::{TextBrushRgba8, TextLayoutEngine};
use crate::layout::wrap::{sanitize_text, wrap_columns};
use crate::render::FrameRGBA;
use crate::render::canvas::{CardCanvas, PxRect};
use crate::render::style::{RenderConfig, category_label};

/// Number of question cards in a batch.
pub const QUESTIONS_PER_BATCH: usize = 5;

/// Position of a card in a batch; determines the file name and video order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    Intro,
    /// 0-based question index (`0..5`).
    Question(usize),
    Outro,
}

impl FrameSlot {
    /// Number of slots per batch (intro + questions + outro).
    pub const COUNT: usize = QUESTIONS_PER_BATCH + 2;

    /// Positional index `0..=6`.
    pub fn index(self) -> usize {
        match self {
            FrameSlot::Intro => 0,
            FrameSlot::Question(i) => i + 1,
            FrameSlot::Outro => QUESTIONS_PER_BATCH + 1,
        }
    }

    pub fn file_name(self) -> String {
        frame_file_name(self.index())
    }

    pub fn all() -> [FrameSlot; FrameSlot::COUNT] {
        [
            FrameSlot::Intro,
            FrameSlot::Question(0),
            FrameSlot::Question(1),
            FrameSlot::Question(2),
            FrameSlot::Question(3),
            FrameSlot::Question(4),
            FrameSlot::Outro,
        ]
    }
}

/// File name of the card at positional `index`.
pub fn frame_file_name(index: usize) -> String {
    format!("question_{index}.jpg")
}

/// Renders intro, question and outro cards onto fixed-size canvases.
pub struct CardRenderer {
    cfg: RenderConfig,
    text: TextLayoutEngine,
}

impl CardRenderer {
    /// Build a renderer, loading the configured font. A missing font is fatal.
    pub fn new(cfg: RenderConfig) -> TwainResult<Self> {
        cfg.validate()?;
        let text = TextLayoutEngine::from_font_path(&cfg.font_path)?;
        Ok(Self { cfg, text })
    }

    /// Build a renderer around already-loaded font bytes (ignores `cfg.font_path`).
    pub fn with_font_bytes(cfg: RenderConfig, font_bytes: Vec<u8>) -> TwainResult<Self> {
        cfg.validate()?;
        let text = TextLayoutEngine::from_font_bytes(font_bytes)?;
        Ok(Self { cfg, text })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Intro card: hook text in a translucent box over a random pooled background.
    #[tracing::instrument(skip(self, pool, rng))]
    pub fn render_intro(
        &mut self,
        hook_text: &str,
        pool: &BackgroundPool<'_>,
        rng: &mut impl rand::Rng,
        out_dir: &Path,
    ) -> TwainResult<PathBuf> {
        let background = pool.random_background(rng)?;
        let frame = self.draw_intro(hook_text, &background)?;
        self.write(FrameSlot::Intro, &frame, out_dir)
    }

    /// Question card `index` (0-based) with its category tag and brand wordmark.
    #[tracing::instrument(skip(self, question_text))]
    pub fn render_question(
        &mut self,
        question_text: &str,
        category: &str,
        index: usize,
        out_dir: &Path,
    ) -> TwainResult<PathBuf> {
        let frame = self.draw_question(question_text, category, index)?;
        self.write(FrameSlot::Question(index), &frame, out_dir)
    }

    /// Closing "follow" card.
    pub fn render_outro(&mut self, out_dir: &Path) -> TwainResult<PathBuf> {
        let frame = self.draw_outro()?;
        self.write(FrameSlot::Outro, &frame, out_dir)
    }

    pub fn draw_intro(
        &mut self,
        hook_text: &str,
        background: &image::RgbaImage,
    ) -> TwainResult<FrameRGBA> {
        let canvas_size = self.cfg.canvas;
        let style = self.cfg.intro.clone();

        let background = if background.dimensions() == (canvas_size.width, canvas_size.height) {
            Cow::Borrowed(background)
        } else {
            Cow::Owned(resize_to_canvas(background.clone(), canvas_size))
        };

        let lines = wrap_columns(&sanitize_text(hook_text), style.wrap_columns);
        let block = self
            .text
            .measure_block(&lines, style.font_size, style.line_spacing)?;
        let bx = centered_box(canvas_size, &block, style.padding_x, style.padding_y);

        let mut canvas = CardCanvas::new(canvas_size)?;
        canvas.draw_full_image(&background)?;
        canvas.fill_rounded_rect(
            PxRect::new(bx.left, bx.top, bx.right, bx.bottom),
            style.corner_radius,
            style.box_rgba,
        );
        for (line, top) in block.lines.iter().zip(block.line_tops(bx.text_top)) {
            self.draw_centered_line(&mut canvas, &line.text, style.font_size, top)?;
        }

        debug!(lines = block.lines.len(), box_w = bx.width(), box_h = bx.height(), "intro laid out");
        canvas.finish()
    }

    pub fn draw_question(
        &mut self,
        question_text: &str,
        category: &str,
        index: usize,
    ) -> TwainResult<FrameRGBA> {
        if index >= QUESTIONS_PER_BATCH {
            return Err(TwainError::validation(format!(
                "question index {index} out of range (0..{QUESTIONS_PER_BATCH})"
            )));
        }
        let canvas_size = self.cfg.canvas;
        let style = self.cfg.question.clone();

        let lines = wrap_columns(&sanitize_text(question_text), style.wrap_columns);
        let block = self
            .text
            .measure_block(&lines, style.font_size, style.line_spacing)?;

        let tag_text = format!("{}{}", style.tag_prefix, category_label(category));
        let tag_height = self.text.line_height(style.tag_font_size)?;

        let stack = question_stack(
            canvas_size,
            tag_height,
            block.height(),
            StackSpacing {
                above_rule: style.spacing_above_rule,
                rule_thickness: style.rule_thickness,
                below_rule: style.spacing_below_rule,
            },
        );

        let mut canvas = CardCanvas::new(canvas_size)?;
        canvas.fill_solid(self.cfg.background_rgba);
        self.draw_centered_line(&mut canvas, &tag_text, style.tag_font_size, stack.tag_top)?;
        canvas.fill_rect(
            PxRect::new(
                style.rule_inset,
                stack.rule_y,
                canvas_size.width_f64() - style.rule_inset,
                stack.rule_y + style.rule_thickness,
            ),
            self.cfg.accent_rgba,
        );
        for (line, top) in block.lines.iter().zip(block.line_tops(stack.text_top)) {
            self.draw_centered_line(&mut canvas, &line.text, style.font_size, top)?;
        }

        let brand_top = canvas_size.height_f64() - style.brand_bottom_offset;
        self.draw_centered_line(
            &mut canvas,
            &style.brand_text,
            style.brand_font_size,
            brand_top,
        )?;

        canvas.finish()
    }

    pub fn draw_outro(&mut self) -> TwainResult<FrameRGBA> {
        let canvas_size = self.cfg.canvas;
        let style = self.cfg.outro.clone();

        let height = self.text.line_height(style.font_size)?;
        let top = (canvas_size.height_f64() - height) / 2.0;

        let mut canvas = CardCanvas::new(canvas_size)?;
        canvas.fill_solid(self.cfg.background_rgba);
        self.draw_centered_line(&mut canvas, &style.text, style.font_size, top)?;
        canvas.finish()
    }

    fn draw_centered_line(
        &mut self,
        canvas: &mut CardCanvas,
        text: &str,
        size_px: f32,
        top: f64,
    ) -> TwainResult<()> {
        let brush = TextBrushRgba8::from_rgba(self.cfg.text_rgba);
        let layout = self.text.layout_line(text, size_px, brush)?;
        let x = centered_x(canvas.canvas(), f64::from(layout.width()));
        canvas.draw_text(&layout, self.text.font(), x, top);
        Ok(())
    }

    fn write(&self, slot: FrameSlot, frame: &FrameRGBA, out_dir: &Path) -> TwainResult<PathBuf> {
        let path = out_dir.join(slot.file_name());
        save_frame_jpeg(frame, &path)?;
        debug!(path = %path.display(), "card written");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cards.rs"]
mod tests;
