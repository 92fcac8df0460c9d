use std::path::Path;

use crate::foundation::error::{TwainError, TwainResult};
use crate::layout::metrics::{MeasuredLine, TextBlock};

/// Sample used to derive a uniform line height (covers cap height and descender).
const LINE_HEIGHT_SAMPLE: &str = "Ag";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Self { r, g, b, a }
    }
}

/// Parley layout engine bound to a single font face.
///
/// The font is registered once at construction; every layout produced by the engine uses that
/// family. A missing or unparseable font is a construction error.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Load the font file at `path` and build an engine around it.
    pub fn from_font_path(path: &Path) -> TwainResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            TwainError::font(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes)
    }

    /// Build an engine from raw TTF/OTF bytes.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> TwainResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TwainError::font("no font families registered from font bytes"))?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TwainError::font("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Font handle for glyph rasterization.
    pub fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape one unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TwainResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TwainError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text` on a single line.
    pub fn measure_width(&mut self, text: &str, size_px: f32) -> TwainResult<f64> {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        Ok(f64::from(layout.width()))
    }

    /// Uniform line height for `size_px`, independent of the glyphs on any given line.
    pub fn line_height(&mut self, size_px: f32) -> TwainResult<f64> {
        let layout = self.layout_line(LINE_HEIGHT_SAMPLE, size_px, TextBrushRgba8::default())?;
        Ok(f64::from(layout.height()))
    }

    /// Measure already-wrapped lines into a [`TextBlock`].
    pub fn measure_block(
        &mut self,
        lines: &[String],
        size_px: f32,
        spacing: f64,
    ) -> TwainResult<TextBlock> {
        let line_height = self.line_height(size_px)?;
        let mut measured = Vec::with_capacity(lines.len());
        for line in lines {
            measured.push(MeasuredLine {
                text: line.clone(),
                width: self.measure_width(line, size_px)?,
            });
        }
        Ok(TextBlock {
            lines: measured,
            line_height,
            spacing,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
