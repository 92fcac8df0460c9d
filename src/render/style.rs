use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{TwainError, TwainResult};

/// Visual parameters of every card kind.
///
/// Passed explicitly to the renderer so that renderers with different canvases can coexist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub canvas: Canvas,
    pub font_path: PathBuf,
    /// Solid card background (straight RGBA8).
    pub background_rgba: [u8; 4],
    pub text_rgba: [u8; 4],
    pub accent_rgba: [u8; 4],
    pub intro: IntroStyle,
    pub question: QuestionStyle,
    pub outro: OutroStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroStyle {
    pub font_size: f32,
    pub wrap_columns: usize,
    pub line_spacing: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub corner_radius: f64,
    /// Overlay box color; alpha controls how much background shows through.
    pub box_rgba: [u8; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionStyle {
    pub font_size: f32,
    pub tag_font_size: f32,
    pub brand_font_size: f32,
    pub wrap_columns: usize,
    pub line_spacing: f64,
    pub tag_prefix: String,
    pub spacing_above_rule: f64,
    pub spacing_below_rule: f64,
    pub rule_thickness: f64,
    /// Horizontal inset of the divider rule from each canvas edge.
    pub rule_inset: f64,
    pub brand_text: String,
    /// Distance from the canvas bottom to the top of the brand wordmark.
    pub brand_bottom_offset: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutroStyle {
    pub font_size: f32,
    pub text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::PORTRAIT_HD,
            font_path: PathBuf::from("assets/DMSerifDisplay-Regular.ttf"),
            background_rgba: [0x2E, 0x2E, 0x2E, 255],
            text_rgba: [0xFA, 0xDA, 0xDD, 255],
            accent_rgba: [0xFA, 0xDA, 0xDD, 255],
            intro: IntroStyle::default(),
            question: QuestionStyle::default(),
            outro: OutroStyle::default(),
        }
    }
}

impl Default for IntroStyle {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            wrap_columns: 20,
            line_spacing: 20.0,
            padding_x: 40.0,
            padding_y: 40.0,
            corner_radius: 24.0,
            box_rgba: [46, 46, 46, 180],
        }
    }
}

impl Default for QuestionStyle {
    fn default() -> Self {
        Self {
            font_size: 60.0,
            tag_font_size: 42.0,
            brand_font_size: 50.0,
            wrap_columns: 25,
            line_spacing: 20.0,
            tag_prefix: "Theme: ".to_string(),
            spacing_above_rule: 48.0,
            spacing_below_rule: 24.0,
            rule_thickness: 3.0,
            rule_inset: 100.0,
            brand_text: "Twain".to_string(),
            brand_bottom_offset: 140.0,
        }
    }
}

impl Default for OutroStyle {
    fn default() -> Self {
        Self {
            font_size: 72.0,
            text: "Follow for more!".to_string(),
        }
    }
}

impl RenderConfig {
    /// Read a JSON style file; missing fields take their defaults.
    pub fn from_json_path(path: &Path) -> TwainResult<Self> {
        let bytes = std::fs::read(path)?;
        let cfg: RenderConfig = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TwainResult<()> {
        self.canvas.validate()?;
        for (name, size) in [
            ("intro.font_size", self.intro.font_size),
            ("question.font_size", self.question.font_size),
            ("question.tag_font_size", self.question.tag_font_size),
            ("question.brand_font_size", self.question.brand_font_size),
            ("outro.font_size", self.outro.font_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(TwainError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if self.intro.wrap_columns == 0 || self.question.wrap_columns == 0 {
            return Err(TwainError::validation("wrap_columns must be > 0"));
        }
        if self.question.rule_inset * 2.0 >= self.canvas.width_f64() {
            return Err(TwainError::validation(
                "question.rule_inset leaves no room for the divider",
            ));
        }
        Ok(())
    }
}

/// Human-readable tag for a category identifier (`LoveAndIntimacy` -> `Love & Intimacy`).
pub fn category_label(category: &str) -> String {
    category.replace("And", " & ")
}
