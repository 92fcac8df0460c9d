use crate::foundation::core::Canvas;

/// Height of a block of `line_count` lines of `line_height` separated by `spacing`.
///
/// An empty block has zero height.
pub fn block_height(line_count: usize, line_height: f64, spacing: f64) -> f64 {
    if line_count == 0 {
        return 0.0;
    }
    let n = line_count as f64;
    n * line_height + (n - 1.0) * spacing
}

/// One wrapped line with its measured advance width.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredLine {
    pub text: String,
    pub width: f64,
}

/// Wrapped text block measured line by line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<MeasuredLine>,
    /// Uniform per-line height (from font metrics, not from the glyphs of each line).
    pub line_height: f64,
    pub spacing: f64,
}

impl TextBlock {
    pub fn height(&self) -> f64 {
        block_height(self.lines.len(), self.line_height, self.spacing)
    }

    pub fn max_width(&self) -> f64 {
        self.lines.iter().map(|l| l.width).fold(0.0, f64::max)
    }

    /// Top y of each line when the block starts at `top`.
    pub fn line_tops(&self, top: f64) -> impl Iterator<Item = f64> + '_ {
        let step = self.line_height + self.spacing;
        (0..self.lines.len()).map(move |i| top + step * i as f64)
    }
}

/// Left x that horizontally centers content of `width` on the canvas.
pub fn centered_x(canvas: Canvas, width: f64) -> f64 {
    (canvas.width_f64() - width) / 2.0
}

/// Axis-aligned box around a centered text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Top y of the first text line inside the box.
    pub text_top: f64,
}

impl BoxGeometry {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Box sized to `block` plus padding, centered on the canvas center.
pub fn centered_box(canvas: Canvas, block: &TextBlock, pad_x: f64, pad_y: f64) -> BoxGeometry {
    let block_h = block.height();
    let max_w = block.max_width();
    let text_top = canvas.height_f64() / 2.0 - block_h / 2.0;
    BoxGeometry {
        left: centered_x(canvas, max_w) - pad_x,
        top: text_top - pad_y,
        right: centered_x(canvas, max_w) + max_w + pad_x,
        bottom: text_top + block_h + pad_y,
        text_top,
    }
}

/// Vertical positions of the tag / divider / question stack on a question card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestionStack {
    pub tag_top: f64,
    pub rule_y: f64,
    pub text_top: f64,
    pub height: f64,
}

/// Spacing parameters of the question-card stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackSpacing {
    pub above_rule: f64,
    pub rule_thickness: f64,
    pub below_rule: f64,
}

/// Stack tag, rule and question block, then center the whole stack vertically.
pub fn question_stack(
    canvas: Canvas,
    tag_height: f64,
    question_block_height: f64,
    spacing: StackSpacing,
) -> QuestionStack {
    let height = tag_height
        + spacing.above_rule
        + spacing.rule_thickness
        + spacing.below_rule
        + question_block_height;
    let tag_top = canvas.height_f64() / 2.0 - height / 2.0;
    let rule_y = tag_top + tag_height + spacing.above_rule;
    QuestionStack {
        tag_top,
        rule_y,
        text_top: rule_y + spacing.rule_thickness + spacing.below_rule,
        height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/metrics.rs"]
mod tests;
