use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TwainError, TwainResult};
use crate::foundation::math::premul_rgba8;
use crate::layout::text::TextBrushRgba8;
use crate::render::FrameRGBA;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PxRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PxRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn to_cpu(self) -> vello_cpu::kurbo::Rect {
        vello_cpu::kurbo::Rect::new(self.x0, self.y0, self.x1, self.y1)
    }
}

/// One card being drawn with the `vello_cpu` rasterizer.
///
/// Draw calls are recorded in painter's order; [`CardCanvas::finish`] rasterizes them into a
/// premultiplied RGBA8 frame.
pub struct CardCanvas {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl CardCanvas {
    pub fn new(canvas: Canvas) -> TwainResult<Self> {
        canvas.validate()?;
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Fill the whole canvas with a solid straight-alpha color.
    pub fn fill_solid(&mut self, rgba: [u8; 4]) {
        let full = PxRect::new(0.0, 0.0, self.canvas.width_f64(), self.canvas.height_f64());
        self.fill_rect(full, rgba);
    }

    pub fn fill_rect(&mut self, rect: PxRect, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.reset_transforms();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&rect.to_cpu());
    }

    pub fn fill_rounded_rect(&mut self, rect: PxRect, radius: f64, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        let rr = kurbo::RoundedRect::new(rect.x0, rect.y0, rect.x1, rect.y1, radius.max(0.0));
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in rr.path_elements(0.1) {
            p.push(el);
        }
        self.reset_transforms();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_path(&p);
    }

    /// Draw a straight-alpha RGBA image covering the whole canvas.
    ///
    /// The image must already be canvas-sized.
    pub fn draw_full_image(&mut self, image: &image::RgbaImage) -> TwainResult<()> {
        let (w, h) = image.dimensions();
        if w != self.canvas.width || h != self.canvas.height {
            return Err(TwainError::render(format!(
                "background size mismatch: got {w}x{h}, expected {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        let paint = rgba_straight_to_image_premul(image.as_raw(), w, h)?;
        self.reset_transforms();
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        Ok(())
    }

    /// Draw a shaped single-line layout with its top-left corner at `(x, y)`.
    pub fn draw_text(
        &mut self,
        layout: &parley::Layout<TextBrushRgba8>,
        font: &vello_cpu::peniko::FontData,
        x: f64,
        y: f64,
    ) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> TwainResult<FrameRGBA> {
        let (w, h) = canvas_u16(self.canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn canvas_u16(canvas: Canvas) -> TwainResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TwainError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TwainError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TwainResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TwainError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_straight_to_image_premul(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> TwainResult<vello_cpu::Image> {
    let mut tmp = bytes_rgba.to_vec();
    for px in tmp.chunks_exact_mut(4) {
        let p = premul_rgba8([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&p);
    }
    let pixmap = pixmap_from_premul_bytes(&tmp, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
