use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TwainError, TwainResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::FrameRGBA;

/// JPEG quality used for every card and background written to disk.
pub const JPEG_QUALITY: u8 = 92;

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into straight RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> TwainResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read an image file into straight RGBA8.
pub fn load_rgba(path: &Path) -> TwainResult<image::RgbaImage> {
    let dyn_img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?;
    Ok(dyn_img.to_rgba8())
}

/// Resize to exactly the canvas size, ignoring aspect ratio; a no-op when sizes already match.
pub fn resize_to_canvas(img: image::RgbaImage, canvas: Canvas) -> image::RgbaImage {
    if img.dimensions() == (canvas.width, canvas.height) {
        return img;
    }
    image::imageops::resize(&img, canvas.width, canvas.height, FilterType::Triangle)
}

/// Wrap a straight RGBA8 image as a frame.
pub fn frame_from_rgba(img: image::RgbaImage) -> FrameRGBA {
    let (width, height) = img.dimensions();
    FrameRGBA {
        width,
        height,
        data: img.into_raw(),
        premultiplied: false,
    }
}

/// Load an image file as a straight RGBA8 frame.
pub fn load_frame(path: &Path) -> TwainResult<FrameRGBA> {
    Ok(frame_from_rgba(load_rgba(path)?))
}

/// Flatten a frame onto an opaque background and return tightly packed RGB8.
pub fn flatten_to_rgb8(frame: &FrameRGBA, bg_rgb: [u8; 3]) -> TwainResult<Vec<u8>> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(TwainError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }

    let mut out = Vec::with_capacity(expected / 4 * 3);
    for s in frame.data.chunks_exact(4) {
        let a = u16::from(s[3]);
        if a == 255 {
            out.extend_from_slice(&s[..3]);
            continue;
        }
        let inv = 255u16 - a;
        for c in 0..3 {
            let src = if frame.premultiplied {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            let v = src + mul_div255_u16(u16::from(bg_rgb[c]), inv);
            out.push(v.min(255) as u8);
        }
    }
    Ok(out)
}

/// Write a frame as a baseline JPEG (flattened over black).
pub fn save_frame_jpeg(frame: &FrameRGBA, path: &Path) -> TwainResult<()> {
    let rgb = flatten_to_rgb8(frame, [0, 0, 0])?;
    let img = image::RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| TwainError::validation("rgb buffer does not match frame size"))?;
    save_rgb_jpeg(&img, path)
}

/// Write an RGB image as a JPEG at [`JPEG_QUALITY`].
pub fn save_rgb_jpeg(img: &image::RgbImage, path: &Path) -> TwainResult<()> {
    let file = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(img)?;
    Ok(())
}
