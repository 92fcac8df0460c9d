//! Card rendering: style configuration, the CPU canvas, and the three card kinds.

pub mod canvas;
pub mod cards;
pub mod style;

/// A rendered frame as RGBA8 pixels.
///
/// Frames coming out of the card canvas are premultiplied; frames decoded from JPEG files are
/// straight (and opaque). The `premultiplied` flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Opaque single-color frame.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
            premultiplied: false,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
