//! Slideshow assembly: hold/crossfade timing and the folder-to-MP4 assembler.

pub mod assembler;
pub mod timeline;
