//! Pixel-level frame effects.

pub mod composite;
