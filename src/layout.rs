//! Text layout: column wrapping, font measurement, and card geometry.

pub mod metrics;
pub mod text;
pub mod wrap;
