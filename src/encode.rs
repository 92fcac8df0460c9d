//! Frame sinks: where assembled video frames go.

pub mod ffmpeg;
pub mod sink;
