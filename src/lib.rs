//! Twain generates short vertical reels of relationship questions.
//!
//! One batch is: roll a theme, ask a language model for five questions, render an intro card over
//! a cached background, five question cards and an outro card, crossfade them into an MP4, write
//! a caption, and upload the folder. [`BatchRunner`] drives a run of batches.
#![forbid(unsafe_code)]

mod foundation;

/// Intro backgrounds and image file helpers.
pub mod assets;
/// Batch numbering and orchestration.
pub mod batch;
/// Environment-driven runtime configuration.
pub mod config;
pub mod effects;
/// Frame sinks (ffmpeg, in-memory).
pub mod encode;
pub mod layout;
pub mod prompts;
/// Text and image generation collaborators.
pub mod provider;
/// Card rendering.
pub mod render;
pub mod upload;
pub mod video;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{TwainError, TwainResult};

pub use crate::assets::backgrounds::BackgroundPool;
pub use crate::batch::{
    BatchId, BatchIdAllocator, BatchOutcome, BatchRunner, DirBatchIds, InMemoryBatchIds, RunReport,
};
pub use crate::config::TwainConfig;
pub use crate::encode::ffmpeg::FfmpegSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::provider::openai::{OpenAiClient, OpenAiConfig};
pub use crate::provider::{ImageProvider, ProviderError, TextProvider, TextRequest};
pub use crate::render::FrameRGBA;
pub use crate::render::cards::{CardRenderer, FrameSlot};
pub use crate::render::style::RenderConfig;
pub use crate::upload::{GcsUploader, UploadError, UploadReport, Uploader};
pub use crate::video::assembler::{AssemblyStats, VideoAssembler};
pub use crate::video::timeline::Timeline;
