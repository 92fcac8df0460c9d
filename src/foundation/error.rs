use crate::provider::ProviderError;
use crate::upload::UploadError;

pub type TwainResult<T> = Result<T, TwainError>;

#[derive(thiserror::Error, Debug)]
pub enum TwainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("background pool is empty after population")]
    EmptyPool,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TwainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
