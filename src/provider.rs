//! Language-model and image-generation collaborators.
//!
//! The pipeline only talks to the traits here; [`openai::OpenAiClient`] is the production
//! implementation and tests plug in small fakes.

pub mod openai;

use crate::foundation::core::Canvas;

/// A single chat-style completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    pub system: String,
    pub user: String,
}

impl TextRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Produces free-form text for a request.
pub trait TextProvider {
    fn generate_text(&self, request: &TextRequest) -> Result<String, ProviderError>;
}

/// Produces one encoded image (PNG/JPEG bytes) for a prompt, sized for `canvas`'s aspect ratio.
pub trait ImageProvider {
    fn generate_image(&self, prompt: &str, canvas: Canvas) -> Result<Vec<u8>, ProviderError>;
}

impl<T: TextProvider + ?Sized> TextProvider for &T {
    fn generate_text(&self, request: &TextRequest) -> Result<String, ProviderError> {
        (**self).generate_text(request)
    }
}

impl<T: ImageProvider + ?Sized> ImageProvider for &T {
    fn generate_image(&self, prompt: &str, canvas: Canvas) -> Result<Vec<u8>, ProviderError> {
        (**self).generate_image(prompt, canvas)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider request failed: {0}")]
    RequestFailed(String),

    #[error("provider rate limited: {0}")]
    RateLimited(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether a later attempt could plausibly succeed. The pipeline itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::RateLimited(_) => true,
            ProviderError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
