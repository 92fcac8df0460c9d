use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::error::{TwainError, TwainResult};
use crate::provider::openai::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, OpenAiConfig,
};

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Runtime settings read from the process environment (and `.env`, loaded by the binary).
#[derive(Clone, Debug, PartialEq)]
pub struct TwainConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub provider_timeout: Duration,
    /// Overrides the style's font path when set.
    pub font_path: Option<PathBuf>,
    /// Batch folders are created here.
    pub queue_dir: PathBuf,
    pub background_dir: PathBuf,
    pub prompts_path: Option<PathBuf>,
    pub gcs_bucket: Option<String>,
    pub gcs_access_token: Option<String>,
}

impl Default for TwainConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            font_path: None,
            queue_dir: PathBuf::from("queue"),
            background_dir: PathBuf::from("backgrounds"),
            prompts_path: None,
            gcs_bucket: None,
            gcs_access_token: None,
        }
    }
}

impl TwainConfig {
    pub fn from_env() -> TwainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TwainResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let provider_timeout = match get("TWAIN_PROVIDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    TwainError::config(format!(
                        "TWAIN_PROVIDER_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                if secs == 0 {
                    return Err(TwainError::config(
                        "TWAIN_PROVIDER_TIMEOUT_SECS must be > 0",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.provider_timeout,
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            text_model: get("TWAIN_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: get("TWAIN_IMAGE_MODEL").unwrap_or(defaults.image_model),
            provider_timeout,
            font_path: get("TWAIN_FONT_PATH").map(PathBuf::from),
            queue_dir: get("TWAIN_QUEUE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.queue_dir),
            background_dir: get("TWAIN_BACKGROUND_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.background_dir),
            prompts_path: get("TWAIN_PROMPTS_PATH").map(PathBuf::from),
            gcs_bucket: get("TWAIN_GCS_BUCKET"),
            gcs_access_token: get("TWAIN_GCS_ACCESS_TOKEN"),
        })
    }

    /// Provider settings; a missing API key is a configuration error.
    pub fn openai(&self) -> TwainResult<OpenAiConfig> {
        let api_key = self
            .openai_api_key
            .clone()
            .ok_or_else(|| TwainError::config("OPENAI_API_KEY is not set"))?;
        Ok(OpenAiConfig {
            api_key,
            base_url: self.openai_base_url.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            timeout: self.provider_timeout,
        })
    }

    /// Bucket and access token for uploads.
    pub fn gcs_credentials(&self) -> TwainResult<(&str, &str)> {
        let bucket = self
            .gcs_bucket
            .as_deref()
            .ok_or_else(|| TwainError::config("TWAIN_GCS_BUCKET is not set"))?;
        let token = self
            .gcs_access_token
            .as_deref()
            .ok_or_else(|| TwainError::config("TWAIN_GCS_ACCESS_TOKEN is not set"))?;
        Ok((bucket, token))
    }
}
