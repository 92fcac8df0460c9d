use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::foundation::core::Canvas;
use crate::provider::{ImageProvider, ProviderError, TextProvider, TextRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    /// Applied to every request, including image downloads.
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Blocking client for OpenAI-compatible chat completion and image generation endpoints.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    cfg: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiClient {
    pub fn new(cfg: OpenAiConfig) -> Result<Self, ProviderError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ProviderError::Auth("api key is empty".to_string()));
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.cfg.api_key)
            .json(body)
            .send()?;
        let resp = check_status(resp)?;
        Ok(resp.json::<R>()?)
    }
}

impl TextProvider for OpenAiClient {
    #[tracing::instrument(skip(self, request), fields(model = %self.cfg.text_model))]
    fn generate_text(&self, request: &TextRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.cfg.text_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };
        let parsed: ChatResponse = self.post_json("chat/completions", &body)?;
        first_chat_content(parsed)
    }
}

impl ImageProvider for OpenAiClient {
    #[tracing::instrument(skip(self, prompt), fields(model = %self.cfg.image_model))]
    fn generate_image(&self, prompt: &str, canvas: Canvas) -> Result<Vec<u8>, ProviderError> {
        let body = ImageRequest {
            model: &self.cfg.image_model,
            prompt,
            n: 1,
            size: image_size_for(canvas),
            response_format: "url",
        };
        let parsed: ImageResponse = self.post_json("images/generations", &body)?;
        let url = first_image_url(parsed)?;
        debug!(%url, "downloading generated image");

        let resp = check_status(self.http.get(&url).send()?)?;
        Ok(resp.bytes()?.to_vec())
    }
}

fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => ProviderError::Auth(body),
        429 => ProviderError::RateLimited(body),
        code => ProviderError::Status { status: code, body },
    })
}

fn first_chat_content(resp: ChatResponse) -> Result<String, ProviderError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ProviderError::invalid_response("chat response has no content"))
}

fn first_image_url(resp: ImageResponse) -> Result<String, ProviderError> {
    resp.data
        .into_iter()
        .next()
        .and_then(|d| d.url)
        .ok_or_else(|| ProviderError::invalid_response("image response has no url"))
}

/// Closest supported generation size for the canvas orientation.
pub fn image_size_for(canvas: Canvas) -> &'static str {
    use std::cmp::Ordering;
    match canvas.width.cmp(&canvas.height) {
        Ordering::Less => "1024x1792",
        Ordering::Greater => "1792x1024",
        Ordering::Equal => "1024x1024",
    }
}
