use tracing::warn;

use crate::provider::{TextProvider, TextRequest};

/// Used verbatim when the provider cannot write a caption.
pub const FALLBACK_CAPTION: &str = "Questions to explore with your person 💬 Save these to talk \
through together later. #relationships #couplesgoals #talktogether #deepquestions";

const CAPTION_SYSTEM: &str =
    "You are a social media copywriter for a relationship-focused account.";
const CAPTION_USER: &str = "Rewrite this social media caption in a fresh, casual way that still \
means the same thing: \"Questions to explore with your person 💬 Save these to talk through \
together later.\" Keep it short and modern. Do not mention any apps or brands. Then add 3–5 \
relevant hashtags at the end, like #relationships #talktogether.";

pub fn caption_request() -> TextRequest {
    TextRequest::new(CAPTION_SYSTEM, CAPTION_USER)
}

/// Caption for a batch; never fails.
pub fn generate_caption(provider: &dyn TextProvider) -> String {
    match provider.generate_text(&caption_request()) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("provider returned an empty caption, using fallback");
            FALLBACK_CAPTION.to_string()
        }
        Err(err) => {
            warn!(error = %err, "caption generation failed, using fallback");
            FALLBACK_CAPTION.to_string()
        }
    }
}
