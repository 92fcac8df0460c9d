//! Theme selection and the language-model requests built around it.

pub mod caption;
pub mod catalog;
pub mod questions;

pub use caption::{FALLBACK_CAPTION, caption_request, generate_caption};
pub use catalog::{Difficulty, INTRO_HOOKS, PromptCatalog, Theme, pick_hook};
pub use questions::{
    MAX_QUESTION_CHARS, QuestionSet, generate_questions, parse_questions, question_request,
};
