use tracing::warn;

use crate::foundation::error::{TwainError, TwainResult};
use crate::prompts::catalog::{Difficulty, Theme};
use crate::provider::{ProviderError, TextProvider, TextRequest};
use crate::render::cards::QUESTIONS_PER_BATCH;

/// Questions must be strictly shorter than this many characters.
pub const MAX_QUESTION_CHARS: usize = 200;

const QUESTION_SYSTEM: &str = "You are a relationship expert helping couples get closer.";
const QUESTION_SUFFIX: &str = "Give exactly 5 questions. Each must be under 200 characters. \
Do not number or bullet them. Keep the questions on one line each.";

pub fn question_request(prompt: &str) -> TextRequest {
    TextRequest::new(QUESTION_SYSTEM, format!("{} {QUESTION_SUFFIX}", prompt.trim()))
}

/// Five validated questions for one theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSet {
    pub category: String,
    pub difficulty: Difficulty,
    pub questions: [String; QUESTIONS_PER_BATCH],
}

impl QuestionSet {
    pub fn new(
        category: impl Into<String>,
        difficulty: Difficulty,
        questions: Vec<String>,
        max_chars: usize,
    ) -> TwainResult<Self> {
        if let Some(q) = questions
            .iter()
            .find(|q| q.trim().is_empty() || q.chars().count() >= max_chars)
        {
            return Err(TwainError::validation(format!(
                "question must be non-empty and under {max_chars} characters: {q:?}"
            )));
        }
        let found = questions.len();
        let questions: [String; QUESTIONS_PER_BATCH] = questions.try_into().map_err(|_| {
            TwainError::validation(format!(
                "expected exactly {QUESTIONS_PER_BATCH} questions, got {found}"
            ))
        })?;
        Ok(Self {
            category: category.into(),
            difficulty,
            questions,
        })
    }
}

fn clean_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '–' | '—' | '-' | '•' | '*') || c.is_whitespace())
        .trim()
}

/// Extract questions from a free-form model reply.
///
/// Returns exactly five questions, or an empty vector when fewer than five usable lines remain.
/// A reply collapsed onto one line is split after every `?` and on literal `\n` escapes. Lines
/// at or over `max_chars` characters are dropped before counting.
pub fn parse_questions(raw: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = raw
        .lines()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if lines.len() == 1 {
        let expanded = lines[0].replace("\\n", "\n").replace('?', "?\n");
        lines = expanded
            .lines()
            .map(clean_line)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
    }

    lines.retain(|l| l.chars().count() < max_chars);
    if lines.len() < QUESTIONS_PER_BATCH {
        return Vec::new();
    }
    lines.truncate(QUESTIONS_PER_BATCH);
    lines
}

/// Ask the provider for five questions on `theme`.
///
/// `Ok(None)` means the reply did not contain enough usable questions; the caller skips the batch.
#[tracing::instrument(skip(provider, theme), fields(category = %theme.category, difficulty = %theme.difficulty))]
pub fn generate_questions(
    provider: &dyn TextProvider,
    theme: &Theme,
    max_chars: usize,
) -> Result<Option<QuestionSet>, ProviderError> {
    let raw = provider.generate_text(&question_request(&theme.prompt))?;
    let questions = parse_questions(&raw, max_chars);
    if questions.is_empty() {
        warn!(reply_lines = raw.lines().count(), "reply did not contain 5 usable questions");
        return Ok(None);
    }
    match QuestionSet::new(theme.category.clone(), theme.difficulty, questions, max_chars) {
        Ok(set) => Ok(Some(set)),
        Err(err) => {
            warn!(error = %err, "discarding invalid question set");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/prompts/questions.rs"]
mod tests;
