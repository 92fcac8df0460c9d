use super::*;

struct Canned(&'static str);

impl TextProvider for Canned {
    fn generate_text(&self, _request: &TextRequest) -> Result<String, ProviderError> {
        Ok(self.0.to_string())
    }
}

struct Down;

impl TextProvider for Down {
    fn generate_text(&self, _request: &TextRequest) -> Result<String, ProviderError> {
        Err(ProviderError::request_failed("connection refused"))
    }
}

fn theme() -> Theme {
    Theme {
        category: "DeepQuestions".to_string(),
        difficulty: Difficulty::Medium,
        prompt: "Write questions.".to_string(),
    }
}

#[test]
fn request_appends_the_format_rules() {
    let req = question_request("  Write sweet questions. ");
    assert!(req.system.contains("relationship expert"));
    assert!(req.user.starts_with("Write sweet questions. Give exactly 5 questions."));
    assert!(req.user.ends_with("Keep the questions on one line each."));
}

#[test]
fn strips_bullets_and_blank_lines() {
    let raw = "- What makes you laugh?\n\n• When did you feel proud?\n– What calms you?\n  What scares you?\n-What do you dream about?\n";
    let qs = parse_questions(raw, MAX_QUESTION_CHARS);
    assert_eq!(
        qs,
        vec![
            "What makes you laugh?",
            "When did you feel proud?",
            "What calms you?",
            "What scares you?",
            "What do you dream about?",
        ]
    );
}

#[test]
fn keeps_only_the_first_five() {
    let raw = (1..=7)
        .map(|i| format!("Question number {i}?"))
        .collect::<Vec<_>>()
        .join("\n");
    let qs = parse_questions(&raw, MAX_QUESTION_CHARS);
    assert_eq!(qs.len(), 5);
    assert_eq!(qs[4], "Question number 5?");
}

#[test]
fn single_line_reply_is_split_on_question_marks() {
    let raw = "Why me? What now? Where to? Who else? How so? Really?";
    let qs = parse_questions(raw, MAX_QUESTION_CHARS);
    assert_eq!(qs, vec!["Why me?", "What now?", "Where to?", "Who else?", "How so?"]);
}

#[test]
fn single_line_reply_is_split_on_literal_newline_escapes() {
    let raw = r"One thing you love\nTwo things you miss\nThree wishes\nFour places\nFive songs";
    let qs = parse_questions(raw, MAX_QUESTION_CHARS);
    assert_eq!(qs.len(), 5);
    assert_eq!(qs[0], "One thing you love");
    assert_eq!(qs[4], "Five songs");
}

#[test]
fn fewer_than_five_yields_empty() {
    assert!(parse_questions("A?\nB?\nC?\nD?", MAX_QUESTION_CHARS).is_empty());
    assert!(parse_questions("", MAX_QUESTION_CHARS).is_empty());
}

#[test]
fn overlong_lines_are_dropped_before_counting() {
    let long = "x".repeat(MAX_QUESTION_CHARS);
    let raw = format!("A?\nB?\n{long}\nC?\nD?\nE?");
    let qs = parse_questions(&raw, MAX_QUESTION_CHARS);
    assert_eq!(qs, vec!["A?", "B?", "C?", "D?", "E?"]);

    let raw = format!("A?\nB?\n{long}\nC?\nD?");
    assert!(parse_questions(&raw, MAX_QUESTION_CHARS).is_empty());
}

#[test]
fn result_is_all_or_nothing() {
    for raw in ["a\nb\nc\nd\ne\nf", "a\nb", "one? two? three? four? five?", ""] {
        let qs = parse_questions(raw, MAX_QUESTION_CHARS);
        assert!(qs.is_empty() || qs.len() == 5, "{raw:?} -> {qs:?}");
        assert!(
            qs.iter()
                .all(|q| !q.is_empty() && q.chars().count() < MAX_QUESTION_CHARS)
        );
    }
}

#[test]
fn question_set_enforces_count_and_length() {
    let five: Vec<String> = (0..5).map(|i| format!("q{i}?")).collect();
    let set = QuestionSet::new("DeepQuestions", Difficulty::Light, five.clone(), 200).unwrap();
    assert_eq!(set.questions[4], "q4?");

    assert!(QuestionSet::new("c", Difficulty::Light, five[..4].to_vec(), 200).is_err());
    let mut with_blank = five.clone();
    with_blank[2] = "  ".to_string();
    assert!(QuestionSet::new("c", Difficulty::Light, with_blank, 200).is_err());
    assert!(QuestionSet::new("c", Difficulty::Light, five, 3).is_err());
}

#[test]
fn generate_returns_a_set_or_none() {
    let ok = generate_questions(&Canned("a?\nb?\nc?\nd?\ne?"), &theme(), MAX_QUESTION_CHARS)
        .unwrap()
        .unwrap();
    assert_eq!(ok.category, "DeepQuestions");
    assert_eq!(ok.difficulty, Difficulty::Medium);

    let short = generate_questions(&Canned("a?\nb?"), &theme(), MAX_QUESTION_CHARS).unwrap();
    assert!(short.is_none());
}

#[test]
fn provider_errors_propagate() {
    let err = generate_questions(&Down, &theme(), MAX_QUESTION_CHARS).unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(_)));
}
