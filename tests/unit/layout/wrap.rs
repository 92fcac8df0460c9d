use super::*;

#[test]
fn sanitize_strips_escapes_and_line_breaks() {
    assert_eq!(
        sanitize_text("What do you\\n love\r\n most?"),
        "What do you love most?"
    );
    assert_eq!(sanitize_text("plain"), "plain");
}

#[test]
fn wrap_respects_column_width() {
    let lines = wrap_columns("5 Questions to Ask Your Partner Tonight", 20);
    assert_eq!(lines, vec!["5 Questions to Ask", "Your Partner Tonight"]);
    for line in &lines {
        assert!(line.chars().count() <= 20);
    }
}

#[test]
fn wrap_collapses_whitespace() {
    let lines = wrap_columns("  a   b\tc  ", 25);
    assert_eq!(lines, vec!["a b c"]);
}

#[test]
fn wrap_blank_input_yields_no_lines() {
    assert!(wrap_columns("", 20).is_empty());
    assert!(wrap_columns("   \t ", 20).is_empty());
}

#[test]
fn wrap_breaks_long_words() {
    let lines = wrap_columns("abcdefghij", 4);
    assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn wrap_fills_remaining_room_before_breaking_long_word() {
    let lines = wrap_columns("ab cdefghij", 5);
    assert_eq!(lines, vec!["ab cd", "efghi", "j"]);
}

#[test]
fn wrap_counts_characters_not_bytes() {
    let lines = wrap_columns("café café café", 9);
    assert_eq!(lines, vec!["café café", "café"]);
}
