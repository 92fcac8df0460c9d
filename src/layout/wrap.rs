//! Column-based word wrapping.
//!
//! Card text is wrapped by character columns (not pixels) so that line breaks are stable across
//! fonts; each resulting line is then measured individually with real font metrics.

/// Remove embedded line breaks so the renderer alone decides where lines break.
///
/// Strips literal `\n` escape sequences (as produced by some language-model responses) as well as
/// real newline and carriage-return characters.
pub fn sanitize_text(text: &str) -> String {
    text.replace("\\n", "")
        .replace('\n', "")
        .replace('\r', "")
}

/// Greedy word wrap at `width` character columns.
///
/// Whitespace runs collapse to single spaces, leading/trailing whitespace is dropped, and words
/// longer than `width` are split across lines. Returns no lines for blank input.
pub fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        // Split words that cannot fit on any line.
        while word.len() > width {
            let room = if current_len == 0 {
                width
            } else {
                width.saturating_sub(current_len + 1)
            };
            if room == 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let head: String = word.drain(..room).collect();
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(&head);
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
