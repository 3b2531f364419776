//! # Text Flow Engine
//!
//! Greedy word wrapping against a fixed width with a hard line budget.
//! When the budget overflows, the last kept line is rewritten with a trailing
//! ellipsis so the truncation is visible to the reader. Nothing smarter is
//! wanted here — the bounded max-lines policy is part of the output contract.

/// Wrap `text` into at most `max_lines` lines no wider than `max_width`
/// according to `measure`. Empty or whitespace-only input yields an empty
/// sequence. A word wider than `max_width` gets a line of its own rather
/// than being split mid-word.
pub fn wrap_text<F>(text: &str, measure: F, max_width: f64, max_lines: usize) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let tentative = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&tentative) <= max_width {
            current = tentative;
        } else {
            if !current.is_empty() {
                lines.push(current);
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept = last.trim_end_matches('.').to_string();
            *last = format!("{}\u{2026}", kept);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // Crude fixed-advance measurer: 5 units per character.
    fn measure(s: &str) -> f64 {
        s.chars().count() as f64 * 5.0
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(wrap_text("", measure, 100.0, 3).is_empty());
        assert!(wrap_text("   \t ", measure, 100.0, 3).is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_text("hello world", measure, 100.0, 3);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn test_greedy_break_on_overflow() {
        // 50 units fits 10 chars; "aaaa bbbb" is 9 chars, adding " cccc"
        // overflows.
        let lines = wrap_text("aaaa bbbb cccc", measure, 50.0, 5);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_truncation_appends_ellipsis() {
        let lines = wrap_text(
            "a very long sentence that will certainly not fit in two lines",
            measure,
            50.0,
            2,
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('\u{2026}'), "got {:?}", lines[1]);
    }

    #[test]
    fn test_truncation_strips_trailing_periods() {
        let lines = wrap_text("one two three. four", measure, 45.0, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "three\u{2026}");
    }

    #[test]
    fn test_oversized_word_gets_own_line() {
        let lines = wrap_text("tiny incomprehensibilities tiny", measure, 30.0, 5);
        assert_eq!(lines, vec!["tiny", "incomprehensibilities", "tiny"]);
    }

    #[test]
    fn test_exact_fit_not_broken() {
        // "ab cd" measures exactly 25.
        let lines = wrap_text("ab cd", measure, 25.0, 3);
        assert_eq!(lines, vec!["ab cd"]);
    }
}
