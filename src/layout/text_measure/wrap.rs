//! Word wrapping for inline content.
//!
//! Break opportunities are runs of spaces or tabs, like `white-space: normal`
//! without collapsing. Spaces at a soft break hang off the end of the line and
//! are trimmed. A word wider than the line is force-broken at grapheme
//! boundaries. `\n` is a hard break.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, string_width};

#[inline]
fn is_break_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split a line into alternating runs of break spaces and words.
fn segments(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in line.char_indices() {
        let space = is_break_space(c);
        match in_space {
            Some(prev) if prev != space => {
                out.push(&line[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < line.len() {
        out.push(&line[start..]);
    }
    out
}

/// Wrap text into lines no wider than `max_width` cells.
///
/// Returns an empty `Vec` for empty input. A `max_width` of zero is treated
/// as one cell.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_width = max_width.max(1);

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        wrap_line(raw_line, max_width, &mut lines);
    }
    lines
}

fn wrap_line(line: &str, max_width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut width = 0usize;
    let mut wrapped = false;

    for segment in segments(line) {
        let seg_width = string_width(segment);

        if segment.starts_with(is_break_space) {
            // Leading spaces of a soft-wrapped line are dropped.
            if current.is_empty() && wrapped {
                continue;
            }
            current.push_str(segment);
            width += seg_width;
            continue;
        }

        if width + seg_width > max_width && !current.trim_end_matches(is_break_space).is_empty() {
            lines.push(current.trim_end_matches(is_break_space).to_string());
            current.clear();
            width = 0;
            wrapped = true;
        }

        if seg_width > max_width {
            for grapheme in segment.graphemes(true) {
                let gw = grapheme_width(grapheme);
                if width + gw > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                    wrapped = true;
                }
                current.push_str(grapheme);
                width += gw;
            }
            continue;
        }

        current.push_str(segment);
        width += seg_width;
    }

    lines.push(current.trim_end_matches(is_break_space).to_string());
}

/// Number of lines `text` occupies when wrapped to `max_width`.
pub fn line_count(text: &str, max_width: usize) -> usize {
    wrap_words(text, max_width).len()
}

/// Width of the widest hard line, unwrapped.
pub fn max_content_width(text: &str) -> usize {
    text.split('\n')
        .map(|line| string_width(line.trim_end_matches(is_break_space)))
        .max()
        .unwrap_or(0)
}

/// Width of the widest unbreakable word.
pub fn min_content_width(text: &str) -> usize {
    text.split('\n')
        .flat_map(segments)
        .filter(|s| !s.starts_with(is_break_space))
        .map(string_width)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_words("", 10).is_empty());
        assert_eq!(line_count("", 10), 0);
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_words("alpha beta", 10), vec!["alpha beta"]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        assert_eq!(
            wrap_words("alpha beta gamma delta", 10),
            vec!["alpha beta", "gamma", "delta"]
        );
    }

    #[test]
    fn test_wrap_trailing_space_hangs() {
        // "alpha " is 6 wide but the space hangs, so "beta" goes to the next line
        assert_eq!(wrap_words("alpha beta", 5), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_wrap_marker_sticks_to_word() {
        // No break opportunity between a word and a glued ellipsis
        assert_eq!(wrap_words("alpha beta…", 10), vec!["alpha", "beta…"]);
    }

    #[test]
    fn test_wrap_force_breaks_long_word() {
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_hard_newlines() {
        assert_eq!(wrap_words("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_cjk_words() {
        assert_eq!(wrap_words("你好 世界", 4), vec!["你好", "世界"]);
    }

    #[test]
    fn test_wrap_zero_width_treated_as_one() {
        assert_eq!(wrap_words("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn test_line_count_grows_with_prefix() {
        let words = ["one", "two", "three", "four", "five", "six"];
        let mut previous = 0;
        for k in 1..=words.len() {
            let text = format!("{}…", words[..k].join(" "));
            let lines = line_count(&text, 9);
            assert!(lines >= previous, "prefix {k} shrank from {previous} to {lines}");
            previous = lines;
        }
    }

    #[test]
    fn test_content_widths() {
        assert_eq!(max_content_width("alpha beta\ngamma"), 10);
        assert_eq!(min_content_width("alpha beta\ngamma"), 5);
        assert_eq!(min_content_width(""), 0);
    }
}
