//! Display width of characters, grapheme clusters and strings in cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Display width of a single codepoint.
///
/// - `0` for control characters, combining marks and zero-width characters
/// - `1` for narrow characters
/// - `2` for wide characters (CJK ideographs, fullwidth forms, most emoji)
#[inline]
pub fn char_width(c: char) -> usize {
    match c as u32 {
        // Pictographic ranges that terminals draw two cells wide even where
        // the East Asian Width table says otherwise.
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0),
    }
}

/// Display width of one grapheme cluster.
///
/// Emoji sequences (ZWJ, VS16, skin tones, keycaps) and regional indicator
/// pairs are two cells; a base plus combining marks takes the base width.
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };

    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    let is_emoji_sequence = chars.any(|c| {
        matches!(c as u32, 0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF)
    });
    if is_emoji_sequence {
        return 2;
    }

    char_width(first)
}

/// Display width of a string.
pub fn string_width(s: &str) -> usize {
    if s.is_ascii() {
        return s.bytes().filter(|&b| (0x20..0x7F).contains(&b)).count();
    }
    s.graphemes(true).map(grapheme_width).sum()
}
