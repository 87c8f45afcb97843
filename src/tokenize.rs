//! Splitting text into the units the search cuts between.

use unicode_segmentation::UnicodeSegmentation;

/// How text is split into tokens, and how tokens are joined back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenizer {
    /// Split on the single space character.
    Spaces,
    /// One token per grapheme cluster.
    Graphemes,
    /// Split on a custom, non-empty delimiter.
    Delimiter(String),
}

impl Tokenizer {
    /// String placed between joined tokens.
    pub fn separator(&self) -> &str {
        match self {
            Self::Spaces => " ",
            Self::Graphemes => "",
            Self::Delimiter(d) => d,
        }
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Spaces => text.split(' ').collect(),
            Self::Graphemes => text.graphemes(true).collect(),
            Self::Delimiter(d) => text.split(d.as_str()).collect(),
        }
    }

    /// Join tokens with the separator. `join(&split(s)) == s` for every `s`.
    pub fn join(&self, tokens: &[&str]) -> String {
        tokens.join(self.separator())
    }

    /// The hidden tail after cutting at `cut`.
    ///
    /// The separator consumed at the cut point is put back in front, so
    /// `join(&tokens[..cut]) + remainder(tokens, cut)` reproduces the original
    /// text. With nothing kept there is no separator to restore.
    pub fn remainder(&self, tokens: &[&str], cut: usize) -> String {
        let tail = self.join(&tokens[cut.min(tokens.len())..]);
        if cut == 0 {
            tail
        } else {
            format!("{}{}", self.separator(), tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spaces_split_and_join() {
        let t = Tokenizer::Spaces;
        let tokens = t.split("alpha beta gamma");
        assert_eq!(tokens, vec!["alpha", "beta", "gamma"]);
        assert_eq!(t.join(&tokens[..2]), "alpha beta");
    }

    #[test]
    fn test_spaces_keep_runs_exact() {
        let t = Tokenizer::Spaces;
        let text = "alpha  beta ";
        let tokens = t.split(text);
        assert_eq!(tokens, vec!["alpha", "", "beta", ""]);
        assert_eq!(t.join(&tokens), text);
    }

    #[test]
    fn test_single_word_is_one_token() {
        assert_eq!(Tokenizer::Spaces.split("alpha").len(), 1);
        assert_eq!(Tokenizer::Spaces.split("").len(), 1);
        assert_eq!(Tokenizer::Delimiter("|".into()).split("item").len(), 1);
    }

    #[test]
    fn test_graphemes_split_clusters() {
        let t = Tokenizer::Graphemes;
        let tokens = t.split("ae\u{0301}🇺🇸");
        assert_eq!(tokens, vec!["a", "e\u{0301}", "🇺🇸"]);
        assert_eq!(t.join(&tokens[..2]), "ae\u{0301}");
        assert!(t.split("").is_empty());
    }

    #[test]
    fn test_delimiter_remainder_keeps_delimiter() {
        let t = Tokenizer::Delimiter("|".into());
        let tokens = t.split("item1|item2|item3");
        assert_eq!(t.join(&tokens[..2]), "item1|item2");
        assert_eq!(t.remainder(&tokens, 2), "|item3");
    }

    #[test]
    fn test_remainder_reassembles_original() {
        let text = "alpha beta gamma delta";
        let t = Tokenizer::Spaces;
        let tokens = t.split(text);
        for cut in 0..tokens.len() {
            let rebuilt = t.join(&tokens[..cut]) + &t.remainder(&tokens, cut);
            assert_eq!(rebuilt, text, "cut at {cut}");
        }
    }
}
