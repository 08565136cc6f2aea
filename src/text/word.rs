//! Configurable word classification.

/// Decides which characters start and continue a word.
///
/// The base class is letters, `_` and `$` to start, plus digits to continue.
/// Paths and dotted names can be admitted with [`allow_slash`](Self::allow_slash)
/// and [`allow_dot`](Self::allow_dot).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordDef {
    allow_slash: bool,
    allow_dot: bool,
}

impl WordDef {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `/` and `\` inside words.
    #[must_use]
    pub fn allow_slash(mut self) -> Self {
        self.allow_slash = true;
        self
    }

    /// Accept `.` inside words.
    #[must_use]
    pub fn allow_dot(mut self) -> Self {
        self.allow_dot = true;
        self
    }

    fn extra(&self, c: char) -> bool {
        (self.allow_slash && matches!(c, '/' | '\\')) || (self.allow_dot && c == '.')
    }

    #[must_use]
    pub fn start_word(&self, c: char) -> bool {
        c.is_alphabetic() || c == '_' || c == '$' || self.extra(c)
    }

    /// `prev` is the character before `c`; unused by the base class.
    #[must_use]
    pub fn continue_word(&self, _prev: char, c: char) -> bool {
        self.backtrack_word(c)
    }

    /// Whether a backwards scan may extend the word over `c`.
    #[must_use]
    pub fn backtrack_word(&self, c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$' || self.extra(c)
    }
}

/// A word found by [`split_words`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordLoc {
    pub word: String,
    /// Byte offset into the source text.
    pub start: usize,
    /// Length in bytes.
    pub size: usize,
    /// Offset in characters.
    pub start_chars: usize,
    /// Length in characters.
    pub size_chars: usize,
}

/// Split `text` into the words recognized by `wd`.
#[must_use]
pub fn split_words(text: &str, wd: WordDef) -> Vec<WordLoc> {
    let mut words = Vec::new();
    // (byte offset, char offset) of the word being scanned
    let mut current: Option<(usize, usize)> = None;
    let mut prev = '\0';
    let mut char_count = 0;

    for (char_idx, (byte_idx, c)) in text.char_indices().enumerate() {
        match current {
            None => {
                if wd.start_word(c) {
                    current = Some((byte_idx, char_idx));
                }
            }
            Some((start, start_chars)) => {
                if !wd.continue_word(prev, c) {
                    words.push(WordLoc {
                        word: text[start..byte_idx].to_string(),
                        start,
                        size: byte_idx - start,
                        start_chars,
                        size_chars: char_idx - start_chars,
                    });
                    current = None;
                }
            }
        }
        prev = c;
        char_count = char_idx + 1;
    }

    if let Some((start, start_chars)) = current {
        words.push(WordLoc {
            word: text[start..].to_string(),
            start,
            size: text.len() - start,
            start_chars,
            size_chars: char_count - start_chars,
        });
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str, wd: WordDef) -> Vec<String> {
        split_words(text, wd).into_iter().map(|w| w.word).collect()
    }

    #[test]
    fn test_split_basic() {
        assert_eq!(
            words("let x1 = $foo_bar + 42;", WordDef::new()),
            vec!["let", "x1", "$foo_bar"]
        );
    }

    #[test]
    fn test_split_word_at_end() {
        let locs = split_words("a bc", WordDef::new());
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[1].start, 2);
        assert_eq!(locs[1].size, 2);
    }

    #[test]
    fn test_split_with_slash_and_dot() {
        let wd = WordDef::new().allow_slash().allow_dot();
        assert_eq!(words("open src/main.rs now", wd), vec!["open", "src/main.rs", "now"]);
        assert_eq!(
            words("open src/main.rs now", WordDef::new()),
            vec!["open", "src", "main", "rs", "now"]
        );
    }

    #[test]
    fn test_split_offsets_multibyte() {
        let locs = split_words("héé wörd", WordDef::new());
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[1].word, "wörd");
        assert_eq!(locs[1].start, 6);
        assert_eq!(locs[1].size, 5);
        assert_eq!(locs[1].start_chars, 4);
        assert_eq!(locs[1].size_chars, 4);
    }

    #[test]
    fn test_digits_do_not_start_words() {
        assert_eq!(words("123abc 9", WordDef::new()), vec!["abc"]);
    }
}
