//! Tokenizer: turns raw text into a lazy stream of positioned tokens.
//!
//! A token is a maximal run of ASCII alphanumerics; every other character
//! (including anything outside ASCII) acts as a separator. The stream is
//! produced incrementally, so callers can stop early without paying for
//! the rest of the text.

/// Built-in English stop list. Sorted, so membership is a binary search.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Returns true if `term` is in the built-in English stop list.
pub fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.binary_search(&term).is_ok()
}

/// Tokenizer options.
#[derive(Debug, Clone, Copy)]
pub struct TokenizeOptions {
    /// Lowercase each token (default true).
    pub normalize_case: bool,
    /// Drop tokens found in the stop list (default false).
    ///
    /// Filtered tokens still consume a position number, so positions always
    /// refer to the raw token index in the source text.
    pub remove_stop_words: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            normalize_case: true,
            remove_stop_words: false,
        }
    }
}

/// A single token with its position and source offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized term text.
    pub term: String,
    /// 0-based index of this token among all tokens in the source text,
    /// counted before any stop-word filtering.
    pub position: usize,
    /// Character offset of the first character of the run.
    pub start_offset: usize,
    /// Character offset one past the last character of the run.
    pub end_offset: usize,
}

/// Tokenize `text` into a lazy token stream.
///
/// Deterministic for a given `(text, options)` pair; each call yields a
/// fresh sequence.
pub fn tokenize(text: &str, options: TokenizeOptions) -> Tokens<'_> {
    Tokens {
        chars: text.chars().peekable(),
        offset: 0,
        next_position: 0,
        options,
    }
}

/// Lazy iterator over the tokens of one text. See [`tokenize`].
pub struct Tokens<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    /// Character offset of the next unconsumed character.
    offset: usize,
    /// Raw token counter, incremented for filtered tokens too.
    next_position: usize,
    options: TokenizeOptions,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            // Skip separators.
            while let Some(&c) = self.chars.peek() {
                if c.is_ascii_alphanumeric() {
                    break;
                }
                self.chars.next();
                self.offset += 1;
            }
            self.chars.peek()?;

            let start = self.offset;
            let mut term = String::new();
            while let Some(&c) = self.chars.peek() {
                if !c.is_ascii_alphanumeric() {
                    break;
                }
                term.push(if self.options.normalize_case {
                    c.to_ascii_lowercase()
                } else {
                    c
                });
                self.chars.next();
                self.offset += 1;
            }

            let position = self.next_position;
            self.next_position += 1;

            if self.options.remove_stop_words && is_stop_word(&term) {
                continue;
            }

            return Some(Token {
                term,
                position,
                start_offset: start,
                end_offset: self.offset,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str, options: TokenizeOptions) -> Vec<String> {
        tokenize(text, options).map(|t| t.term).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = terms("Hello, World!", TokenizeOptions::default());
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = terms("test123 456test", TokenizeOptions::default());
        assert_eq!(tokens, vec!["test123", "456test"]);
    }

    #[test]
    fn test_tokenize_preserves_case_when_disabled() {
        let options = TokenizeOptions {
            normalize_case: false,
            ..Default::default()
        };
        let tokens = terms("Hello World", options);
        assert_eq!(tokens, vec!["Hello", "World"]);
    }

    #[test]
    fn test_tokenize_non_ascii_is_separator() {
        let tokens = terms("caf\u{e9} na\u{ef}ve \u{4f60}\u{597d}abc", TokenizeOptions::default());
        assert_eq!(tokens, vec!["caf", "na", "ve", "abc"]);
    }

    #[test]
    fn test_tokenize_offsets_are_char_indices() {
        let tokens: Vec<Token> = tokenize("\u{e9}\u{e9} abc", TokenizeOptions::default()).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].start_offset, 3);
        assert_eq!(tokens[0].end_offset, 6);
    }

    #[test]
    fn test_tokenize_empty_and_separator_only() {
        assert!(terms("", TokenizeOptions::default()).is_empty());
        assert!(terms("... --- !!!", TokenizeOptions::default()).is_empty());
    }

    #[test]
    fn test_stop_words_filtered_but_positions_preserved() {
        let options = TokenizeOptions {
            normalize_case: true,
            remove_stop_words: true,
        };
        let tokens: Vec<Token> = tokenize("the quick fox is fast", options).collect();
        let pairs: Vec<(&str, usize)> = tokens
            .iter()
            .map(|t| (t.term.as_str(), t.position))
            .collect();
        // "the" (0) and "is" (3) are dropped but still consume positions.
        assert_eq!(pairs, vec![("quick", 1), ("fox", 2), ("fast", 4)]);
    }

    #[test]
    fn test_stop_word_list_is_sorted() {
        for pair in STOP_WORDS.windows(2) {
            assert!(pair[0] < pair[1], "{:?} out of order", pair);
        }
    }

    #[test]
    fn test_is_stop_word() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("with"));
        assert!(!is_stop_word("fox"));
        // Case-sensitive: callers normalize first.
        assert!(!is_stop_word("The"));
    }

    #[test]
    fn test_tokenize_is_lazy() {
        let mut stream = tokenize("one two three", TokenizeOptions::default());
        assert_eq!(stream.next().unwrap().term, "one");
        assert_eq!(stream.next().unwrap().term, "two");
        // Remaining tokens are simply never produced.
        drop(stream);
    }

    #[test]
    fn test_join_roundtrip_for_plain_text() {
        let text = "Rust Makes Systems Programming Fun";
        let joined = terms(text, TokenizeOptions::default()).join(" ");
        assert_eq!(joined, text.to_lowercase());
    }
}
