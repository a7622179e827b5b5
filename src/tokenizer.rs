// src/tokenizer.rs
//
// Text -> clipped vocabulary ids, and score -> binary label.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DEFAULT_MAX_SEQ_LEN, MAX_SCORE, MIN_SCORE, POSITIVE_SCORE_THRESHOLD};
use crate::data_loader::dataset::{DatasetError, Sample};
use crate::vocab::Vocabulary;

/// Splits raw text into tokens. The linguistic rules are up to the implementor;
/// the pipeline only needs an ordered token list back.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, DatasetError>;
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Result<Vec<String>, DatasetError> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Result<Vec<String>, DatasetError> {
        self(text)
    }
}

// Word runs (with inner apostrophes, e.g. "didn't") or any single non-space symbol.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+(?:'[\p{L}]+)*|[^\s\p{L}\p{N}_]").unwrap());

// Review dumps carry literal HTML line breaks.
static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Default rule-based tokenizer.
#[derive(Debug, Clone, Default)]
pub struct RegexTokenizer {
    lowercase: bool,
}

impl RegexTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-case every token before it is handed to the vocabulary.
    pub fn lowercase(mut self, on: bool) -> Self {
        self.lowercase = on;
        self
    }
}

impl Tokenize for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, DatasetError> {
        let cleaned = BREAK_RE.replace_all(text, " ");
        Ok(TOKEN_RE
            .find_iter(&cleaned)
            .map(|m| {
                if self.lowercase {
                    m.as_str().to_lowercase()
                } else {
                    m.as_str().to_string()
                }
            })
            .collect())
    }
}

/// Map an IMDB-style integer score in `[0, 10]` to a binary label.
///
/// Callers reusing the pipeline with another score domain must map their
/// scores into this range first; anything outside it is rejected.
pub fn score_to_label(score: i32) -> Option<u8> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return None;
    }
    Some(u8::from(score > POSITIVE_SCORE_THRESHOLD))
}

/// Tokenize, clip and index one review.
#[derive(Debug, Clone)]
pub struct Indexer<T> {
    tokenizer: T,
    vocab: Vocabulary,
    max_len: usize,
}

impl<T: Tokenize> Indexer<T> {
    pub fn new(tokenizer: T, vocab: Vocabulary) -> Self {
        Self { tokenizer, vocab, max_len: DEFAULT_MAX_SEQ_LEN }
    }

    /// Maximum number of tokens kept; extra tokens are dropped from the end.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Text to ids, length at most `max_len`.
    pub fn index(&self, text: &str) -> Result<Vec<u32>, DatasetError> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        tokens.truncate(self.max_len);
        Ok(tokens.iter().map(|t| self.vocab.id(t)).collect())
    }

    /// Build the sample for input position `index` (used only for error reporting).
    pub fn sample(&self, index: usize, text: &str, score: i32) -> Result<Sample, DatasetError> {
        let label = score_to_label(score).ok_or_else(|| {
            DatasetError::input(
                index,
                format!("score {score} outside [{MIN_SCORE}, {MAX_SCORE}]"),
            )
        })?;
        let tokens = self.index(text).map_err(|e| match e {
            DatasetError::Input { .. } => e,
            other => DatasetError::input(index, other.to_string()),
        })?;
        Ok(Sample::new(tokens, label))
    }
}
