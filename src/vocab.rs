// src/vocab.rs
//
// Fixed token -> id mapping used by the indexer.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::data_loader::dataset::DatasetError;

/// Read-only vocabulary with a designated id for unknown tokens.
///
/// The vocabulary is shared immutably across preprocessing workers, so it
/// is `Send + Sync` by construction (plain owned data, no interior mutability).
#[derive(Debug, Clone)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    unknown_id: u32,
}

impl Vocabulary {
    /// Wrap an existing mapping.
    pub fn new(token_to_id: HashMap<String, u32>, unknown_id: u32) -> Self {
        Self { token_to_id, unknown_id }
    }

    /// Build from `(token, id)` pairs.
    pub fn from_pairs<I, S>(pairs: I, unknown_id: u32) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let token_to_id = pairs.into_iter().map(|(t, id)| (t.into(), id)).collect();
        Self { token_to_id, unknown_id }
    }

    /// Parse a vocabulary listing: one token per line, id = zero-based line number.
    ///
    /// `unknown_token` must appear in the listing; its line becomes the unknown id.
    /// Blank lines still consume an id so ids stay aligned with the embedding table.
    pub fn parse(listing: &str, unknown_token: &str) -> Result<Self, DatasetError> {
        let mut token_to_id = HashMap::new();
        for (id, line) in listing.lines().enumerate() {
            let token = line.trim_end_matches('\r');
            if token.is_empty() {
                continue;
            }
            let id = u32::try_from(id)
                .map_err(|_| DatasetError::from("vocabulary exceeds u32 id space"))?;
            token_to_id.entry(token.to_string()).or_insert(id);
        }
        let unknown_id = *token_to_id.get(unknown_token).ok_or_else(|| {
            DatasetError::config(format!("unknown token `{unknown_token}` missing from vocabulary"))
        })?;
        Ok(Self { token_to_id, unknown_id })
    }

    /// Load a vocabulary file (see [`Vocabulary::parse`]).
    pub fn from_file(path: impl AsRef<Path>, unknown_token: &str) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let listing = fs::read_to_string(path)
            .with_context(|| format!("reading vocabulary {}", path.display()))?;
        let vocab = Self::parse(&listing, unknown_token)?;
        debug!("loaded vocabulary of {} tokens from {}", vocab.len(), path.display());
        Ok(vocab)
    }

    /// Id for `token`, falling back to the unknown id.
    pub fn id(&self, token: &str) -> u32 {
        self.token_to_id.get(token).copied().unwrap_or(self.unknown_id)
    }

    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}
