//! Core dataset abstractions for reviewdl's batching pipeline.
//!
//! A dataset here is the *already preprocessed* side of the pipeline:
//! immutable `(token ids, label)` samples plus a parallel length index
//! that the bucketing sampler consumes.

use anyhow::{self, Error as AnyError};
use thiserror::Error;

/// Item‑level error type for preprocessing, sampling & loader operations.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A single input could not be tokenized/indexed or carried a bad score.
    #[error("input {index} rejected: {reason}")]
    Input { index: usize, reason: String },

    /// Invalid sampler / loader parameters, raised at construction time.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("index out of range: {0}")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Backend(#[from] AnyError),
}

impl DatasetError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DatasetError::Config(msg.into())
    }

    pub(crate) fn input(index: usize, reason: impl Into<String>) -> Self {
        DatasetError::Input { index, reason: reason.into() }
    }
}

// Mapping from string to error
impl From<String> for DatasetError {
    fn from(s: String) -> Self {
        DatasetError::Backend(AnyError::msg(s))
    }
}

impl From<&str> for DatasetError {
    fn from(s: &str) -> Self {
        DatasetError::Backend(AnyError::msg(s.to_string()))
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Backend(anyhow::Error::new(e))
    }
}

/// One preprocessed review: clipped vocabulary ids plus a binary label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub tokens: Vec<u32>,
    pub label: u8,
}

impl Sample {
    pub fn new(tokens: Vec<u32>, label: u8) -> Self {
        Self { tokens, label }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A random‑access collection of samples.
///
/// Implementors are read-only for the lifetime of a loader; the loader
/// only ever calls [`Dataset::get`] with indices produced by its sampler.
pub trait Dataset: Send + Sync + 'static {
    /// Total number of samples.
    fn len(&self) -> usize;

    /// Retrieve a sample by zero‑based index.
    fn get(&self, index: usize) -> Result<&Sample, DatasetError>;

    /// Convenience helper.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory dataset produced by the preprocessor: samples and their
/// lengths, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct ReviewDataset {
    samples: Vec<Sample>,
    lengths: Vec<f32>,
}

impl ReviewDataset {
    /// Build from samples; the length index is derived from the token counts.
    pub fn new(samples: Vec<Sample>) -> Self {
        let lengths = samples.iter().map(|s| s.len() as f32).collect();
        Self { samples, lengths }
    }

    /// Build from samples and an externally computed length index.
    pub fn from_parts(samples: Vec<Sample>, lengths: Vec<f32>) -> Result<Self, DatasetError> {
        if samples.len() != lengths.len() {
            return Err(DatasetError::config(format!(
                "length index has {} entries but dataset has {} samples",
                lengths.len(),
                samples.len()
            )));
        }
        Ok(Self { samples, lengths })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Per-sample lengths in dataset order, as consumed by the bucketing sampler.
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn into_parts(self) -> (Vec<Sample>, Vec<f32>) {
        (self.samples, self.lengths)
    }
}

impl Dataset for ReviewDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<&Sample, DatasetError> {
        self.samples
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange(index))
    }
}
