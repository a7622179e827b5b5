//! Pad-and-stack collation of samples into one batch.
//!
//! Layout is time-major: `tokens` has shape `(max_len, batch)`, so column `j`
//! holds sample `j` and rows past `valid_length[j]` are padding. This matches
//! the sequence-first convention of the encoders in [`crate::encoder`].

use ndarray::{Array1, Array2, ArrayView1, s};

use crate::constants::DEFAULT_PAD_VALUE;
use crate::data_loader::dataset::Sample;

/// One padded batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `(max_len, batch)` token ids, padded with the collator's pad value.
    pub tokens: Array2<u32>,
    /// Unpadded length of each column, in batch order.
    pub valid_length: Vec<usize>,
    /// Labels as floats, in batch order.
    pub labels: Array1<f32>,
}

impl Batch {
    pub fn batch_size(&self) -> usize {
        self.valid_length.len()
    }

    /// Padded width (number of time steps).
    pub fn width(&self) -> usize {
        self.tokens.nrows()
    }

    /// `(max_len, batch)` mask: `true` for real tokens, `false` for padding.
    pub fn mask(&self) -> Array2<bool> {
        Array2::from_shape_fn(self.tokens.raw_dim(), |(t, j)| t < self.valid_length[j])
    }

    /// Unpadded token ids of column `j`.
    pub fn sequence(&self, j: usize) -> Vec<u32> {
        self.tokens
            .slice(s![..self.valid_length[j], j])
            .iter()
            .copied()
            .collect()
    }

    /// Number of padded positions in the batch.
    pub fn padding(&self) -> usize {
        self.width() * self.batch_size() - self.valid_length.iter().sum::<usize>()
    }
}

/// Pads samples of differing lengths to the longest one in the batch.
#[derive(Debug, Clone, Copy)]
pub struct Collator {
    pad_value: u32,
}

impl Default for Collator {
    fn default() -> Self {
        Self { pad_value: DEFAULT_PAD_VALUE }
    }
}

impl Collator {
    pub fn new(pad_value: u32) -> Self {
        Self { pad_value }
    }

    pub fn pad_value(&self) -> u32 {
        self.pad_value
    }

    pub fn collate(&self, samples: &[&Sample]) -> Batch {
        let width = samples.iter().map(|s| s.len()).max().unwrap_or(0);
        let mut tokens = Array2::from_elem((width, samples.len()), self.pad_value);
        for (j, sample) in samples.iter().enumerate() {
            tokens
                .slice_mut(s![..sample.len(), j])
                .assign(&ArrayView1::from(sample.tokens.as_slice()));
        }
        Batch {
            tokens,
            valid_length: samples.iter().map(|s| s.len()).collect(),
            labels: samples.iter().map(|s| f32::from(s.label)).collect(),
        }
    }
}
