// src/encoder.rs
//
// The model-facing seam: a pluggable "encode padded batch -> representation"
// capability, plus the masked mean pooling that turns per-step outputs into
// one vector per review.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, s};

use crate::data_loader::collate::Batch;
use crate::data_loader::dataset::DatasetError;

/// Black-box sequence encoder (e.g. a pre-trained embedding + recurrent stack).
///
/// Input is time-major `(time, batch)` token ids plus each column's valid
/// length; output is `(time, batch, feature)`. Positions past a column's valid
/// length may hold anything; consumers must mask them.
pub trait SequenceEncoder: Send + Sync {
    fn encode(
        &self,
        tokens: ArrayView2<'_, u32>,
        valid_length: &[usize],
    ) -> Result<Array3<f32>, DatasetError>;

    /// Convenience: encode a collated batch.
    fn encode_batch(&self, batch: &Batch) -> Result<Array3<f32>, DatasetError> {
        self.encode(batch.tokens.view(), &batch.valid_length)
    }
}

/// Plain embedding-table lookup. Rows of `table` are indexed by token id.
#[derive(Debug, Clone)]
pub struct EmbeddingLookup {
    table: Array2<f32>,
}

impl EmbeddingLookup {
    pub fn new(table: Array2<f32>) -> Self {
        Self { table }
    }

    pub fn dim(&self) -> usize {
        self.table.ncols()
    }
}

impl SequenceEncoder for EmbeddingLookup {
    fn encode(
        &self,
        tokens: ArrayView2<'_, u32>,
        valid_length: &[usize],
    ) -> Result<Array3<f32>, DatasetError> {
        let (steps, batch) = tokens.dim();
        check_lengths(steps, batch, valid_length)?;
        let mut out = Array3::<f32>::zeros((steps, batch, self.dim()));
        for ((t, j), &id) in tokens.indexed_iter() {
            // padded steps stay zero whatever the pad id is
            if t >= valid_length[j] {
                continue;
            }
            let id = id as usize;
            if id >= self.table.nrows() {
                return Err(DatasetError::IndexOutOfRange(id));
            }
            out.slice_mut(s![t, j, ..]).assign(&self.table.row(id));
        }
        Ok(out)
    }
}

/// Masked mean over the time axis: `(time, batch, feature)` -> `(batch, feature)`.
///
/// Only the first `valid_length[j]` steps of column `j` contribute, so padded
/// positions never leak into the result. A zero-length column pools to zeros.
pub fn mean_pool(
    repr: ArrayView3<'_, f32>,
    valid_length: &[usize],
) -> Result<Array2<f32>, DatasetError> {
    let (steps, batch, features) = repr.dim();
    check_lengths(steps, batch, valid_length)?;
    let mut out = Array2::<f32>::zeros((batch, features));
    for (j, &len) in valid_length.iter().enumerate() {
        if len == 0 {
            continue;
        }
        let column = repr.slice(s![..len, j, ..]);
        let sum = column.sum_axis(Axis(0));
        out.row_mut(j).assign(&(sum / len as f32));
    }
    Ok(out)
}

fn check_lengths(steps: usize, batch: usize, valid_length: &[usize]) -> Result<(), DatasetError> {
    if valid_length.len() != batch {
        return Err(DatasetError::config(format!(
            "{} valid lengths for a batch of {batch}",
            valid_length.len()
        )));
    }
    if let Some(&bad) = valid_length.iter().find(|&&l| l > steps) {
        return Err(DatasetError::config(format!(
            "valid length {bad} exceeds padded width {steps}"
        )));
    }
    Ok(())
}
