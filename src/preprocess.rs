// src/preprocess.rs
//
// Parallel tokenize-and-index pass over a whole dataset.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::data_loader::dataset::{DatasetError, ReviewDataset, Sample};
use crate::tokenizer::{Indexer, Tokenize};

/// Options for the preprocessing pass.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    /// Worker threads. `0` means "auto" (number of CPUs).
    pub num_workers: usize,
}

impl PreprocessOptions {
    /// Set the worker count; `0` means "auto".
    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub(crate) fn effective_workers(&self) -> usize {
        if self.num_workers == 0 { num_cpus::get().max(1) } else { self.num_workers }
    }
}

/// Tokenize and index every `(text, score)` pair on a fixed-size worker pool.
///
/// Output position `i` always corresponds to input position `i`, whatever
/// order the workers finish in. The first failing input aborts the whole
/// pass and no partial dataset is returned.
pub fn preprocess<T, S>(
    indexer: &Indexer<T>,
    inputs: &[(S, i32)],
    opts: &PreprocessOptions,
) -> Result<(Vec<Sample>, Vec<f32>), DatasetError>
where
    T: Tokenize,
    S: AsRef<str> + Sync,
{
    let workers = opts.effective_workers();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("reviewdl-pre-{i}"))
        .build()
        .map_err(|e| DatasetError::Backend(anyhow::anyhow!("failed to create worker pool: {e}")))?;

    debug!("preprocessing {} reviews on {} workers", inputs.len(), workers);
    let started = Instant::now();

    // Indexed parallel collect re-sequences results by input position.
    let samples: Vec<Sample> = pool.install(|| {
        inputs
            .par_iter()
            .enumerate()
            .map(|(i, (text, score))| indexer.sample(i, AsRef::<str>::as_ref(text), *score))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let lengths: Vec<f32> = samples.iter().map(|s| s.len() as f32).collect();
    info!(
        "preprocessed {} reviews in {:.2?} (max clip {})",
        samples.len(),
        started.elapsed(),
        indexer.max_len()
    );
    Ok((samples, lengths))
}

/// Same as [`preprocess`], packaged as a [`ReviewDataset`].
pub fn preprocess_dataset<T, S>(
    indexer: &Indexer<T>,
    inputs: &[(S, i32)],
    opts: &PreprocessOptions,
) -> Result<ReviewDataset, DatasetError>
where
    T: Tokenize,
    S: AsRef<str> + Sync,
{
    let (samples, lengths) = preprocess(indexer, inputs, opts)?;
    ReviewDataset::from_parts(samples, lengths)
}
