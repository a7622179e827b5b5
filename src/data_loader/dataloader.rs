//! `DataLoader`: one restartable, finite pass of padded batches.
//!
//! * Training mode drives a [`FixedBucketSampler`]; evaluation mode a flat
//!   [`SequentialBatchSampler`].
//! * [`DataLoader::iter`] yields `Result<Batch, DatasetError>` synchronously.
//! * [`DataLoader::stream`] yields the same pass as an async stream, with
//!   optional bounded prefetch.

use crate::data_loader::collate::{Batch, Collator};
use crate::data_loader::dataset::{Dataset, DatasetError, ReviewDataset, Sample};
use crate::data_loader::options::{BucketOptions, LoaderOptions};
use crate::data_loader::prefetch::spawn_prefetch;
use crate::data_loader::sampler::{BatchSampler, FixedBucketSampler, SequentialBatchSampler};

use async_stream::try_stream;
use futures_core::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Boxed async stream of batches.
pub type BatchStream = Pin<Box<dyn Stream<Item = Result<Batch, DatasetError>> + Send + 'static>>;

/// High‑level iterator that produces padded batches from a dataset.
pub struct DataLoader<D>
where
    D: Dataset,
{
    dataset: Arc<D>,
    sampler: Box<dyn BatchSampler>,
    collator: Collator,
    opts: LoaderOptions,
    epoch: u64,
}

impl<D> DataLoader<D>
where
    D: Dataset,
{
    /// Create a new loader. The sampler must draw from exactly `0..dataset.len()`.
    pub fn new<S>(dataset: D, sampler: S, opts: LoaderOptions) -> Result<Self, DatasetError>
    where
        S: BatchSampler + 'static,
    {
        if sampler.dataset_len() != dataset.len() {
            return Err(DatasetError::config(format!(
                "sampler covers {} indices but dataset has {} samples",
                sampler.dataset_len(),
                dataset.len()
            )));
        }
        Ok(Self {
            dataset: Arc::new(dataset),
            sampler: Box::new(sampler),
            collator: Collator::new(opts.pad_value),
            opts,
            epoch: 0,
        })
    }

    /// Number of batches in one pass.
    pub fn len(&self) -> usize {
        self.sampler.num_batches()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Epochs started so far (each `iter`/`stream` call starts one).
    pub fn epochs(&self) -> u64 {
        self.epoch
    }

    fn next_epoch(&mut self) -> Vec<Vec<usize>> {
        let batches = self.sampler.epoch_batches();
        self.epoch += 1;
        debug!("epoch {}: {} batches", self.epoch, batches.len());
        batches
    }

    /// Start a pass over the dataset. Calling again reshuffles when the sampler shuffles.
    ///
    /// ```ignore
    /// # use reviewdl::{DataLoader, ReviewDataset, BucketOptions, LoaderOptions};
    /// # fn demo(ds: ReviewDataset) -> anyhow::Result<()> {
    /// let mut loader = DataLoader::bucketed(ds, &BucketOptions::default(), LoaderOptions::default())?;
    /// for batch in loader.iter() {
    ///     let batch = batch?;
    ///     // training step on batch.tokens / batch.valid_length / batch.labels
    /// }
    /// # Ok(()) }
    /// ```
    pub fn iter(&mut self) -> Batches<'_, D> {
        let order = self.next_epoch();
        Batches {
            dataset: self.dataset.as_ref(),
            collator: self.collator,
            order: order.into_iter(),
        }
    }

    /// Return an **async stream** over one pass that yields batches.
    ///
    /// With `LoaderOptions::prefetch > 0` batches are collated on a blocking
    /// task up to `prefetch` ahead of the consumer; this requires a tokio runtime.
    pub fn stream(&mut self) -> BatchStream {
        let order = self.next_epoch();
        let ds = self.dataset.clone();
        let collator = self.collator;

        if self.opts.prefetch > 0 {
            let producer = OwnedBatches { dataset: ds, collator, order: order.into_iter() };
            let rx = spawn_prefetch(self.opts.prefetch, producer);
            return Box::pin(ReceiverStream::new(rx));
        }

        Box::pin(try_stream! {
            for indices in order {
                let batch = collate_indices(ds.as_ref(), collator, &indices)?;
                yield batch;
            }
        })
    }
}

impl DataLoader<ReviewDataset> {
    /// Training-mode loader: length-bucketed, shuffled per `bucket_opts`.
    pub fn bucketed(
        dataset: ReviewDataset,
        bucket_opts: &BucketOptions,
        opts: LoaderOptions,
    ) -> Result<Self, DatasetError> {
        let sampler = FixedBucketSampler::new(dataset.lengths(), bucket_opts)?;
        debug!("{}", sampler.stats());
        Self::new(dataset, sampler, opts)
    }

    /// Evaluation-mode loader: fixed-size batches in dataset order.
    pub fn sequential(
        dataset: ReviewDataset,
        batch_size: usize,
        opts: LoaderOptions,
    ) -> Result<Self, DatasetError> {
        let sampler = SequentialBatchSampler::new(dataset.len(), batch_size)?;
        Self::new(dataset, sampler, opts)
    }
}

fn collate_indices<D: Dataset + ?Sized>(
    dataset: &D,
    collator: Collator,
    indices: &[usize],
) -> Result<Batch, DatasetError> {
    let samples = indices
        .iter()
        .map(|&i| dataset.get(i))
        .collect::<Result<Vec<&Sample>, _>>()?;
    Ok(collator.collate(&samples))
}

/// Borrowing iterator over one pass; see [`DataLoader::iter`].
pub struct Batches<'a, D> {
    dataset: &'a D,
    collator: Collator,
    order: std::vec::IntoIter<Vec<usize>>,
}

impl<D: Dataset> Iterator for Batches<'_, D> {
    type Item = Result<Batch, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.order.next()?;
        Some(collate_indices(self.dataset, self.collator, &indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<D: Dataset> ExactSizeIterator for Batches<'_, D> {}

// Owning twin of `Batches`, movable onto a prefetch task.
struct OwnedBatches<D> {
    dataset: Arc<D>,
    collator: Collator,
    order: std::vec::IntoIter<Vec<usize>>,
}

impl<D: Dataset> Iterator for OwnedBatches<D> {
    type Item = Result<Batch, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.order.next()?;
        Some(collate_indices(self.dataset.as_ref(), self.collator, &indices))
    }
}

impl<D> std::fmt::Debug for DataLoader<D>
where
    D: Dataset,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("samples", &self.dataset.len())
            .field("batches", &self.sampler.num_batches())
            .field("pad_value", &self.collator.pad_value())
            .field("prefetch", &self.opts.prefetch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> ReviewDataset {
        ReviewDataset::new(
            (0..n)
                .map(|i| Sample::new(vec![1; i % 13 + 1], (i % 2) as u8))
                .collect(),
        )
    }

    #[test]
    fn each_pass_covers_every_sample_once() {
        let opts = BucketOptions::default().num_buckets(4).with_batch_size(5).shuffle(true, 1);
        let mut loader = DataLoader::bucketed(dataset(77), &opts, LoaderOptions::default()).unwrap();
        for _ in 0..2 {
            let total: usize = loader.iter().map(|b| b.unwrap().batch_size()).sum();
            assert_eq!(total, 77);
        }
        assert_eq!(loader.epochs(), 2);
    }

    #[test]
    fn iterator_reports_exact_len() {
        let mut loader = DataLoader::sequential(dataset(10), 4, LoaderOptions::default()).unwrap();
        assert_eq!(loader.len(), 3);
        assert_eq!(loader.iter().len(), 3);
    }

    #[test]
    fn mismatched_sampler_is_rejected() {
        let sampler = SequentialBatchSampler::new(5, 2).unwrap();
        let err = DataLoader::new(dataset(4), sampler, LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
    }
}
