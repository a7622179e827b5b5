// src/data_loader/mod.rs

//! Public API surface for the reviewdl data_loader layer.
/// expose the `dataloader` module (file dataloader.rs)
pub mod dataloader;

/// expose the `dataset` module (file dataset.rs)
pub mod dataset;

/// expose the `options` module (file options.rs)
pub mod options;

pub mod collate;
pub mod prefetch;
pub mod sampler;

// Re‐export the key types at this level:
pub use collate::{Batch, Collator};
pub use dataset::{Dataset, DatasetError, ReviewDataset, Sample};
pub use dataloader::{BatchStream, Batches, DataLoader};
pub use options::{BucketOptions, BucketScheme, LoaderOptions};
pub use sampler::{BatchSampler, Bucket, FixedBucketSampler, SequentialBatchSampler};
