// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Crate root: public re-exports for the review batching pipeline.

// ===== Internal Modules (Implementation) =====
// These are public for internal use but may change without notice

pub mod constants;
pub mod config;
pub mod vocab;
pub mod tokenizer;
pub mod preprocess;
pub mod encoder;
pub mod data_loader;

// ===== Re-exports at the crate root =====
// Types:
pub use crate::data_loader::collate::{Batch, Collator};
pub use crate::data_loader::dataloader::{BatchStream, DataLoader};
pub use crate::data_loader::dataset::{Dataset, DatasetError, ReviewDataset, Sample};
pub use crate::data_loader::options::{BucketOptions, BucketScheme, LoaderOptions};
pub use crate::data_loader::sampler::{
    BatchSampler, Bucket, FixedBucketSampler, SequentialBatchSampler,
};
// Module alias so callers can use `reviewdl::dataset::ReviewDataset`:
pub use crate::data_loader::dataset;

pub use config::PipelineConfig;
pub use encoder::{mean_pool, EmbeddingLookup, SequenceEncoder};
pub use preprocess::{preprocess, preprocess_dataset, PreprocessOptions};
pub use tokenizer::{score_to_label, Indexer, RegexTokenizer, Tokenize};
pub use vocab::Vocabulary;
