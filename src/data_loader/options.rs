// src/data_loader/options.rs
//!
//! Option structs for the batching layer.
//!
//! Builder helpers are provided so callers can write a fluent style:
//!
//! let opts = BucketOptions::default()
//!     .with_batch_size(16)
//!     .num_buckets(10)
//!     .ratio(0.2)
//!     .shuffle(true, 42);
//!
//! Nothing is validated here; the sampler validates at construction and
//! fails fast with `DatasetError::Config`.

use clap::ValueEnum;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BUCKET_NUM, DEFAULT_BUCKET_RATIO, DEFAULT_EXP_BUCKET_STEP,
    DEFAULT_PAD_VALUE, DEFAULT_SEED,
};

/// How bucket keys are spread over `[min_len, max_len]` when not given explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BucketScheme {
    /// Equal-width buckets.
    #[default]
    ConstWidth,
    /// Bucket widths grow linearly with the bucket id.
    LinearWidth,
    /// Bucket widths grow geometrically by `BucketOptions::exp_step`.
    ExpWidth,
}

/// Parameters of the length-bucketing sampler.
#[derive(Debug, Clone)]
pub struct BucketOptions {
    /// Samples per batch in the bucket with the longest key.
    pub batch_size: usize,
    /// Number of buckets derived from the length range. Ignored when `bucket_keys` is set.
    pub num_buckets: usize,
    /// Batch-size scale-up ratio for shorter buckets. `0.0` keeps every bucket at `batch_size`.
    pub ratio: f32,
    /// Explicit bucket keys (upper length bound of each bucket).
    pub bucket_keys: Option<Vec<f32>>,
    /// Key derivation scheme when `bucket_keys` is `None`.
    pub scheme: BucketScheme,
    /// Width growth factor for `BucketScheme::ExpWidth` (> 1).
    pub exp_step: f32,
    /// If true, shuffle within buckets and shuffle batch order every epoch.
    pub shuffle: bool,
    /// RNG seed used when `shuffle == true`. Ignored otherwise.
    pub seed: u64,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            num_buckets: DEFAULT_BUCKET_NUM,
            ratio: DEFAULT_BUCKET_RATIO,
            bucket_keys: None,
            scheme: BucketScheme::default(),
            exp_step: DEFAULT_EXP_BUCKET_STEP,
            shuffle: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl BucketOptions {
    /// Builder-style helper: change the reference batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn num_buckets(mut self, n: usize) -> Self {
        self.num_buckets = n;
        self
    }

    pub fn ratio(mut self, r: f32) -> Self {
        self.ratio = r;
        self
    }

    /// Use explicit bucket keys instead of deriving them from the lengths.
    pub fn bucket_keys(mut self, keys: Vec<f32>) -> Self {
        self.bucket_keys = Some(keys);
        self
    }

    pub fn scheme(mut self, scheme: BucketScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn exp_step(mut self, step: f32) -> Self {
        self.exp_step = step;
        self
    }

    /// Enable/disable shuffling and set seed.
    ///
    /// When `on` is false, the seed is left unchanged but ignored.
    pub fn shuffle(mut self, on: bool, seed: u64) -> Self {
        self.shuffle = on;
        if on {
            self.seed = seed;
        }
        self
    }
}

/// Parameters of the loader itself (collation and delivery).
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Value written into padded positions.
    pub pad_value: u32,
    /// Size of the bounded prefetch queue used by `DataLoader::stream`. `0` disables prefetching.
    pub prefetch: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { pad_value: DEFAULT_PAD_VALUE, prefetch: 0 }
    }
}

impl LoaderOptions {
    pub fn pad_value(mut self, v: u32) -> Self {
        self.pad_value = v;
        self
    }

    /// Set the number of batches buffered ahead of the consumer.
    ///
    /// `0` disables prefetching.
    pub fn prefetch(mut self, n: usize) -> Self {
        self.prefetch = n;
        self
    }
}
