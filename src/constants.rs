// src/constants.rs
//
// Centralized constants for reviewdl to avoid hardcoded values throughout the codebase

/// Default maximum number of tokens kept per review (longer reviews are clipped from the end)
pub const DEFAULT_MAX_SEQ_LEN: usize = 500;

/// Value written into padded positions of a collated batch
pub const DEFAULT_PAD_VALUE: u32 = 0;

/// Scores strictly above this threshold are labelled positive (1)
pub const POSITIVE_SCORE_THRESHOLD: i32 = 5;

/// Lowest score accepted by the label transform
pub const MIN_SCORE: i32 = 0;

/// Highest score accepted by the label transform
pub const MAX_SCORE: i32 = 10;

// ============================================================================
// Bucketing sampler defaults
// ============================================================================
//
// The ratio controls how much bigger the batches of short buckets become
// relative to the reference batch size:
//
//   bs_k = max(floor(max_key / key_k * ratio * batch_size), batch_size)
//
// ratio = 0 disables scaling entirely (every bucket uses `batch_size`).

/// Default reference batch size (samples per batch in the longest bucket)
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Default number of length buckets
pub const DEFAULT_BUCKET_NUM: usize = 10;

/// Default batch-size scale-up ratio for short buckets
pub const DEFAULT_BUCKET_RATIO: f32 = 0.2;

/// Default growth factor between consecutive bucket widths for `BucketScheme::ExpWidth`
pub const DEFAULT_EXP_BUCKET_STEP: f32 = 1.1;

/// Default RNG seed used when shuffling is enabled and no seed was given
pub const DEFAULT_SEED: u64 = 0;

// ============================================================================
// Environment overrides (read by `PipelineConfig::from_env`)
// ============================================================================

pub const ENV_MAX_SEQ_LEN: &str = "REVIEWDL_MAX_SEQ_LEN";
pub const ENV_BATCH_SIZE: &str = "REVIEWDL_BATCH_SIZE";
pub const ENV_BUCKET_NUM: &str = "REVIEWDL_BUCKET_NUM";
pub const ENV_BUCKET_RATIO: &str = "REVIEWDL_BUCKET_RATIO";
pub const ENV_NUM_WORKERS: &str = "REVIEWDL_NUM_WORKERS";
pub const ENV_SEED: &str = "REVIEWDL_SEED";
