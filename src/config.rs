// src/config.rs
//
// Pipeline-wide configuration: defaults from `constants`, optional
// `REVIEWDL_*` environment overrides.

use std::str::FromStr;

use tracing::debug;

use crate::constants::{
    DEFAULT_MAX_SEQ_LEN, ENV_BATCH_SIZE, ENV_BUCKET_NUM, ENV_BUCKET_RATIO, ENV_MAX_SEQ_LEN,
    ENV_NUM_WORKERS, ENV_SEED,
};
use crate::data_loader::dataset::DatasetError;
use crate::data_loader::options::{BucketOptions, LoaderOptions};
use crate::preprocess::PreprocessOptions;

/// Runtime parameters of one preprocessing + batching run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tokens kept per review.
    pub max_seq_len: usize,
    pub preprocess: PreprocessOptions,
    pub bucket: BucketOptions,
    pub loader: LoaderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            preprocess: PreprocessOptions::default(),
            bucket: BucketOptions::default(),
            loader: LoaderOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `REVIEWDL_*` environment variables.
    ///
    /// Setting `REVIEWDL_SEED` also turns shuffling on.
    pub fn from_env() -> Result<Self, DatasetError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatasetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_MAX_SEQ_LEN)? {
            cfg.max_seq_len = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_NUM_WORKERS)? {
            cfg.preprocess.num_workers = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_BATCH_SIZE)? {
            cfg.bucket.batch_size = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_BUCKET_NUM)? {
            cfg.bucket.num_buckets = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_BUCKET_RATIO)? {
            cfg.bucket.ratio = v;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            cfg.bucket = cfg.bucket.shuffle(true, seed);
        }
        debug!("pipeline config: {cfg:?}");
        Ok(cfg)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, DatasetError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DatasetError::config(format!("{key}={raw:?}: {e}"))),
    }
}
