//! src/data_loader/sampler.rs
//! Samplers for the data loader.
//!
//! Index samplers produce a stream of indices into a map-style dataset:
//!  * `SequentialSampler` – yields 0..end in order.
//!  * `ShuffleSampler`    – yields 0..len in a deterministic shuffled order.
//!
//! Batch samplers produce one epoch worth of index batches at a time:
//!  * `SequentialBatchSampler` – flat fixed-size partition (evaluation).
//!  * `FixedBucketSampler`     – length-bucketed batches with per-bucket
//!    batch sizes (training).

use std::fmt;

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::data_loader::dataset::DatasetError;
use crate::data_loader::options::{BucketOptions, BucketScheme};

/// In-place Fisher–Yates shuffle driven by a ChaCha20 stream.
pub(crate) fn fisher_yates<T>(items: &mut [T], rng: &mut ChaCha20Rng) {
    for i in (1..items.len()).rev() {
        // generate a u32 and reduce to [0..=i]
        let j = (rng.next_u32() as usize) % (i + 1);
        items.swap(i, j);
    }
}

/// Trait for index producers.
pub trait Sampler {
    /// Return the next index to fetch, or `None` when exhausted.
    fn next_index(&mut self) -> Option<usize>;
    /// (Optional) remaining items hint.
    fn remaining(&self) -> Option<usize> { None }
}

/// Yields `0, 1, 2, …, end-1` once.
#[derive(Debug, Clone)]
pub struct SequentialSampler {
    curr: usize,
    end: usize,
}

impl SequentialSampler {
    /// Create a sequential sampler over `[0, end)`.
    pub fn new(end: usize) -> Self {
        Self { curr: 0, end }
    }
}

impl Sampler for SequentialSampler {
    fn next_index(&mut self) -> Option<usize> {
        if self.curr < self.end {
            let i = self.curr;
            self.curr += 1;
            Some(i)
        } else {
            None
        }
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.end.saturating_sub(self.curr))
    }
}

/// Yields all indices `0..len` in a deterministic shuffled order.
#[derive(Debug, Clone)]
pub struct ShuffleSampler {
    indices: Vec<usize>,
    pos: usize,
}

impl ShuffleSampler {
    /// Create a shuffled sampler for `len` items, using `seed`.
    pub fn new(len: usize, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        fisher_yates(&mut indices, &mut rng);
        Self { indices, pos: 0 }
    }
}

impl Sampler for ShuffleSampler {
    fn next_index(&mut self) -> Option<usize> {
        if self.pos < self.indices.len() {
            let i = self.indices[self.pos];
            self.pos += 1;
            Some(i)
        } else {
            None
        }
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.indices.len().saturating_sub(self.pos))
    }
}

/// Producer of index batches, one epoch per call.
pub trait BatchSampler: Send {
    /// Index batches for the next epoch. Every dataset index appears exactly once.
    fn epoch_batches(&mut self) -> Vec<Vec<usize>>;
    /// Number of batches one epoch yields.
    fn num_batches(&self) -> usize;
    /// Size of the index space `0..n` the sampler draws from.
    fn dataset_len(&self) -> usize;
}

/// Fixed-size batches over `0..len`, in order unless shuffling is enabled.
#[derive(Debug, Clone)]
pub struct SequentialBatchSampler {
    len: usize,
    batch_size: usize,
    drop_last: bool,
    shuffle_seed: Option<u64>,
    epoch: u64,
}

impl SequentialBatchSampler {
    pub fn new(len: usize, batch_size: usize) -> Result<Self, DatasetError> {
        if batch_size == 0 {
            return Err(DatasetError::config("batch_size must be > 0"));
        }
        Ok(Self { len, batch_size, drop_last: false, shuffle_seed: None, epoch: 0 })
    }

    /// Builder-style helper: set `drop_last`.
    pub fn drop_last(mut self, yes: bool) -> Self {
        self.drop_last = yes;
        self
    }

    /// Shuffle indices each epoch; epoch `e` uses `seed + e`.
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

impl BatchSampler for SequentialBatchSampler {
    fn epoch_batches(&mut self) -> Vec<Vec<usize>> {
        let mut sampler: Box<dyn Sampler> = match self.shuffle_seed {
            Some(seed) => Box::new(ShuffleSampler::new(self.len, seed.wrapping_add(self.epoch))),
            None => Box::new(SequentialSampler::new(self.len)),
        };
        self.epoch += 1;

        let mut out = Vec::with_capacity(self.num_batches());
        let mut acc = Vec::with_capacity(self.batch_size);
        while let Some(i) = sampler.next_index() {
            acc.push(i);
            if acc.len() == self.batch_size {
                out.push(std::mem::replace(&mut acc, Vec::with_capacity(self.batch_size)));
            }
        }
        if !acc.is_empty() && !self.drop_last {
            out.push(acc);
        }
        out
    }

    fn num_batches(&self) -> usize {
        if self.drop_last {
            self.len / self.batch_size
        } else {
            self.len.div_ceil(self.batch_size)
        }
    }

    fn dataset_len(&self) -> usize {
        self.len
    }
}

/// One length bucket: every member's length is `<= key`, except in the last
/// bucket, which also takes lengths beyond the largest key.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: f32,
    pub sample_ids: Vec<usize>,
    pub batch_size: usize,
}

impl Bucket {
    fn num_batches(&self) -> usize {
        self.sample_ids.len().div_ceil(self.batch_size)
    }
}

/// Length-bucketed batch sampler.
///
/// Buckets are computed once from the lengths at construction; every call to
/// [`BatchSampler::epoch_batches`] reshuffles bucket members and batch order
/// (when enabled) from the sampler's own seeded RNG.
#[derive(Debug, Clone)]
pub struct FixedBucketSampler {
    buckets: Vec<Bucket>,
    num_samples: usize,
    shuffle: bool,
    rng: ChaCha20Rng,
}

impl FixedBucketSampler {
    pub fn new(lengths: &[f32], opts: &BucketOptions) -> Result<Self, DatasetError> {
        validate(opts)?;
        if let Some(i) = lengths.iter().position(|l| !l.is_finite() || *l < 0.0) {
            return Err(DatasetError::config(format!(
                "length {} at index {i} is not a finite non-negative number",
                lengths[i]
            )));
        }

        let keys = match &opts.bucket_keys {
            Some(explicit) => normalize_keys(explicit.clone()),
            None if lengths.is_empty() => Vec::new(),
            None => {
                let (min_len, max_len) = min_max(lengths);
                derive_keys(min_len, max_len, opts.num_buckets, opts.scheme, opts.exp_step)
            }
        };

        // Smallest key >= length; overlong lengths land in the last bucket.
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); keys.len()];
        let mut overflow = 0usize;
        for (i, &len) in lengths.iter().enumerate() {
            let mut b = keys.partition_point(|&k| k < len);
            if b == keys.len() {
                overflow += 1;
                b = keys.len() - 1;
            }
            members[b].push(i);
        }
        if overflow > 0 {
            warn!(
                "{overflow} sequences are longer than the largest bucket key {}; assigned to the last bucket",
                keys.last().copied().unwrap_or_default()
            );
        }

        let kept: Vec<(f32, Vec<usize>)> = keys
            .into_iter()
            .zip(members)
            .filter(|(_, ids)| !ids.is_empty())
            .collect();

        // Scale-up keys are floored at 1 so zero-length buckets don't divide by zero.
        let max_key = kept.iter().map(|(k, _)| k.max(1.0)).fold(1.0f32, f32::max);
        let buckets: Vec<Bucket> = kept
            .into_iter()
            .map(|(key, sample_ids)| {
                // The longest bucket always uses the reference size, whatever the ratio.
                let batch_size = if opts.ratio == 0.0 || key.max(1.0) >= max_key {
                    opts.batch_size
                } else {
                    let scaled = (max_key / key.max(1.0) * opts.ratio * opts.batch_size as f32)
                        .floor() as usize;
                    scaled.max(opts.batch_size)
                };
                Bucket { key, sample_ids, batch_size }
            })
            .collect();

        let sampler = Self {
            buckets,
            num_samples: lengths.len(),
            shuffle: opts.shuffle,
            rng: ChaCha20Rng::seed_from_u64(opts.seed),
        };
        debug!(
            "bucket sampler: {} samples, {} buckets, {} batches/epoch",
            sampler.num_samples,
            sampler.buckets.len(),
            sampler.num_batches()
        );
        Ok(sampler)
    }

    /// Non-empty buckets in increasing key order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Human-readable bucket summary (keys, member counts, batch sizes).
    pub fn stats(&self) -> String {
        self.to_string()
    }
}

impl BatchSampler for FixedBucketSampler {
    fn epoch_batches(&mut self) -> Vec<Vec<usize>> {
        let mut batches = Vec::with_capacity(self.num_batches());
        for bucket in &self.buckets {
            let mut ids = bucket.sample_ids.clone();
            if self.shuffle {
                fisher_yates(&mut ids, &mut self.rng);
            }
            batches.extend(ids.chunks(bucket.batch_size).map(<[usize]>::to_vec));
        }
        if self.shuffle {
            fisher_yates(&mut batches, &mut self.rng);
        }
        batches
    }

    fn num_batches(&self) -> usize {
        self.buckets.iter().map(Bucket::num_batches).sum()
    }

    fn dataset_len(&self) -> usize {
        self.num_samples
    }
}

impl fmt::Display for FixedBucketSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<f32> = self.buckets.iter().map(|b| b.key).collect();
        let counts: Vec<usize> = self.buckets.iter().map(|b| b.sample_ids.len()).collect();
        let sizes: Vec<usize> = self.buckets.iter().map(|b| b.batch_size).collect();
        writeln!(f, "FixedBucketSampler:")?;
        writeln!(
            f,
            "  sample_num={}, batch_num={}",
            self.num_samples,
            self.num_batches()
        )?;
        writeln!(f, "  key={keys:?}")?;
        writeln!(f, "  cnt={counts:?}")?;
        write!(f, "  batch_size={sizes:?}")
    }
}

fn validate(opts: &BucketOptions) -> Result<(), DatasetError> {
    if opts.batch_size == 0 {
        return Err(DatasetError::config("batch_size must be > 0"));
    }
    if !opts.ratio.is_finite() || opts.ratio < 0.0 {
        return Err(DatasetError::config(format!(
            "bucket ratio must be finite and >= 0, got {}",
            opts.ratio
        )));
    }
    match &opts.bucket_keys {
        Some(keys) => {
            if keys.is_empty() {
                return Err(DatasetError::config("explicit bucket keys must not be empty"));
            }
            if keys.iter().any(|k| !k.is_finite()) {
                return Err(DatasetError::config("bucket keys must be finite"));
            }
        }
        None => {
            if opts.num_buckets == 0 {
                return Err(DatasetError::config("num_buckets must be > 0"));
            }
            if opts.scheme == BucketScheme::ExpWidth && !(opts.exp_step > 1.0) {
                return Err(DatasetError::config(format!(
                    "exp bucket step must be > 1, got {}",
                    opts.exp_step
                )));
            }
        }
    }
    Ok(())
}

fn min_max(lengths: &[f32]) -> (f32, f32) {
    lengths
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &l| (lo.min(l), hi.max(l)))
}

/// Sort ascending and drop duplicates so keys are strictly increasing.
fn normalize_keys(mut keys: Vec<f32>) -> Vec<f32> {
    keys.sort_by(f32::total_cmp);
    keys.dedup();
    keys
}

/// Derive `num_buckets` keys over `[min_len, max_len]`; the last key is always `max_len`.
pub(crate) fn derive_keys(
    min_len: f32,
    max_len: f32,
    num_buckets: usize,
    scheme: BucketScheme,
    exp_step: f32,
) -> Vec<f32> {
    let k = num_buckets as f32;
    let keys = match scheme {
        BucketScheme::ExpWidth if max_len > min_len => {
            let alpha = (max_len - min_len) * (exp_step - 1.0) / (exp_step.powi(num_buckets as i32) - 1.0);
            let mut keys: Vec<f32> = (1..=num_buckets)
                .map(|i| (min_len + alpha * (exp_step.powi(i as i32) - 1.0) / (exp_step - 1.0)).round())
                .collect();
            if let Some(last) = keys.last_mut() {
                *last = max_len;
            }
            keys
        }
        BucketScheme::LinearWidth => {
            let alpha = 2.0 * (max_len - min_len) / (k * (k + 1.0));
            let beta = min_len - alpha;
            let mut keys: Vec<f32> = (1..=num_buckets)
                .map(|x| {
                    let x = x as f32;
                    (alpha * x * (x + 1.0) / 2.0 + beta).round()
                })
                .collect();
            if let Some(last) = keys.last_mut() {
                *last = max_len;
            }
            keys
        }
        // ExpWidth over a degenerate range falls back to equal widths.
        BucketScheme::ConstWidth | BucketScheme::ExpWidth => {
            let width = ((max_len - min_len) / k).ceil().max(1.0);
            (0..num_buckets).rev().map(|i| max_len - width * i as f32).collect()
        }
    };
    normalize_keys(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten_sorted(batches: &[Vec<usize>]) -> Vec<usize> {
        let mut all: Vec<usize> = batches.iter().flatten().copied().collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn sequential_yields_all_in_order() {
        let mut s = SequentialSampler::new(5);
        let got: Vec<_> = std::iter::from_fn(|| s.next_index()).collect();
        assert_eq!(got, vec![0,1,2,3,4]);
        assert_eq!(s.remaining(), Some(0));
    }

    #[test]
    fn shuffle_is_deterministic() {
        let mut a = ShuffleSampler::new(10, 42);
        let mut b = ShuffleSampler::new(10, 42);
        let av: Vec<_> = std::iter::from_fn(|| a.next_index()).collect();
        let bv: Vec<_> = std::iter::from_fn(|| b.next_index()).collect();
        assert_eq!(av, bv);           // same seed -> same order
        assert_ne!(av, (0..10).collect::<Vec<_>>()); // not the identity
    }

    #[test]
    fn sequential_batches_keep_partial_tail() {
        let mut s = SequentialBatchSampler::new(10, 4).unwrap();
        assert_eq!(s.num_batches(), 3);
        assert_eq!(
            s.epoch_batches(),
            vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]]
        );
        let mut d = SequentialBatchSampler::new(10, 4).unwrap().drop_last(true);
        assert_eq!(d.num_batches(), 2);
        assert_eq!(d.epoch_batches().len(), 2);
    }

    #[test]
    fn shuffled_flat_batches_change_per_epoch() {
        let mut s = SequentialBatchSampler::new(50, 7).unwrap().shuffled(3);
        let e0 = s.epoch_batches();
        let e1 = s.epoch_batches();
        assert_ne!(e0, e1);
        assert_eq!(flatten_sorted(&e0), (0..50).collect::<Vec<_>>());
        assert_eq!(flatten_sorted(&e1), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn const_width_keys() {
        // width = ceil((100 - 10) / 3) = 30
        let keys = derive_keys(10.0, 100.0, 3, BucketScheme::ConstWidth, 1.1);
        assert_eq!(keys, vec![40.0, 70.0, 100.0]);
    }

    #[test]
    fn const_width_on_flat_range() {
        // zero range: width floors at 1, keys step down from the max
        let keys = derive_keys(5.0, 5.0, 4, BucketScheme::ConstWidth, 1.1);
        assert_eq!(keys, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn linear_and_exp_keys_end_at_max() {
        let lin = derive_keys(10.0, 500.0, 5, BucketScheme::LinearWidth, 1.1);
        let exp = derive_keys(10.0, 500.0, 5, BucketScheme::ExpWidth, 1.5);
        for keys in [&lin, &exp] {
            assert_eq!(keys.len(), 5);
            assert_eq!(*keys.last().unwrap(), 500.0);
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
        // linear widths grow: each gap is larger than the previous one
        let gaps: Vec<f32> = lin.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.windows(2).all(|g| g[0] <= g[1]));
    }

    #[test]
    fn linear_width_keys() {
        // alpha = 2 * 490 / 30, beta = 10 - alpha, key(x) = alpha * x(x+1)/2 + beta
        let keys = derive_keys(10.0, 500.0, 5, BucketScheme::LinearWidth, 1.1);
        assert_eq!(keys, vec![10.0, 75.0, 173.0, 304.0, 500.0]);
    }

    #[test]
    fn exp_width_keys() {
        // alpha = 490 * 0.5 / (1.5^5 - 1), key(i) = 10 + alpha * (1.5^i - 1) / 0.5
        let keys = derive_keys(10.0, 500.0, 5, BucketScheme::ExpWidth, 1.5);
        assert_eq!(keys, vec![47.0, 103.0, 186.0, 312.0, 500.0]);
    }

    #[test]
    fn exp_scheme_on_flat_lengths_falls_back() {
        let opts = BucketOptions::default().scheme(BucketScheme::ExpWidth).num_buckets(3);
        let s = FixedBucketSampler::new(&[4.0; 6], &opts).unwrap();
        assert_eq!(s.buckets().len(), 1);
        assert_eq!(s.buckets()[0].key, 4.0);
    }

    #[test]
    fn assigns_to_smallest_key_at_least_length() {
        let lengths = [1.0, 5.0, 6.0, 10.0, 11.0, 30.0];
        let opts = BucketOptions::default()
            .bucket_keys(vec![10.0, 5.0, 20.0])
            .with_batch_size(2)
            .ratio(0.0);
        let s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let got: Vec<(f32, Vec<usize>)> =
            s.buckets().iter().map(|b| (b.key, b.sample_ids.clone())).collect();
        assert_eq!(
            got,
            vec![(5.0, vec![0, 1]), (10.0, vec![2, 3]), (20.0, vec![4, 5])]
        );
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let lengths = [1.0, 2.0, 90.0];
        let opts = BucketOptions::default().bucket_keys(vec![5.0, 50.0, 100.0]);
        let s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let keys: Vec<f32> = s.buckets().iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![5.0, 100.0]);
    }

    #[test]
    fn shorter_buckets_get_bigger_batches() {
        let lengths: Vec<f32> = (0..200).map(|i| (i % 100 + 1) as f32).collect();
        let opts = BucketOptions::default()
            .bucket_keys(vec![10.0, 50.0, 100.0])
            .with_batch_size(8)
            .ratio(0.5);
        let s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let sizes: Vec<usize> = s.buckets().iter().map(|b| b.batch_size).collect();
        // max(floor(100/key * 0.5 * 8), 8)
        assert_eq!(sizes, vec![40, 8, 8]);
    }

    #[test]
    fn ratio_zero_keeps_reference_batch_size() {
        let lengths: Vec<f32> = (1..=100).map(|i| i as f32).collect();
        let opts = BucketOptions::default().num_buckets(4).with_batch_size(5).ratio(0.0);
        let s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        assert!(s.buckets().iter().all(|b| b.batch_size == 5));
    }

    #[test]
    fn single_bucket_25_samples_gives_16_and_9() {
        let lengths: Vec<f32> = (0..25).map(|i| (i * 20 % 500) as f32).collect();
        let opts = BucketOptions::default().num_buckets(1).with_batch_size(16).ratio(0.7);
        let mut s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        assert_eq!(s.num_batches(), 2);
        let sizes: Vec<usize> = s.epoch_batches().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![16, 9]);
    }

    #[test]
    fn large_ratio_never_grows_the_longest_bucket() {
        let lengths: Vec<f32> = (0..25).map(|i| (i * 20 % 500) as f32).collect();
        let opts = BucketOptions::default().num_buckets(1).with_batch_size(16).ratio(2.0);
        let mut s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        assert_eq!(s.buckets()[0].batch_size, 16);
        let sizes: Vec<usize> = s.epoch_batches().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![16, 9]);

        // shorter buckets still scale: max(floor(100/key * 2 * 4), 4)
        let lengths: Vec<f32> = (1..=100).map(|i| i as f32).collect();
        let opts = BucketOptions::default()
            .bucket_keys(vec![50.0, 100.0])
            .with_batch_size(4)
            .ratio(2.0);
        let s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let sizes: Vec<usize> = s.buckets().iter().map(|b| b.batch_size).collect();
        assert_eq!(sizes, vec![16, 4]);
    }

    #[test]
    fn every_index_exactly_once_and_within_key() {
        let lengths: Vec<f32> = (0..1000).map(|i| ((i * 7919) % 500) as f32).collect();
        let opts = BucketOptions::default()
            .num_buckets(10)
            .with_batch_size(16)
            .ratio(0.2)
            .shuffle(true, 7);
        let mut s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let keys: Vec<f32> = s.buckets().iter().map(|b| b.key).collect();
        for _ in 0..3 {
            let batches = s.epoch_batches();
            assert_eq!(batches.len(), s.num_batches());
            assert_eq!(flatten_sorted(&batches), (0..1000).collect::<Vec<_>>());
            for batch in &batches {
                // all members share one bucket: the smallest key >= every member length
                let widest = batch.iter().map(|&i| lengths[i]).fold(0.0f32, f32::max);
                let key = keys.iter().copied().find(|&k| k >= widest).unwrap();
                assert!(batch.iter().all(|&i| lengths[i] <= key));
                let bucket = s.buckets().iter().find(|b| b.key == key).unwrap();
                assert!(batch.len() <= bucket.batch_size);
            }
        }
    }

    #[test]
    fn reshuffles_across_epochs_but_is_seed_deterministic() {
        let lengths: Vec<f32> = (0..300).map(|i| (i % 60) as f32).collect();
        let opts = BucketOptions::default().num_buckets(5).shuffle(true, 11);
        let mut a = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let mut b = FixedBucketSampler::new(&lengths, &opts).unwrap();
        let a0 = a.epoch_batches();
        let a1 = a.epoch_batches();
        assert_eq!(a0, b.epoch_batches());
        assert_eq!(a1, b.epoch_batches());
        assert_ne!(a0, a1);
        // assignment itself does not move between epochs
        assert_eq!(a.buckets(), b.buckets());
    }

    #[test]
    fn unshuffled_epochs_are_identical() {
        let lengths: Vec<f32> = (0..40).map(|i| (i % 9) as f32).collect();
        let opts = BucketOptions::default().num_buckets(3).with_batch_size(4);
        let mut s = FixedBucketSampler::new(&lengths, &opts).unwrap();
        assert_eq!(s.epoch_batches(), s.epoch_batches());
    }

    #[test]
    fn overlong_lengths_go_to_last_bucket() {
        let opts = BucketOptions::default().bucket_keys(vec![2.0, 4.0]).ratio(0.0);
        let s = FixedBucketSampler::new(&[1.0, 3.0, 9.0], &opts).unwrap();
        assert_eq!(s.buckets()[1].sample_ids, vec![1, 2]);
    }

    #[test]
    fn rejects_bad_configuration() {
        let lengths = [1.0, 2.0];
        let bad = [
            BucketOptions::default().with_batch_size(0),
            BucketOptions::default().num_buckets(0),
            BucketOptions::default().ratio(-0.5),
            BucketOptions::default().ratio(f32::NAN),
            BucketOptions::default().bucket_keys(vec![]),
            BucketOptions::default().scheme(BucketScheme::ExpWidth).exp_step(1.0),
        ];
        for opts in &bad {
            let err = FixedBucketSampler::new(&lengths, opts).unwrap_err();
            assert!(matches!(err, DatasetError::Config(_)), "{opts:?}");
        }
        let err = FixedBucketSampler::new(&[1.0, f32::NAN], &BucketOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
        assert!(SequentialBatchSampler::new(3, 0).is_err());
    }

    #[test]
    fn empty_dataset_yields_no_batches() {
        let mut s = FixedBucketSampler::new(&[], &BucketOptions::default()).unwrap();
        assert_eq!(s.num_batches(), 0);
        assert!(s.epoch_batches().is_empty());
    }

    #[test]
    fn stats_lists_keys_counts_and_sizes() {
        let opts = BucketOptions::default().bucket_keys(vec![2.0, 4.0]).with_batch_size(3).ratio(0.0);
        let s = FixedBucketSampler::new(&[1.0, 2.0, 3.0], &opts).unwrap();
        let stats = s.stats();
        assert!(stats.contains("sample_num=3, batch_num=2"));
        assert!(stats.contains("key=[2.0, 4.0]"));
        assert!(stats.contains("cnt=[2, 1]"));
        assert!(stats.contains("batch_size=[3, 3]"));
    }
}
