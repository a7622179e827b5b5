//! Prefetch helper for the data loader.
//!
//! Drive a synchronous producer on a blocking task and hand its items over
//! a bounded channel, so collation overlaps with the consumer's work.

use tokio::sync::mpsc::{channel, Receiver};
use crate::DatasetError;

/// Spawn a blocking prefetcher over `producer`.
///
/// The returned `Receiver` yields up to `cap` items ahead of consumption.
/// Production stops after the first error or when the receiver is dropped.
/// Must be called from within a tokio runtime.
pub fn spawn_prefetch<I, T>(cap: usize, producer: I) -> Receiver<Result<T, DatasetError>>
where
    I: Iterator<Item = Result<T, DatasetError>> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = channel(cap.max(1));
    tokio::task::spawn_blocking(move || {
        for item in producer {
            let failed = item.is_err();
            if tx.blocking_send(item).is_err() || failed {
                break;
            }
        }
    });
    rx
}
