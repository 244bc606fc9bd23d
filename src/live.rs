//! Live query primitive for push-on-change reads.
//!
//! A [`LiveQuery`] pairs a re-runnable query closure with a change signal
//! from the owning store. New subscribers replay the current value through
//! [`LiveQuery::snapshot`]; [`LiveQuery::changed`] suspends until the store
//! mutates and then yields a fresh result. Dropping the handle unsubscribes.

use crate::errors::AppResult;
use tokio::sync::watch;

/// A subscribable, re-evaluating view over store data.
///
/// The query closure runs against the live database on every evaluation, so
/// each result reflects the state at that moment. Consumers typically take
/// one `snapshot()` for the initial render and then loop on `changed()`.
pub struct LiveQuery<T> {
    rx: watch::Receiver<u64>,
    query: Box<dyn Fn() -> AppResult<T> + Send + Sync>,
}

impl<T: 'static> LiveQuery<T> {
    pub(crate) fn new(
        rx: watch::Receiver<u64>,
        query: impl Fn() -> AppResult<T> + Send + Sync + 'static,
    ) -> Self {
        LiveQuery {
            rx,
            query: Box::new(query),
        }
    }

    /// Evaluates the query against the current store state.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the underlying query fails.
    pub fn snapshot(&self) -> AppResult<T> {
        (self.query)()
    }

    /// Waits for the next store mutation, then evaluates the query.
    ///
    /// Returns `None` once the owning store has been dropped, which ends the
    /// subscription. Multiple mutations between calls coalesce into a single
    /// wake-up; the evaluated result always reflects the latest state.
    pub async fn changed(&mut self) -> Option<AppResult<T>> {
        self.rx.changed().await.ok()?;
        Some(self.snapshot())
    }

    /// Derives a query whose results are transformed by `f`.
    pub fn map<U, F>(self, f: F) -> LiveQuery<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let query = self.query;
        LiveQuery {
            rx: self.rx,
            query: Box::new(move || query().map(|value| f(value))),
        }
    }

    /// Derives a query whose results are transformed by a fallible `f`.
    pub fn try_map<U, F>(self, f: F) -> LiveQuery<U>
    where
        U: 'static,
        F: Fn(T) -> AppResult<U> + Send + Sync + 'static,
    {
        let query = self.query;
        LiveQuery {
            rx: self.rx,
            query: Box::new(move || query().and_then(|value| f(value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_query(counter: Arc<AtomicU32>) -> impl Fn() -> AppResult<u32> + Send + Sync {
        move || Ok(counter.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_snapshot_replays_current_value() {
        let (_tx, rx) = watch::channel(0u64);
        let counter = Arc::new(AtomicU32::new(7));
        let live = LiveQuery::new(rx, counting_query(counter));

        assert_eq!(live.snapshot().unwrap(), 7);
        assert_eq!(live.snapshot().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_changed_yields_fresh_value_after_mutation() {
        let (tx, rx) = watch::channel(0u64);
        let counter = Arc::new(AtomicU32::new(1));
        let mut live = LiveQuery::new(rx, counting_query(counter.clone()));

        counter.store(2, Ordering::SeqCst);
        tx.send_modify(|v| *v += 1);

        let value = live.changed().await.unwrap().unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn test_changed_ends_when_store_dropped() {
        let (tx, rx) = watch::channel(0u64);
        let counter = Arc::new(AtomicU32::new(0));
        let mut live = LiveQuery::new(rx, counting_query(counter));

        drop(tx);
        assert!(live.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_map_transforms_results() {
        let (tx, rx) = watch::channel(0u64);
        let counter = Arc::new(AtomicU32::new(3));
        let mut live = LiveQuery::new(rx, counting_query(counter.clone())).map(|n| n * 10);

        assert_eq!(live.snapshot().unwrap(), 30);

        counter.store(4, Ordering::SeqCst);
        tx.send_modify(|v| *v += 1);
        assert_eq!(live.changed().await.unwrap().unwrap(), 40);
    }

    #[tokio::test]
    async fn test_try_map_propagates_errors() {
        use crate::errors::{AppError, DatabaseError};

        let (_tx, rx) = watch::channel(0u64);
        let counter = Arc::new(AtomicU32::new(9));
        let live = LiveQuery::new(rx, counting_query(counter)).try_map(|n| {
            if n > 5 {
                Err(AppError::Database(DatabaseError::Custom(
                    "value out of range".to_string(),
                )))
            } else {
                Ok(n)
            }
        });

        assert!(live.snapshot().is_err());
    }
}
