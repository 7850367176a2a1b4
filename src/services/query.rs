//! Query handles: a data/loading/error triple around an async fetcher,
//! with optional fixed-interval polling.
//!
//! A refetch never clears the last successful `data`; it is only replaced
//! when a newer request succeeds. Polling queries retry implicitly on the
//! next tick, single-shot queries never retry.

use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::error::Result;

/// Snapshot of a query as seen by a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> QueryState<T> {
    /// Not loading, no data, no error: the state of a skipped query
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

struct QueryInner<T> {
    name: &'static str,
    fetcher: Option<Fetcher<T>>,
    state: RwLock<QueryState<T>>,
    updates: broadcast::Sender<()>,
}

pub struct Query<T> {
    inner: Arc<QueryInner<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(name: &'static str, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let fetcher: Fetcher<T> = Arc::new(move || Box::pin(fetch()));
        Self::build(name, Some(fetcher))
    }

    /// A query whose input is missing. It never issues a request.
    pub fn skipped(name: &'static str) -> Self {
        Self::build(name, None)
    }

    fn build(name: &'static str, fetcher: Option<Fetcher<T>>) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(QueryInner {
                name,
                fetcher,
                state: RwLock::new(QueryState::idle()),
                updates,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn is_skipped(&self) -> bool {
        self.inner.fetcher.is_none()
    }

    pub fn state(&self) -> QueryState<T> {
        self.inner.state.read().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.read().data.clone()
    }

    /// Notified after every state change
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.inner.updates.subscribe()
    }

    /// Issue the request once and return the resulting snapshot
    pub async fn fetch(&self) -> QueryState<T> {
        let Some(fetcher) = self.inner.fetcher.clone() else {
            return self.state();
        };

        self.update(|state| state.loading = true);

        let result = fetcher().await;

        self.update(|state| {
            state.loading = false;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(e) => {
                    warn!(query = self.inner.name, error = %e, "Query failed");
                    state.error = Some(e.to_string());
                }
            }
        });

        self.state()
    }

    /// Re-issue the query every `period` until the handle is dropped.
    /// The first tick fires immediately.
    pub fn spawn_polling(&self, period: Duration) -> PollHandle {
        let query = self.clone();
        let handle = tokio::spawn(async move {
            if query.is_skipped() {
                return;
            }

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            debug!(query = query.name(), period_ms = period.as_millis() as u64, "Polling started");

            loop {
                ticker.tick().await;
                query.fetch().await;
            }
        });

        PollHandle { handle }
    }

    fn update(&self, apply: impl FnOnce(&mut QueryState<T>)) {
        {
            let mut state = self.inner.state.write();
            apply(&mut state);
        }
        // No subscribers is fine
        let _ = self.inner.updates.send(());
    }
}

/// Owns a polling task and aborts it when dropped
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {
        // Drop aborts
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
