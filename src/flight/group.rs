//! Flight Group Module
//!
//! Per-key single-flight execution: concurrent callers asking for the same key
//! share one fetch and its outcome.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};

/// How long a finished call stays joinable before it is removed.
///
/// Callers arriving inside this window reuse the finished outcome; later callers
/// start a fresh fetch. Tunable through [`FlightGroup::with_grace`].
pub const DEFAULT_GRACE: Duration = Duration::from_millis(10);

type Outcome<T> = Option<Result<T>>;
type Call<T> = Arc<watch::Sender<Outcome<T>>>;
type CallTable<T> = Arc<Mutex<HashMap<String, Call<T>>>>;

// == Flight Group ==
/// Guarantees at most one in-flight fetch per key.
///
/// The table lock is held only to look up or install a call; fetches for
/// different keys run fully in parallel.
pub struct FlightGroup<T> {
    calls: CallTable<T>,
    grace: Duration,
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self::with_grace(DEFAULT_GRACE)
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
            grace,
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    // == Run ==
    /// Runs `fetch` for `key` unless a call for `key` is already pending, in which
    /// case waits for that call and returns a clone of its outcome.
    ///
    /// The fetch runs on its own task, so it completes and reaches every waiter
    /// even if the caller that started it is dropped.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (rx, leader) = {
            let mut calls = lock(&self.calls);
            match calls.get(key) {
                Some(call) => (call.subscribe(), false),
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), Arc::new(tx));
                    (rx, true)
                }
            }
        };

        if leader {
            let mut guard = LeaderGuard {
                calls: self.calls.clone(),
                key: key.to_string(),
                completed: false,
            };
            let grace = self.grace;
            let fetch = fetch();
            tokio::spawn(async move {
                let outcome = fetch.await;
                guard.complete(outcome, grace);
            });
        } else {
            debug!(key, "joining in-flight fetch");
        }

        wait(key, rx).await
    }

    /// Number of calls currently pending or inside their grace window.
    pub fn pending(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl<T> Default for FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn wait<T: Clone>(key: &str, mut rx: watch::Receiver<Outcome<T>>) -> Result<T> {
    match rx.wait_for(Option::is_some).await {
        Ok(outcome) => match &*outcome {
            Some(result) => result.clone(),
            None => Err(abandoned(key)),
        },
        Err(_) => Err(abandoned(key)),
    }
}

fn abandoned(key: &str) -> CacheError {
    CacheError::Internal(format!("in-flight fetch for '{}' did not complete", key))
}

fn lock<T>(calls: &Mutex<HashMap<String, Call<T>>>) -> MutexGuard<'_, HashMap<String, Call<T>>> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Leader Guard ==
/// Owned by the task executing the fetch. Publishes the outcome and retires the
/// call; if the task dies mid-fetch (panic or runtime shutdown) the call is
/// removed at once, which closes the channel and releases every waiter with an
/// error.
struct LeaderGuard<T> {
    calls: CallTable<T>,
    key: String,
    completed: bool,
}

impl<T> LeaderGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn complete(&mut self, outcome: Result<T>, grace: Duration) {
        self.completed = true;

        let call = lock(&self.calls).get(&self.key).cloned();
        let Some(call) = call else {
            return;
        };
        call.send_replace(Some(outcome));

        if grace.is_zero() {
            retire(&self.calls, &self.key, &call);
            return;
        }

        let calls = self.calls.clone();
        let key = self.key.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            retire(&calls, &key, &call);
        });
    }
}

impl<T> Drop for LeaderGuard<T> {
    fn drop(&mut self) {
        if !self.completed {
            warn!(key = %self.key, "in-flight fetch died before completion");
            lock(&self.calls).remove(&self.key);
        }
    }
}

/// Removes `call` from the table if it is still the registered call for `key`.
fn retire<T>(calls: &Mutex<HashMap<String, Call<T>>>, key: &str, call: &Call<T>) {
    let mut calls = lock(calls);
    if calls.get(key).is_some_and(|current| Arc::ptr_eq(current, call)) {
        calls.remove(key);
    }
}
