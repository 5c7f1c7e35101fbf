use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

/// Memoizes responses per logical query key for the lifetime of the process.
///
/// Concurrent callers asking for the same key share a single in-flight fetch
/// and observe the same result. Successful values are kept forever (no
/// eviction, session-scoped); a failed fetch leaves its slot empty so a later
/// identical request retries instead of replaying the error.
pub struct RequestCache<T> {
    entries: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T: Clone> RequestCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        // The map lock is released before awaiting the fetch; only callers
        // for this key wait on the cell.
        cell.get_or_try_init(fetch).await.cloned()
    }
}
