//! Fail-closed URL safety lookup.
//!
//! A verdict is only reported safe when the store returns a row for the exact
//! canonical key and that row says so. Missing rows, store errors and
//! malformed rows all read as unsafe.

use std::sync::Arc;

use crate::canon::{UrlKey, canonicalize};
use crate::store::VerdictStore;

/// Answers safety queries against a verdict store.
#[derive(Clone)]
pub struct LookupService {
    store: Arc<dyn VerdictStore>,
}

impl LookupService {
    pub fn new(store: Arc<dyn VerdictStore>) -> Self {
        Self { store }
    }

    /// Single point read for `key`. Every failure resolves to `false`.
    pub async fn is_safe(&self, key: &UrlKey) -> bool {
        match self.store.get(key).await {
            Ok(Some(record)) => record.safe,
            Ok(None) => {
                tracing::debug!(hostname = %key.hostname, rest = %key.rest, "no verdict recorded");
                false
            }
            Err(e) => {
                tracing::warn!(hostname = %key.hostname, rest = %key.rest, error = %e, "verdict lookup failed");
                false
            }
        }
    }

    /// Canonicalize a raw URL tail and look it up.
    pub async fn check(&self, raw: &str) -> bool {
        self.is_safe(&canonicalize(raw)).await
    }
}
