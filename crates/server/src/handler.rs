//! HTTP router for the lookup endpoint.
//!
//! The lookup service is mounted under a single prefix. Everything after the
//! prefix, path and query, is handed to the canonicalizer untouched.

use std::sync::Arc;

use axum::{Router, routing::get};
use urlinfo_core::LookupService;

use crate::url_info::url_info;

/// Shared state for request handlers.
pub struct AppState {
    pub lookup: LookupService,
    pub prefix: String,
}

pub type SharedState = Arc<AppState>;

/// Build the router with the lookup endpoint mounted at `prefix`.
///
/// `prefix` must start and end with `/` (enforced by config validation).
pub fn router(lookup: LookupService, prefix: &str) -> Router {
    let state = Arc::new(AppState { lookup, prefix: prefix.to_string() });

    Router::new()
        .route(prefix, get(url_info))
        .route(&format!("{prefix}*rest"), get(url_info))
        .with_state(state)
}
