//! Core types and shared functionality for urlinfo.
//!
//! This crate provides:
//! - URL canonicalization into `(hostname, rest)` keys
//! - Verdict store with SQLite backend
//! - Fail-closed lookup service
//! - Synthetic corpus generation and bulk loading
//! - Unified error types
//! - Configuration structures

pub mod canon;
pub mod config;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod store;

pub use canon::{UrlKey, canonicalize};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use loader::{BulkLoader, LoadPlan, LoadReport};
pub use lookup::LookupService;
pub use store::{UrlRecord, VerdictDb, VerdictStore};
