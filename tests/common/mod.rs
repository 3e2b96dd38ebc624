#![allow(dead_code)]

//! Common test infrastructure
//!
//! End-to-end tests run the real provider clients against a local fake
//! HTTP server, and persist to a SQLite database in a temporary directory.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeProviders, TestWorld};
//!
//! #[tokio::test]
//! async fn test_poster_round() {
//!     let providers = FakeProviders::spawn().await;
//!     let world = TestWorld::new();
//!     let fetcher = providers.catalog_fetcher();
//!     // ...
//! }
//! ```

mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::TestWorld;
pub use server::{query_param, FakeProviders};
