//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, DUNE_ID};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_get_program() {
//!     let server = TestServer::spawn_seeded().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_program(DUNE_ID).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{dune_json, program_json};
pub use server::TestServer;
