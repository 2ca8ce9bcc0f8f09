//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{StubProvider, TestClient, TestServer};
//! use mate_server::providers::Platform;
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_search() {
//!     let server = TestServer::builder()
//!         .provider(StubProvider::new(Platform::Jamendo, vec![]))
//!         .spawn()
//!         .await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.search(Some("lofi"), None, None).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

// Each test binary only uses part of the harness.
#![allow(dead_code)]

mod client;
mod constants;
mod server;
mod stubs;
mod upstream;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::{TestServer, TestServerBuilder};
#[allow(unused_imports)]
pub use stubs::{result, FailingProvider, SlowProvider, StubLlm, StubProvider, StubSpeech};
#[allow(unused_imports)]
pub use upstream::MockUpstream;
