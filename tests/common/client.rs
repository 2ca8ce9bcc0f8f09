//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all mate-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// GET /api/search, only sending the parameters that are given.
    pub async fn search(
        &self,
        q: Option<&str>,
        sort_by: Option<&str>,
        platform: Option<&str>,
    ) -> Response {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(q) = q {
            params.push(("q", q));
        }
        if let Some(sort_by) = sort_by {
            params.push(("sortBy", sort_by));
        }
        if let Some(platform) = platform {
            params.push(("platform", platform));
        }

        self.client
            .get(format!("{}/api/search", self.base_url))
            .query(&params)
            .send()
            .await
            .expect("Search request failed")
    }

    // ========================================================================
    // Audio
    // ========================================================================

    /// POST /api/vibe-match with an arbitrary JSON body
    pub async fn vibe_match(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/vibe-match", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Vibe match request failed")
    }

    /// POST /api/recognize with an arbitrary JSON body
    pub async fn recognize(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/recognize", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Recognize request failed")
    }
}
