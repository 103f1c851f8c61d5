//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest with one method per programs endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// Raw HTTP test client; responses are returned unchecked
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

    fn programs_url(&self) -> String {
        format!("{}/api/programs", self.base_url)
    }

    fn program_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/api/programs/{}", self.base_url, id)
    }

    // ========================================================================
    // Programs Endpoints
    // ========================================================================

    pub async fn get_programs(&self) -> Response {
        self.client
            .get(self.programs_url())
            .send()
            .await
            .expect("Get programs request failed")
    }

    pub async fn get_program(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .get(self.program_url(id))
            .send()
            .await
            .expect("Get program request failed")
    }

    pub async fn add_program(&self, body: &Value) -> Response {
        self.client
            .post(self.programs_url())
            .json(body)
            .send()
            .await
            .expect("Add program request failed")
    }

    /// Sends `body` verbatim with a JSON content type
    pub async fn add_program_raw(&self, body: &str) -> Response {
        self.client
            .post(self.programs_url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Add program request failed")
    }

    pub async fn edit_program(&self, id: impl std::fmt::Display, body: &Value) -> Response {
        self.client
            .put(self.program_url(id))
            .json(body)
            .send()
            .await
            .expect("Edit program request failed")
    }

    pub async fn delete_program(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .delete(self.program_url(id))
            .send()
            .await
            .expect("Delete program request failed")
    }

    // ========================================================================
    // Misc
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }
}
