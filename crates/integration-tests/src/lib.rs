//! Integration tests for Beyond Flavours.
//!
//! # Running Tests
//!
//! These tests drive a running storefront (and, behind it, a running
//! restaurant backend) over HTTP. They are `#[ignore]`d by default so
//! `cargo test` stays self-contained; run them explicitly once the stack
//! is up:
//!
//! ```bash
//! # Terminal 1: the restaurant backend on :3000
//! # Terminal 2: cargo run -p beyond-flavours-storefront
//! cargo test -p beyond-flavours-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` overrides the default `http://localhost:4000`.

use reqwest::Client;

/// Shared context for driving the storefront over HTTP.
pub struct TestContext {
    /// Cookie-keeping client, so the session (cart, login) persists
    /// across requests like a browser.
    pub client: Client,
    /// Base URL of the storefront under test.
    pub storefront_url: String,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed; there is no test
    /// to run without one.
    #[must_use]
    pub fn new() -> Self {
        let storefront_url = std::env::var("STOREFRONT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string());

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url.trim_end_matches('/'))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
