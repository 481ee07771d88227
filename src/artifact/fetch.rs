//! Remote artifact fetching.
//!
//! A strict HTTP GET: any transport error or non-success status is a
//! `Fetch` error, and a failed fetch aborts the calling orchestration step
//! immediately. Proceeding with a missing or truncated artifact would
//! silently install a broken executable, so there are no retries and no
//! caching; the fetcher keeps no state between calls.

use crate::error::{Result, SetupError};
use anyhow::Context;
use std::time::Duration;

/// Fetches text artifacts from the remote endpoint.
pub struct ArtifactFetcher {
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl ArtifactFetcher {
    /// Create a fetcher with the specified request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { timeout, client })
    }

    /// Fetch an artifact as text.
    pub fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching artifact");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SetupError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        response.text().map_err(|e| SetupError::Fetch {
            url: url.to_string(),
            message: format!("failed to read response body: {e}"),
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> ArtifactFetcher {
        ArtifactFetcher::new(Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn fetch_returns_script_text() {
        let server = MockServer::start();
        let script = "#!/bin/sh\necho hh\n";
        server.mock(|when, then| {
            when.method(GET).path("/hh.sh");
            then.status(200).body(script);
        });

        let content = fetcher().fetch(&server.url("/hh.sh")).unwrap();
        assert_eq!(content, script);
    }

    #[test]
    fn fetch_fails_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.sh");
            then.status(404).body("Not Found");
        });

        let err = fetcher().fetch(&server.url("/missing.sh")).unwrap_err();
        assert!(matches!(err, SetupError::Fetch { .. }));
        assert!(err.to_string().contains("404"), "got: {err}");
    }

    #[test]
    fn fetch_fails_on_500() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/hh.sh");
            then.status(500).body("Internal Server Error");
        });

        let err = fetcher().fetch(&server.url("/hh.sh")).unwrap_err();
        assert!(err.to_string().contains("500"), "got: {err}");
    }

    #[test]
    fn fetch_fails_on_unreachable_endpoint() {
        // Reserved TEST-NET-1 address, nothing listens there. Short timeout
        // keeps the test fast.
        let f = ArtifactFetcher::new(Duration::from_millis(500)).unwrap();
        let err = f.fetch("http://192.0.2.1:9/hh.sh");
        assert!(matches!(err, Err(SetupError::Fetch { .. })));
    }

    #[test]
    fn fetcher_keeps_no_state_between_calls() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/hh.sh");
            then.status(200).body("v1");
        });

        let f = fetcher();
        f.fetch(&server.url("/hh.sh")).unwrap();
        f.fetch(&server.url("/hh.sh")).unwrap();

        // Both calls must hit the server; nothing is cached.
        mock.assert_calls(2);
    }

    #[test]
    fn timeout_is_reported() {
        let f = ArtifactFetcher::new(Duration::from_secs(7)).unwrap();
        assert_eq!(f.timeout(), Duration::from_secs(7));
    }
}
