//! HTTP upstream client
//!
//! Calls a JSON search endpoint: `GET {base}?term=..&country=..&num=..`
//! answering with an array of result objects.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Item, UpstreamClient};

// == Http Upstream ==
/// [`UpstreamClient`] backed by a remote JSON search endpoint.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Creates a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Returns the endpoint this client queries.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn search(
        &self,
        term: &str,
        country: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<Item>> {
        let num = max_results.to_string();
        debug!(term, country, max_results, "querying upstream");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("term", term), ("country", country), ("num", num.as_str())])
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("upstream answered {}", status));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("upstream returned malformed JSON")?;

        match body {
            serde_json::Value::Array(items) => Ok(items),
            other => Err(anyhow!(
                "expected a JSON array from upstream, got {}",
                json_kind(&other)
            )),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
