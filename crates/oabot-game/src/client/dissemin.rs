//! Dissemin open-access resolver.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{RecordResolver, http_client, read_json};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{CandidatePaper, OpenAccessResult, ResolverResponse};

/// Client for the Dissemin `api/query` endpoint.
#[derive(Clone)]
pub struct DisseminClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl DisseminClient {
    /// Create a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self::with_client(http_client(config)?, config))
    }

    /// Create a client on an existing connection pool.
    #[must_use]
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.resolver_url.clone(),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl RecordResolver for DisseminClient {
    async fn resolve(&self, candidate: &CandidatePaper) -> ClientResult<OpenAccessResult> {
        let body = serde_json::to_string(candidate)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))?;

        let resolved: ResolverResponse = read_json(response, self.timeout).await?;
        if resolved.status.as_deref() == Some("error") {
            tracing::debug!(
                candidate = %candidate.id,
                doi = %candidate.doi,
                "Resolver has no paper for DOI"
            );
        }
        let paper = resolved.paper.unwrap_or_default();

        tracing::debug!(
            candidate = %candidate.id,
            pdf_urls = paper.pdf_urls.len(),
            records = paper.records.len(),
            "Resolved candidate"
        );

        Ok(paper)
    }
}

impl std::fmt::Debug for DisseminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisseminClient").field("endpoint", &self.endpoint).finish()
    }
}
