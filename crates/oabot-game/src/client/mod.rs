//! Upstream service clients.
//!
//! - [`WikidataClient`]: SPARQL candidate source
//! - [`DisseminClient`]: open-access record resolver
//!
//! Both sit behind async traits so the tile builder can be driven by
//! in-memory sources in tests.

mod dissemin;
mod wikidata;

pub use dissemin::DisseminClient;
pub use wikidata::{WikidataClient, candidates_from_bindings, candidates_query};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{CandidatePaper, OpenAccessResult};

/// Source of articles lacking a full-text link.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetch up to `limit` candidates, unique by id, in source order.
    async fn fetch_candidates(&self, limit: usize) -> ClientResult<Vec<CandidatePaper>>;
}

/// Resolver of open-access PDFs for one candidate.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Look up PDF URLs and records for `candidate`.
    async fn resolve(&self, candidate: &CandidatePaper) -> ClientResult<OpenAccessResult>;
}

/// Build the pooled HTTP client shared by one tile-generation call.
///
/// # Errors
///
/// Returns error if the TLS backend or headers cannot be initialised.
pub fn http_client(config: &Config) -> ClientResult<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    Ok(client)
}

/// Handle upstream response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match status.as_u16() {
        500..=599 => Err(ClientError::server(status.as_u16(), text)),
        _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text }),
    }
}

/// Read a successful response body and decode it as JSON.
async fn read_json<T>(response: reqwest::Response, timeout: Duration) -> ClientResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = handle_response(response).await?;
    let body = response.bytes().await.map_err(|e| ClientError::from_transport(e, timeout))?;
    serde_json::from_slice(&body).map_err(ClientError::from)
}
