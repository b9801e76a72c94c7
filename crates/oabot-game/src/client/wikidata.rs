//! Wikidata SPARQL candidate source.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{CandidateSource, http_client, read_json};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{CandidatePaper, SparqlBinding, SparqlResponse};

/// Scholarly articles (Q13442814) with a DOI (P356) and no full work URL (P953).
#[must_use]
pub fn candidates_query(limit: usize) -> String {
    format!(
        "SELECT DISTINCT ?paper ?doi WHERE {{
    ?paper wdt:P31 wd:Q13442814 ;
    wdt:P356 ?doi .
    FILTER NOT EXISTS {{
    ?paper wdt:P953 ?foo .
    }}
    }} LIMIT {limit}"
    )
}

/// Turn SPARQL bindings into candidates.
///
/// Bindings missing `paper` or `doi` are dropped. Ids are unique; when an id
/// repeats, its first DOI is kept. Source order is preserved.
#[must_use]
pub fn candidates_from_bindings(bindings: Vec<SparqlBinding>) -> Vec<CandidatePaper> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(bindings.len());

    for mut binding in bindings {
        let (Some(paper), Some(doi)) = (binding.remove("paper"), binding.remove("doi")) else {
            tracing::debug!("Skipping incomplete SPARQL binding");
            continue;
        };

        let id = paper.value.strip_prefix(api::ENTITY_PREFIX).unwrap_or(&paper.value).to_string();
        if seen.insert(id.clone()) {
            candidates.push(CandidatePaper { id, doi: doi.value });
        }
    }

    candidates
}

/// Client for the Wikidata query service.
#[derive(Clone)]
pub struct WikidataClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl WikidataClient {
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
            endpoint: config.sparql_url.clone(),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl CandidateSource for WikidataClient {
    async fn fetch_candidates(&self, limit: usize) -> ClientResult<Vec<CandidatePaper>> {
        let query = candidates_query(limit);
        let url = Url::parse_with_params(
            &self.endpoint,
            [("query", query.as_str()), ("format", "json")],
        )?;

        tracing::debug!(limit, "Querying candidate articles");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))?;

        let results: SparqlResponse = read_json(response, self.timeout).await?;
        let candidates = candidates_from_bindings(results.results.bindings);

        tracing::info!(count = candidates.len(), limit, "Fetched candidate articles");
        Ok(candidates)
    }
}

impl std::fmt::Debug for WikidataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikidataClient").field("endpoint", &self.endpoint).finish()
    }
}
