//! Configuration for the OABot game backend.

use std::path::PathBuf;
use std::time::Duration;

/// Upstream endpoint and transport constants.
pub mod api {
    use std::time::Duration;

    /// Wikidata SPARQL query endpoint.
    pub const SPARQL_URL: &str = "https://query.wikidata.org/sparql";

    /// Dissemin open-access resolution endpoint.
    pub const RESOLVER_URL: &str = "http://old.dissem.in/api/query";

    /// URI prefix stripped from SPARQL entity bindings to obtain item ids.
    pub const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

    /// Request timeout for either upstream.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections per host.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Number of tiles served when the client does not ask for a count.
    pub const DEFAULT_TILES: usize = 100;

    /// Decision log file.
    pub const LOG_PATH: &str = "logs.csv";

    /// Wikidata asks query clients to identify themselves.
    pub const USER_AGENT: &str =
        concat!("oabot-game/", env!("CARGO_PKG_VERSION"), " (https://association.dissem.in)");
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SPARQL endpoint used as the candidate source.
    pub sparql_url: String,

    /// Open-access resolution endpoint.
    pub resolver_url: String,

    /// Path of the CSV decision log.
    pub log_path: PathBuf,

    /// User-Agent sent to both upstreams.
    pub user_agent: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Tiles served when `num` is absent.
    pub default_tiles: usize,
}

impl Config {
    /// Create a configuration pointing at the public endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparql_url: api::SPARQL_URL.to_string(),
            resolver_url: api::RESOLVER_URL.to_string(),
            log_path: PathBuf::from(api::LOG_PATH),
            user_agent: api::USER_AGENT.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            default_tiles: api::DEFAULT_TILES,
        }
    }

    /// Create a test configuration with both endpoints on a mock server.
    ///
    /// The SPARQL endpoint is mounted at `/sparql` and the resolver at
    /// `/api/query`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            sparql_url: format!("{}/sparql", base_url),
            resolver_url: format!("{}/api/query", base_url),
            log_path: std::env::temp_dir().join("oabot-test-logs.csv"),
            user_agent: "oabot-game-tests".to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            default_tiles: api::DEFAULT_TILES,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `OABOT_SPARQL_URL`, `OABOT_RESOLVER_URL` and `OABOT_LOG_PATH`,
    /// falling back to the defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns error if an endpoint URL does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("OABOT_SPARQL_URL") {
            config.sparql_url = url;
        }
        if let Ok(url) = std::env::var("OABOT_RESOLVER_URL") {
            config.resolver_url = url;
        }
        if let Ok(path) = std::env::var("OABOT_LOG_PATH") {
            config.log_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style override of the decision log path.
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Check that both endpoints are absolute http(s) URLs.
    ///
    /// # Errors
    ///
    /// Returns error naming the offending endpoint.
    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoints = [("sparql_url", &self.sparql_url), ("resolver_url", &self.resolver_url)];
        for (name, raw) in endpoints {
            let parsed = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("invalid {name} '{raw}': {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("invalid {name} '{raw}': scheme must be http or https");
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
