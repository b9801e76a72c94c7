//! OABot game backend
//!
//! Serves game tiles asking players whether an open-access PDF found by
//! Dissemin is the full text of a Wikidata scholarly article, and records
//! their answers.
//!
//! # Pipeline
//!
//! - **Candidate source**: Wikidata SPARQL, articles with a DOI and no full work URL
//! - **Record resolver**: Dissemin, PDF URLs and catalog records per DOI
//! - **Tile builder**: lazy stream joining both, bounded by the requested count
//! - **Decision log**: append-only CSV of player verdicts
//!
//! # Example
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use oabot_game::client::{DisseminClient, WikidataClient};
//! use oabot_game::{Config, tiles::build_tiles};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let source = WikidataClient::new(&config)?;
//!     let resolver = DisseminClient::new(&config)?;
//!
//!     let tiles: Vec<_> = build_tiles(source, resolver, 10).try_collect().await?;
//!     println!("{}", serde_json::to_string_pretty(&tiles)?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod server;
pub mod tiles;

pub use config::Config;
pub use error::{ApiError, ClientError, StoreError};
pub use log::DecisionLog;
pub use server::GameServer;
