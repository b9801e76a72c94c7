//! Data models for the upstream services and the game API.
//!
//! Upstream models use `#[serde(default)]` on every optional field; nothing is
//! assumed present in a response until it has been checked.

mod candidate;
mod game;
mod log_entry;
mod open_access;
mod tile;

pub use candidate::{CandidatePaper, SparqlBinding, SparqlResponse, SparqlResults, SparqlValue};
pub use game::{Description, LocalizedText, TilesResponse};
pub use log_entry::LogEntry;
pub use open_access::{OpenAccessResult, Record, ResolverResponse};
pub use tile::{ApiAction, Button, ButtonStyle, Control, Decision, Section, Tile};
