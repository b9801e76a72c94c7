//! Top-level payloads of the game API.

use serde::{Deserialize, Serialize};

use super::Tile;

/// Text keyed by language code. Only English is provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
}

impl LocalizedText {
    #[must_use]
    pub fn en(text: impl Into<String>) -> Self {
        Self { en: text.into() }
    }
}

/// Game metadata returned by `action=desc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub label: LocalizedText,
    pub description: LocalizedText,
    pub icon: String,
}

impl Default for Description {
    fn default() -> Self {
        Self {
            label: LocalizedText::en("OABot game"),
            description: LocalizedText::en(
                "Game to add open version of scientific articles to Wikidata",
            ),
            icon: "https://association.dissem.in/files/grue_blue_120.png".to_string(),
        }
    }
}

/// Payload returned by `action=tiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesResponse {
    pub tiles: Vec<Tile>,
}
