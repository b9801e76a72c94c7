//! Tile presentation model.
//!
//! A tile is one game round: the Wikidata item, the candidate PDF, and the
//! buttons the player answers with.

use serde::{Deserialize, Serialize};

/// One game card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Stable tile id, also the key recorded in the decision log.
    pub id: String,

    /// Display sections, item first.
    pub sections: Vec<Section>,

    /// Player controls.
    pub controls: Vec<Control>,
}

impl Tile {
    /// Wikidata item id from the `item` section.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match s {
            Section::Item { q } => Some(q.as_str()),
            Section::Text { .. } => None,
        })
    }

    /// PDF URL shown in the `text` section.
    #[must_use]
    pub fn pdf_url(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match s {
            Section::Text { url, .. } => Some(url.as_str()),
            Section::Item { .. } => None,
        })
    }

    /// Decisions offered by the button controls, in display order.
    #[must_use]
    pub fn decisions(&self) -> Vec<Decision> {
        self.controls
            .iter()
            .flat_map(|c| match c {
                Control::Buttons { entries } => entries.iter().map(|b| b.decision),
            })
            .collect()
    }
}

/// A display section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Section {
    /// Reference to a Wikidata item.
    Item { q: String },

    /// Free text block with a link.
    Text { title: String, url: String, text: String },
}

/// A group of player controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Control {
    Buttons { entries: Vec<Button> },
}

/// A decision button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub style: ButtonStyle,

    pub decision: Decision,

    pub label: String,

    /// Wikibase API call the client performs when this button is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_action: Option<ApiAction>,
}

/// Button colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Green,
    White,
    Blue,
}

/// Player verdict on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Yes,
    Skip,
    No,
}

impl Decision {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Skip => "skip",
            Self::No => "no",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `wbcreateclaim` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAction {
    pub action: String,
    pub entity: String,
    pub property: String,
    pub snaktype: String,
    pub value: String,
}
