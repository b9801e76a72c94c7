//! Tile formatting.

use crate::models::{
    ApiAction, Button, ButtonStyle, CandidatePaper, Control, Decision, OpenAccessResult, Record,
    Section, Tile,
};

/// Wikidata property "full work available at URL".
pub const FULL_WORK_PROPERTY: &str = "P953";

/// Shape a joined candidate into a tile.
///
/// `record` may be empty when no record carried the primary PDF URL; every
/// field then falls back to the resolver-level value or an empty string.
#[must_use]
pub fn format_tile(
    candidate: &CandidatePaper,
    result: &OpenAccessResult,
    record: &Record,
    tile_id: &str,
) -> Tile {
    let pdf_url = record
        .pdf_url
        .as_deref()
        .or_else(|| result.primary_pdf_url())
        .unwrap_or_default()
        .to_string();

    let title = result.title.as_ref().or(record.title.as_ref()).cloned().unwrap_or_default();
    let text = record.r#abstract.clone().unwrap_or_default();

    Tile {
        id: tile_id.to_string(),
        sections: vec![
            Section::Item { q: candidate.id.clone() },
            Section::Text { title, url: pdf_url.clone(), text },
        ],
        controls: vec![Control::Buttons { entries: decision_buttons(&candidate.id, pdf_url) }],
    }
}

fn decision_buttons(entity: &str, pdf_url: String) -> Vec<Button> {
    vec![
        Button {
            style: ButtonStyle::Green,
            decision: Decision::Yes,
            label: "Yes, it's the full version of the article".to_string(),
            api_action: Some(ApiAction {
                action: "wbcreateclaim".to_string(),
                entity: entity.to_string(),
                property: FULL_WORK_PROPERTY.to_string(),
                snaktype: "value".to_string(),
                value: pdf_url,
            }),
        },
        Button {
            style: ButtonStyle::White,
            decision: Decision::Skip,
            label: "Skip".to_string(),
            api_action: None,
        },
        Button {
            style: ButtonStyle::Blue,
            decision: Decision::No,
            label: "No, it's not the same article".to_string(),
            api_action: None,
        },
    ]
}
