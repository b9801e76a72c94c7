//! Property-based tests for tile generation and the decision log.

use async_trait::async_trait;
use futures::TryStreamExt;
use proptest::prelude::*;

use oabot_game::client::{CandidateSource, RecordResolver};
use oabot_game::error::ClientResult;
use oabot_game::log::DecisionLog;
use oabot_game::models::{CandidatePaper, LogEntry, OpenAccessResult, Record, Tile};
use oabot_game::tiles::{build_tiles, tile_id};

/// Candidate `Qn` resolves to a PDF iff `pdfs[n]`.
#[derive(Clone)]
struct Scripted {
    pdfs: Vec<bool>,
}

#[async_trait]
impl CandidateSource for Scripted {
    async fn fetch_candidates(&self, limit: usize) -> ClientResult<Vec<CandidatePaper>> {
        Ok((0..self.pdfs.len())
            .take(limit)
            .map(|i| CandidatePaper::new(format!("Q{i}"), format!("10.1/{i}")))
            .collect())
    }
}

#[async_trait]
impl RecordResolver for Scripted {
    async fn resolve(&self, candidate: &CandidatePaper) -> ClientResult<OpenAccessResult> {
        let index: usize = candidate.id[1..].parse().unwrap();
        if !self.pdfs[index] {
            return Ok(OpenAccessResult::default());
        }
        let url = format!("http://a/{index}.pdf");
        Ok(OpenAccessResult {
            pdf_urls: vec![url.clone()],
            records: vec![Record { pdf_url: Some(url), ..Default::default() }],
            title: None,
        })
    }
}

fn run(pdfs: Vec<bool>, limit: usize) -> Vec<Tile> {
    let scripted = Scripted { pdfs };
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(build_tiles(scripted.clone(), scripted, limit).try_collect()).unwrap()
}

proptest! {
    #[test]
    fn tiles_never_exceed_limit(
        pdfs in prop::collection::vec(any::<bool>(), 0..30),
        limit in 0usize..40,
    ) {
        let tiles = run(pdfs.clone(), limit);
        prop_assert!(tiles.len() <= limit);

        let expected: Vec<String> = pdfs
            .iter()
            .take(limit)
            .enumerate()
            .filter(|(_, has_pdf)| **has_pdf)
            .map(|(i, _)| format!("Q{i}"))
            .collect();
        let items: Vec<String> = tiles.iter().map(|t| t.item().unwrap().to_string()).collect();
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn tile_id_is_deterministic(
        id in "Q[0-9]{1,9}",
        url in "https?://[a-z.]{1,20}/[a-zA-Z0-9/._-]{0,30}",
    ) {
        prop_assert_eq!(tile_id(&id, &url), tile_id(&id, &url));
        prop_assert!(tile_id(&id, &url).starts_with(&id));
    }

    #[test]
    fn log_round_trips_arbitrary_fields(
        rows in prop::collection::vec(
            ("[a-zA-Z0-9 ,\"\n]{0,12}", "[a-zA-Z0-9 ,\"\r\n]{0,12}", "(yes|no|skip)"),
            1..8,
        )
    ) {
        let dir = tempfile::TempDir::new().unwrap();
        let log = DecisionLog::new(dir.path().join("logs.csv"));
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

        let entries: Vec<LogEntry> = rows
            .iter()
            .map(|(u, t, d)| LogEntry::new(u.as_str(), t.as_str(), d.as_str()))
            .collect();
        let read = runtime.block_on(async {
            for entry in &entries {
                log.append_entry(entry).await.unwrap();
            }
            log.read_all().await.unwrap()
        });

        prop_assert_eq!(read, entries);
    }
}
