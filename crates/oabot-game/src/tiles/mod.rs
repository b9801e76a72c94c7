//! Tile generation.
//!
//! Joins candidate articles with their open-access records and streams the
//! resulting tiles:
//!
//! 1. Fetch up to `limit` candidates
//! 2. Resolve each candidate in source order
//! 3. Skip candidates without a PDF (they do not count toward `limit`)
//! 4. Pick the record carrying the primary PDF URL and format the tile
//! 5. Stop once `limit` tiles have been emitted
//!
//! The stream owns its source and resolver, so the HTTP session lives exactly
//! as long as the stream, whether it is drained or dropped early.

mod format;

pub use format::{FULL_WORK_PROPERTY, format_tile};

use futures::Stream;
use md5::{Digest, Md5};

use crate::client::{CandidateSource, RecordResolver};
use crate::error::ClientResult;
use crate::models::{CandidatePaper, OpenAccessResult, Record, Tile};

/// Stable tile id: the item id followed by the MD5 hex digest of the PDF URL.
#[must_use]
pub fn tile_id(candidate_id: &str, pdf_url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(pdf_url.as_bytes());
    format!("{}{:x}", candidate_id, hasher.finalize())
}

/// A candidate that resolved to a PDF, ready to be formatted.
#[derive(Debug, Clone)]
pub struct TileCandidate {
    pub candidate: CandidatePaper,
    pub result: OpenAccessResult,
    /// Record whose `pdf_url` equals the primary PDF URL, or empty.
    pub record: Record,
    pub tile_id: String,
}

impl TileCandidate {
    /// Join a candidate with its resolution result.
    ///
    /// Returns `None` when the resolver reported no PDF URL.
    #[must_use]
    pub fn join(candidate: CandidatePaper, result: OpenAccessResult) -> Option<Self> {
        let primary = result.primary_pdf_url()?;
        let record = result.matching_record().cloned().unwrap_or_default();

        if record.is_empty() {
            tracing::debug!(
                candidate = %candidate.id,
                pdf_url = primary,
                "No record matches primary PDF"
            );
        }

        let hashed_url = record.pdf_url.as_deref().unwrap_or(primary);
        let tile_id = tile_id(&candidate.id, hashed_url);

        Some(Self { candidate, result, record, tile_id })
    }

    /// Format as a tile.
    #[must_use]
    pub fn to_tile(&self) -> Tile {
        format_tile(&self.candidate, &self.result, &self.record, &self.tile_id)
    }
}

/// Stream at most `limit` tiles.
///
/// A candidate-source failure is yielded as the only item. Resolver failures
/// skip the affected candidate, like a candidate without PDF.
pub fn build_tiles<S, R>(
    source: S,
    resolver: R,
    limit: usize,
) -> impl Stream<Item = ClientResult<Tile>> + Send
where
    S: CandidateSource,
    R: RecordResolver,
{
    async_stream::try_stream! {
        if limit > 0 {
            let candidates = source.fetch_candidates(limit).await?;
            let mut emitted = 0usize;

            for candidate in candidates {
                let result = match resolver.resolve(&candidate).await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::warn!(
                            candidate = %candidate.id,
                            error = %err,
                            "Resolver failed, skipping candidate"
                        );
                        continue;
                    }
                };

                let Some(joined) = TileCandidate::join(candidate, result) else {
                    continue;
                };

                yield joined.to_tile();

                emitted += 1;
                if emitted == limit {
                    break;
                }
            }

            tracing::info!(emitted, limit, "Tile generation finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::{StreamExt, TryStreamExt};

    use super::*;
    use crate::error::ClientError;
    use crate::models::Decision;

    struct FakeSource(Vec<CandidatePaper>);

    #[async_trait]
    impl CandidateSource for FakeSource {
        async fn fetch_candidates(&self, limit: usize) -> ClientResult<Vec<CandidatePaper>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CandidateSource for FailingSource {
        async fn fetch_candidates(&self, _limit: usize) -> ClientResult<Vec<CandidatePaper>> {
            Err(ClientError::server(503, "maintenance"))
        }
    }

    /// Resolves ids listed in `pdfs`; fails for ids in `broken`; no PDF otherwise.
    #[derive(Default)]
    struct FakeResolver {
        pdfs: HashMap<String, OpenAccessResult>,
        broken: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeResolver {
        fn with_pdf(mut self, id: &str, pdf_url: &str, records: Vec<Record>) -> Self {
            self.pdfs.insert(
                id.to_string(),
                OpenAccessResult { pdf_urls: vec![pdf_url.to_string()], records, title: None },
            );
            self
        }
    }

    #[async_trait]
    impl RecordResolver for FakeResolver {
        async fn resolve(&self, candidate: &CandidatePaper) -> ClientResult<OpenAccessResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken.contains(&candidate.id) {
                return Err(ClientError::server(500, "boom"));
            }
            Ok(self.pdfs.get(&candidate.id).cloned().unwrap_or_default())
        }
    }

    fn candidates(ids: &[&str]) -> Vec<CandidatePaper> {
        ids.iter().map(|id| CandidatePaper::new(*id, format!("10.1/{id}"))).collect()
    }

    fn record(pdf_url: &str, title: &str) -> Record {
        Record { pdf_url: Some(pdf_url.into()), title: Some(title.into()), ..Default::default() }
    }

    #[test]
    fn test_tile_id_is_stable() {
        let a = tile_id("Q1", "http://a/p.pdf");
        let b = tile_id("Q1", "http://a/p.pdf");
        assert_eq!(a, b);
        assert!(a.starts_with("Q1"));
        assert_eq!(a.len(), 2 + 32);
        assert_ne!(a, tile_id("Q1", "http://a/other.pdf"));
        // MD5("") is a well-known constant
        assert_eq!(tile_id("Q", ""), "Qd41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn test_end_to_end_single_tile() {
        let source = FakeSource(candidates(&["Q1"]));
        let resolver = FakeResolver::default().with_pdf(
            "Q1",
            "http://a/p.pdf",
            vec![Record { r#abstract: Some("A".into()), ..record("http://a/p.pdf", "T") }],
        );

        let tiles: Vec<Tile> = build_tiles(source, resolver, 5).try_collect().await.unwrap();

        assert_eq!(tiles.len(), 1);
        let tile = &tiles[0];
        assert_eq!(tile.item(), Some("Q1"));
        assert_eq!(tile.pdf_url(), Some("http://a/p.pdf"));
        assert_eq!(tile.id, tile_id("Q1", "http://a/p.pdf"));
        assert_eq!(tile.decisions(), vec![Decision::Yes, Decision::Skip, Decision::No]);
    }

    #[tokio::test]
    async fn test_stops_at_limit() {
        let ids = ["Q1", "Q2", "Q3", "Q4", "Q5"];
        let resolver = ids
            .iter()
            .fold(FakeResolver::default(), |r, id| {
                r.with_pdf(id, &format!("http://a/{id}.pdf"), vec![])
            });
        let calls = Arc::clone(&resolver.calls);

        let tiles: Vec<Tile> =
            build_tiles(FakeSource(candidates(&ids)), resolver, 2).try_collect().await.unwrap();

        assert_eq!(tiles.iter().map(|t| t.item().unwrap()).collect::<Vec<_>>(), vec!["Q1", "Q2"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_skipped_candidates_do_not_count() {
        // The source ignores the limit so more candidates than tiles are available
        struct Unbounded(Vec<CandidatePaper>);

        #[async_trait]
        impl CandidateSource for Unbounded {
            async fn fetch_candidates(&self, _limit: usize) -> ClientResult<Vec<CandidatePaper>> {
                Ok(self.0.clone())
            }
        }

        let resolver = FakeResolver {
            broken: vec!["Q2".to_string()],
            ..FakeResolver::default()
        }
        .with_pdf("Q3", "http://a/3.pdf", vec![])
        .with_pdf("Q4", "http://a/4.pdf", vec![])
        .with_pdf("Q5", "http://a/5.pdf", vec![]);

        let source = Unbounded(candidates(&["Q1", "Q2", "Q3", "Q4", "Q5"]));
        let tiles: Vec<Tile> = build_tiles(source, resolver, 2).try_collect().await.unwrap();

        assert_eq!(tiles.iter().map(|t| t.item().unwrap()).collect::<Vec<_>>(), vec!["Q3", "Q4"]);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_calls() {
        let resolver = FakeResolver::default().with_pdf("Q1", "http://a/1.pdf", vec![]);
        let calls = Arc::clone(&resolver.calls);

        let tiles: Vec<Tile> =
            build_tiles(FailingSource, resolver, 0).try_collect().await.unwrap();

        assert!(tiles.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let stream = build_tiles(FailingSource, FakeResolver::default(), 3);
        let items: Vec<ClientResult<Tile>> = stream.collect().await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ClientError::Server { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_early_drop_stops_resolving() {
        let ids = ["Q1", "Q2", "Q3"];
        let resolver = ids
            .iter()
            .fold(FakeResolver::default(), |r, id| {
                r.with_pdf(id, &format!("http://a/{id}.pdf"), vec![])
            });
        let calls = Arc::clone(&resolver.calls);

        let stream = build_tiles(FakeSource(candidates(&ids)), resolver, 3);
        futures::pin_mut!(stream);
        let first = stream.next().await.unwrap().unwrap();
        drop(stream);

        assert_eq!(first.item(), Some("Q1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_join_selects_matching_record() {
        let result = OpenAccessResult {
            pdf_urls: vec!["http://a/p.pdf".into()],
            records: vec![record("http://x/other.pdf", "Other"), record("http://a/p.pdf", "Match")],
            title: None,
        };

        let joined = TileCandidate::join(CandidatePaper::new("Q1", "10.1/x"), result).unwrap();
        assert_eq!(joined.record.title.as_deref(), Some("Match"));
        assert_eq!(joined.tile_id, tile_id("Q1", "http://a/p.pdf"));
    }

    #[test]
    fn test_join_without_match_degrades_to_empty_record() {
        let result = OpenAccessResult {
            pdf_urls: vec!["http://a/p.pdf".into()],
            records: vec![record("http://x/other.pdf", "Other")],
            title: None,
        };

        let joined = TileCandidate::join(CandidatePaper::new("Q1", "10.1/x"), result).unwrap();
        assert!(joined.record.is_empty());

        let tile = joined.to_tile();
        assert_eq!(tile.pdf_url(), Some("http://a/p.pdf"));
        assert_eq!(tile.id, tile_id("Q1", "http://a/p.pdf"));
    }

    #[test]
    fn test_join_without_pdf() {
        let joined =
            TileCandidate::join(CandidatePaper::new("Q1", "10.1/x"), OpenAccessResult::default());
        assert!(joined.is_none());
    }
}
