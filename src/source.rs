//! Where segment tables come from.
//!
//! A [`TableSource`] yields whatever segment tables it can produce. A single
//! segment that is missing or unreadable is logged and left out; only a
//! source that is unreachable as a whole returns an error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::fetch::{BasicClient, HttpClient, fetch_optional_bytes};
use crate::parser::parse_table;
use crate::records::SegmentTables;
use crate::segment::Segment;

/// Supplies the raw per-segment tables for one data refresh.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_tables(&self) -> Result<SegmentTables>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

fn file_name(segment: Segment) -> String {
    format!("{}.csv", segment.name())
}

/// Reads `<dir>/<segment>.csv` for every known segment.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TableSource for DirectorySource {
    async fn fetch_tables(&self) -> Result<SegmentTables> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            anyhow::bail!("data directory {} does not exist", self.dir.display());
        }
        debug!(dir = %self.dir.display(), "Reading segment tables");

        let mut tables = SegmentTables::new();
        for segment in Segment::ALL {
            let path = self.dir.join(file_name(segment));
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(segment = %segment, "No table for segment");
                    continue;
                }
                Err(e) => {
                    warn!(segment = %segment, path = %path.display(), error = %e, "Segment table unreadable");
                    continue;
                }
            };
            insert_parsed(&mut tables, segment, &bytes);
        }

        Ok(tables)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Fetches `<base_url>/<segment>.csv` for every known segment.
///
/// A 404 or any other error status means that segment is absent. Only a
/// transport failure fails the whole refresh, so a previously loaded
/// snapshot is not replaced when the server is unreachable.
pub struct HttpSource<C> {
    client: C,
    base: Url,
}

impl HttpSource<BasicClient> {
    pub fn from_url(base: &str) -> Result<Self> {
        Self::with_client(BasicClient::new()?, base)
    }
}

impl<C: HttpClient> HttpSource<C> {
    pub fn with_client(client: C, base: &str) -> Result<Self> {
        let mut base = Url::parse(base).with_context(|| format!("invalid data URL '{base}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    pub fn segment_url(&self, segment: Segment) -> Result<Url> {
        Ok(self.base.join(&file_name(segment))?)
    }
}

#[async_trait]
impl<C: HttpClient> TableSource for HttpSource<C> {
    async fn fetch_tables(&self) -> Result<SegmentTables> {
        debug!(base = %self.base, "Fetching segment tables");
        let mut tables = SegmentTables::new();
        for segment in Segment::ALL {
            let url = self.segment_url(segment)?;
            match fetch_optional_bytes(&self.client, &url).await? {
                Some(bytes) => insert_parsed(&mut tables, segment, &bytes),
                None => debug!(segment = %segment, "No table for segment"),
            }
        }
        Ok(tables)
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

fn insert_parsed(tables: &mut SegmentTables, segment: Segment, bytes: &[u8]) {
    match parse_table(bytes) {
        Ok(table) => {
            debug!(segment = %segment, rows = table.rows.len(), "Segment table parsed");
            tables.insert(segment, table);
        }
        Err(e) => warn!(segment = %segment, error = %e, "Segment table parse failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SnapshotCache;
    use reqwest::{Request, Response};
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Arc;

    struct FakeClient {
        bodies: HashMap<String, (u16, &'static str)>,
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn execute(&self, req: Request) -> reqwest::Result<Response> {
            let (status, body) = self
                .bodies
                .get(req.url().as_str())
                .copied()
                .unwrap_or((404, ""));
            let resp = http::Response::builder()
                .status(status)
                .body(body)
                .unwrap();
            Ok(Response::from(resp))
        }
    }

    /// Fails every request before it reaches a server.
    struct OfflineClient;

    #[async_trait]
    impl HttpClient for OfflineClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            // a builder error: no connection is attempted
            reqwest::Client::new().get("not a url").send().await
        }
    }

    #[tokio::test]
    async fn test_directory_source_reads_present_segments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("OOH.csv"), "driver_id,rank\n1,1\n").unwrap();
        fs::write(dir.path().join("HD Brno.csv"), "driver_id,rank\n2,1\n3,2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tables = DirectorySource::new(dir.path()).fetch_tables().await.unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[&Segment::HdBrno].rows.len(), 2);
        assert!(!tables.contains_key(&Segment::HdPraha));
    }

    #[tokio::test]
    async fn test_directory_source_empty_dir_yields_no_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = DirectorySource::new(dir.path()).fetch_tables().await.unwrap();
        assert!(tables.is_empty());
    }

    #[tokio::test]
    async fn test_directory_source_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("nope"));
        assert!(source.fetch_tables().await.is_err());
    }

    #[test]
    fn test_segment_url_encodes_names() {
        let client = FakeClient { bodies: HashMap::new() };
        let source = HttpSource::with_client(client, "https://example.com/exports").unwrap();

        assert_eq!(
            source.segment_url(Segment::HdPraha).unwrap().as_str(),
            "https://example.com/exports/HD%20Praha.csv"
        );
    }

    #[tokio::test]
    async fn test_http_source_skips_missing_segments() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/OOH.csv".to_string(),
            (200, "driver_id,rank\n1,1\n"),
        );
        let source = HttpSource::with_client(FakeClient { bodies }, "https://example.com/").unwrap();

        let tables = source.fetch_tables().await.unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[&Segment::Ooh].rows.len(), 1);
    }

    #[tokio::test]
    async fn test_http_source_server_error_skips_only_that_segment() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/OOH.csv".to_string(),
            (200, "driver_id,rank\n1,1\n2,2\n"),
        );
        bodies.insert("https://example.com/HD%20HK.csv".to_string(), (503, "busy"));
        bodies.insert("https://example.com/HD%20Plzen.csv".to_string(), (500, "boom"));
        let source = HttpSource::with_client(FakeClient { bodies }, "https://example.com/").unwrap();

        let tables = source.fetch_tables().await.unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[&Segment::Ooh].rows.len(), 2);
        assert!(!tables.contains_key(&Segment::HdHk));
    }

    #[tokio::test]
    async fn test_first_load_keeps_segments_served_beside_an_error() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/OOH.csv".to_string(),
            (200, "driver_id,full_name,rank\n1,Jan,1\n"),
        );
        bodies.insert("https://example.com/HD%20HK.csv".to_string(), (503, ""));
        let source = HttpSource::with_client(FakeClient { bodies }, "https://example.com/").unwrap();
        let cache = SnapshotCache::new(Arc::new(source), chrono::Duration::seconds(300));

        let snapshot = cache.get_or_refresh(chrono::Utc::now()).await;

        assert_eq!(snapshot.store.len(), 1);
        assert_eq!(snapshot.store.segments(), vec![Segment::Ooh]);
    }

    #[tokio::test]
    async fn test_http_source_transport_error_fails_refresh() {
        let source = HttpSource::with_client(OfflineClient, "https://example.com/").unwrap();
        assert!(source.fetch_tables().await.is_err());
    }
}
