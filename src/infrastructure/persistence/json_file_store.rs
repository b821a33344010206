//! JSON state-file link store.
//!
//! The file is a single JSON object. Keys are fully-qualified short links
//! (`scheme://host/<short_id>`); values come in three shapes, all accepted
//! on load:
//!
//! ```text
//! "https://example.com/long"                                   bare URL
//! ["https://example.com/long", "19/10/2026", "14:03:22"]       URL, local date, local time
//! ["https://example.com/long", "2026-10-19T12:03:22.123Z"]     URL, RFC 3339 UTC (canonical)
//! ```
//!
//! Every write emits the canonical shape, so older files are normalized on
//! the first create after an upgrade.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::fs;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::entities::LinkEntry;
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkStore;

/// Date layouts produced by browser locale formatting, tried in order.
const LEGACY_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%Y-%m-%d"];
const LEGACY_TIME_FORMATS: &[&str] = &["%H:%M:%S", "%I:%M:%S %p", "%H:%M"];

/// One stored value, in any of the supported shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Bare(String),
    Legacy(String, String, String),
    Stamped(String, String),
}

/// Link store persisting the whole entry set to one JSON file.
///
/// Writes are atomic: the document is written to a sibling temporary file,
/// flushed to disk, then renamed over the target.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    public_base_url: String,
    write_seq: AtomicU64,
}

impl JsonFileStore {
    /// Creates a store for `path`, writing keys under `public_base_url`.
    pub fn new(path: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            write_seq: AtomicU64::new(0),
        }
    }

    fn link_key(&self, short_id: &str) -> String {
        format!("{}/{}", self.public_base_url, short_id)
    }

    /// Sibling path with the given suffix appended to the file name.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "links.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Unique per write, so a write abandoned after a timeout never shares
    /// its temporary file with the next one.
    fn temp_path(&self) -> PathBuf {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        self.sibling(&format!(".tmp-{}-{}", std::process::id(), seq))
    }

    /// Moves an unreadable state file aside so the next save cannot destroy it.
    async fn quarantine(&self) -> Option<PathBuf> {
        let target = self.sibling(&format!(".corrupt-{}", Utc::now().timestamp()));
        match fs::rename(&self.path, &target).await {
            Ok(()) => Some(target),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to move corrupt links file aside");
                None
            }
        }
    }
}

/// Sets the shared flag when dropped.
///
/// Held by the `save` future: if the caller stops waiting (a write timeout),
/// the blocking writer sees the flag and skips its rename.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Writes `bytes` to `temp`, flushes it, then renames it over `target`.
///
/// Runs to completion on a blocking thread. The temporary file is removed on
/// every failure path, including a write abandoned through `cancelled`.
fn write_atomically(
    target: &Path,
    temp: &Path,
    bytes: &[u8],
    cancelled: &AtomicBool,
) -> Result<(), StoreError> {
    let result = write_and_rename(target, temp, bytes, cancelled);
    if result.is_err() {
        let _ = std::fs::remove_file(temp);
    }
    result
}

fn write_and_rename(
    target: &Path,
    temp: &Path,
    bytes: &[u8],
    cancelled: &AtomicBool,
) -> Result<(), StoreError> {
    let parent = parent_dir(target);
    std::fs::create_dir_all(parent)?;

    let mut file = std::fs::File::create(temp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if cancelled.load(Ordering::Acquire) {
        return Err(StoreError::Io(io::Error::new(
            ErrorKind::Interrupted,
            "write abandoned by caller",
        )));
    }

    std::fs::rename(temp, target)?;
    sync_dir(parent)?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Flushes directory metadata so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[async_trait]
impl LinkStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<LinkEntry>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Links file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let document: Map<String, Value> = match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                let moved_to = self.quarantine().await;
                error!(
                    path = %self.path.display(),
                    moved_to = ?moved_to,
                    error = %e,
                    "Links file is not a valid link document"
                );
                return Err(StoreError::Corrupt(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        Ok(decode_document(document, Utc::now()))
    }

    async fn save(&self, entries: &[LinkEntry]) -> Result<(), StoreError> {
        let mut document = Map::with_capacity(entries.len());
        for entry in entries {
            document.insert(
                self.link_key(&entry.short_id),
                json!([
                    entry.original_url,
                    entry.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                ]),
            );
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))?;

        let target = self.path.clone();
        let temp = self.temp_path();
        let cancelled = Arc::new(AtomicBool::new(false));
        let _cancel_on_drop = CancelOnDrop(cancelled.clone());

        tokio::task::spawn_blocking(move || write_atomically(&target, &temp, &bytes, &cancelled))
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e)))?
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Converts a parsed document into entries, in document order.
///
/// Values with an unknown shape or keys without a usable short id are
/// skipped with a warning. Timestamps that cannot be recovered fall back to
/// `loaded_at`.
fn decode_document(document: Map<String, Value>, loaded_at: DateTime<Utc>) -> Vec<LinkEntry> {
    let mut entries = Vec::with_capacity(document.len());

    for (key, value) in document {
        let Some(short_id) = short_id_from_key(&key) else {
            warn!(key = %key, "Skipping stored link with no short id in its key");
            continue;
        };

        let stored = match serde_json::from_value::<StoredValue>(value) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping stored link with unrecognized value");
                continue;
            }
        };

        let (original_url, created_at) = match stored {
            StoredValue::Bare(url) => {
                debug!(key = %key, "Stored link has no creation time");
                (url, loaded_at)
            }
            StoredValue::Legacy(url, date, time) => {
                let created_at = parse_legacy_timestamp(&date, &time).unwrap_or_else(|| {
                    warn!(key = %key, date = %date, time = %time, "Unrecognized legacy timestamp");
                    loaded_at
                });
                (url, created_at)
            }
            StoredValue::Stamped(url, stamp) => {
                let created_at = DateTime::parse_from_rfc3339(&stamp)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|e| {
                        warn!(key = %key, error = %e, "Unparseable creation time");
                        loaded_at
                    });
                (url, created_at)
            }
        };

        if original_url.is_empty() {
            warn!(key = %key, "Skipping stored link with an empty URL");
            continue;
        }

        entries.push(LinkEntry::new(short_id, original_url, created_at));
    }

    entries
}

/// Extracts the short id from a stored key.
///
/// Fully-qualified keys yield their last non-empty path segment; keys
/// without a scheme are taken as a bare short id.
fn short_id_from_key(key: &str) -> Option<String> {
    if key.contains("://") {
        let url = Url::parse(key).ok()?;
        let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
        return Some(segment.to_string());
    }

    let id = key.trim_matches('/');
    (!id.is_empty() && !id.contains('/')).then(|| id.to_string())
}

/// Parses a locale-formatted `(date, time)` pair in the host's time zone.
fn parse_legacy_timestamp(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = LEGACY_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date.trim(), format).ok())?;
    let time = LEGACY_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time.trim(), format).ok())?;

    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn decode(raw: &str) -> Vec<LinkEntry> {
        decode_document(serde_json::from_str(raw).unwrap(), loaded_at())
    }

    #[test]
    fn test_short_id_from_qualified_key() {
        assert_eq!(
            short_id_from_key("http://localhost:8080/a1b2c3").as_deref(),
            Some("a1b2c3")
        );
        assert_eq!(
            short_id_from_key("https://s.example.com/a1b2c3/").as_deref(),
            Some("a1b2c3")
        );
    }

    #[test]
    fn test_short_id_from_bare_key() {
        assert_eq!(short_id_from_key("a1b2c3").as_deref(), Some("a1b2c3"));
        assert_eq!(short_id_from_key(""), None);
        assert_eq!(short_id_from_key("http://localhost:8080/"), None);
    }

    #[test]
    fn test_decode_bare_value_uses_load_time() {
        let entries = decode(r#"{"http://localhost:8080/abc123": "https://example.com"}"#);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].short_id, "abc123");
        assert_eq!(entries[0].original_url, "https://example.com");
        assert_eq!(entries[0].created_at, loaded_at());
    }

    #[test]
    fn test_decode_legacy_triple() {
        let entries = decode(
            r#"{"http://localhost:8080/abc123": ["https://example.com", "19/10/2026", "14:03:22"]}"#,
        );

        let expected = Local
            .with_ymd_and_hms(2026, 10, 19, 14, 3, 22)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(entries[0].created_at, expected);
    }

    #[test]
    fn test_decode_legacy_us_locale() {
        let parsed = parse_legacy_timestamp("10/19/2026", "2:03:22 PM").unwrap();
        let expected = Local
            .with_ymd_and_hms(2026, 10, 19, 14, 3, 22)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_decode_unparseable_legacy_falls_back() {
        let entries = decode(
            r#"{"http://localhost:8080/abc123": ["https://example.com", "hier", "midi"]}"#,
        );
        assert_eq!(entries[0].created_at, loaded_at());
    }

    #[test]
    fn test_decode_canonical_pair() {
        let entries = decode(
            r#"{"http://localhost:8080/abc123": ["https://example.com", "2026-10-19T12:03:22.5Z"]}"#,
        );

        let expected = DateTime::parse_from_rfc3339("2026-10-19T12:03:22.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(entries[0].created_at, expected);
    }

    #[test]
    fn test_decode_skips_unknown_shapes() {
        let entries = decode(
            r#"{
                "http://localhost:8080/aaaaaa": 42,
                "http://localhost:8080/bbbbbb": ["https://ok.com", "2026-10-19T12:03:22Z"],
                "http://localhost:8080/cccccc": ["a", "b", "c", "d"],
                "http://localhost:8080/dddddd": ""
            }"#,
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].short_id, "bbbbbb");
    }

    #[test]
    fn test_decode_preserves_document_order() {
        let entries = decode(
            r#"{
                "http://h/ffffff": "https://f.com",
                "http://h/000000": "https://z.com",
                "http://h/888888": "https://e.com"
            }"#,
        );

        let ids: Vec<&str> = entries.iter().map(|e| e.short_id.as_str()).collect();
        assert_eq!(ids, vec!["ffffff", "000000", "888888"]);
    }

    #[test]
    fn test_abandoned_write_leaves_nothing_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("links.json");
        let temp = dir.path().join("links.json.tmp-1-0");

        let err = write_atomically(&target, &temp, b"{}", &AtomicBool::new(true)).unwrap_err();

        assert!(matches!(err, StoreError::Io(ref e) if e.kind() == ErrorKind::Interrupted));
        assert!(!target.exists());
        assert!(!temp.exists());
    }

    #[test]
    fn test_completed_write_replaces_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("links.json");
        let temp = dir.path().join("links.json.tmp-1-0");
        std::fs::write(&target, b"old").unwrap();

        write_atomically(&target, &temp, b"new", &AtomicBool::new(false)).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert!(!temp.exists());
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("links.json")), Path::new("."));
        assert_eq!(parent_dir(Path::new("data/links.json")), Path::new("data"));
    }

    #[test]
    fn test_link_key_trims_base_slash() {
        let store = JsonFileStore::new("links.json", "https://s.example.com/");
        assert_eq!(store.link_key("abc123"), "https://s.example.com/abc123");
    }
}
