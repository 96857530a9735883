use crate::error::CacheError;
use crate::results::{LinkedPageRecord, PageRecord};
use crate::utils::content_hash;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

const SNAPSHOT_FILE: &str = "content.json";
const SNAPSHOT_VERSION: u32 = 1;

static UNSAFE_HOST_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.-]").unwrap());

/// On-disk envelope around a cached root record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub url: String,
    pub saved_at: DateTime<Utc>,
    pub content: PageRecord,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Directory-per-URL JSON store shared across sessions
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the snapshot for `url`
    ///
    /// Named `{host}_{8 hex}` from a hash of path and query, or just `{host}`
    /// for the site root. The host drops a leading `www.` and anything outside
    /// `[A-Za-z0-9.-]` becomes `_`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(dir_name(url))
    }

    /// Writes `record` as the snapshot for `url`, replacing any previous one
    pub fn save(&self, url: &str, record: &PageRecord) -> Result<PathBuf, CacheError> {
        let dir = self.path_for(url);
        fs::create_dir_all(&dir)?;

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            url: url.to_string(),
            saved_at: Utc::now(),
            content: record.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let path = dir.join(SNAPSHOT_FILE);
        let staging = dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        fs::write(&staging, json)?;
        fs::rename(&staging, &path)?;

        ::log::debug!("Cached {} at {}", url, path.display());
        Ok(path)
    }

    /// Loads the stored record for `url`; freshness is left to the caller
    pub fn load(&self, url: &str) -> Result<PageRecord, CacheError> {
        let path = self.path_for(url).join(SNAPSHOT_FILE);
        if !path.exists() {
            return Err(CacheError::NotFound(url.to_string()));
        }
        Ok(read_snapshot(&path)?.content)
    }

    /// Root record whose content hash equals `hash`
    pub fn find_page_by_hash(&self, hash: &str) -> Result<PageRecord, CacheError> {
        self.snapshots()
            .into_iter()
            .map(|snapshot| snapshot.content)
            .find(|record| record.content_hash == hash)
            .ok_or_else(|| CacheError::NotFound(hash.to_string()))
    }

    /// Linked page stored inside any snapshot whose content hash equals `hash`
    pub fn find_linked_by_hash(&self, hash: &str) -> Result<LinkedPageRecord, CacheError> {
        self.snapshots()
            .into_iter()
            .flat_map(|snapshot| snapshot.content.linked_pages.into_values())
            .find(|linked| linked.content_hash == hash)
            .ok_or_else(|| CacheError::NotFound(hash.to_string()))
    }

    /// Every readable snapshot under the cache root; unreadable ones are skipped
    fn snapshots(&self) -> Vec<Snapshot> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                ::log::debug!("Cache root {} not readable: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut snapshots = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path().join(SNAPSHOT_FILE);
            if !path.is_file() {
                continue;
            }
            match read_snapshot(&path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => ::log::warn!("Skipping unreadable cache file {}: {}", path.display(), e),
            }
        }
        snapshots
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, CacheError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn dir_name(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return format!("url_{}", &content_hash(url.as_bytes())[..8]),
    };

    let host = parsed.host_str().unwrap_or("unknown").to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let host = UNSAFE_HOST_CHARS.replace_all(host, "_");

    let path = parsed.path();
    let query = parsed.query();
    if (path.is_empty() || path == "/") && query.is_none() {
        return host.into_owned();
    }

    let key = format!("{}?{}", path, query.unwrap_or(""));
    format!("{}_{}", host, &content_hash(key.as_bytes())[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(url: &str, hash: &str) -> PageRecord {
        let mut record = PageRecord::new(url, "Title".to_string(), hash.to_string());
        record.text = "Body".to_string();
        record
    }

    #[test]
    fn test_path_for_root_is_bare_host() {
        let cache = DiskCache::new("/cache");
        assert_eq!(
            cache.path_for("https://www.example.com/"),
            PathBuf::from("/cache/example.com")
        );
        assert_eq!(
            cache.path_for("http://example.com"),
            PathBuf::from("/cache/example.com")
        );
    }

    #[test]
    fn test_path_for_is_deterministic_and_hashes_path() {
        let cache = DiskCache::new("/cache");
        let a = cache.path_for("https://example.com/about?lang=en");
        let b = cache.path_for("https://example.com/about?lang=en");
        let c = cache.path_for("https://example.com/about?lang=de");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let name = a.file_name().unwrap().to_str().unwrap().to_string();
        let (host, suffix) = name.split_once('_').unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_path_for_unparseable_url() {
        let cache = DiskCache::new("/cache");
        let name = cache.path_for("not a url");
        assert!(name.to_str().unwrap().starts_with("/cache/url_"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());
        let original = record("https://example.com/", "abc");

        let path = cache.save("https://example.com/", &original).unwrap();
        assert!(path.ends_with("example.com/content.json"));

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"version\": 1"));
        assert!(json.contains("\"saved_at\""));

        let loaded = cache.load("https://example.com/").unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());
        cache.save("https://example.com/", &record("https://example.com/", "one")).unwrap();
        cache.save("https://example.com/", &record("https://example.com/", "two")).unwrap();
        assert_eq!(cache.load("https://example.com/").unwrap().content_hash, "two");
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());
        assert!(matches!(
            cache.load("https://example.com/nothing"),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_by_hash_scans_all_snapshots() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());

        let mut first = record("https://one.example/", "hash-1");
        first.linked_pages.insert(
            "https://github.com/alice".to_string(),
            LinkedPageRecord {
                url: "https://github.com/alice".to_string(),
                title: "alice".to_string(),
                description: String::new(),
                text: "repos".to_string(),
                keywords: Vec::new(),
                metadata: Default::default(),
                content_type: Default::default(),
                relevance: 0,
                content_hash: "linked-hash".to_string(),
                last_updated: Utc::now(),
            },
        );
        cache.save("https://one.example/", &first).unwrap();
        cache.save("https://two.example/", &record("https://two.example/", "hash-2")).unwrap();

        fs::create_dir_all(dir.path().join("broken")).unwrap();
        fs::write(dir.path().join("broken").join(SNAPSHOT_FILE), "{not json").unwrap();

        assert_eq!(
            cache.find_page_by_hash("hash-2").unwrap().url,
            "https://two.example/"
        );
        assert_eq!(
            cache.find_linked_by_hash("linked-hash").unwrap().url,
            "https://github.com/alice"
        );
        assert!(cache.find_page_by_hash("missing").is_err());
    }

    #[test]
    fn test_missing_root_finds_nothing() {
        let cache = DiskCache::new("/definitely/not/here");
        assert!(cache.find_page_by_hash("anything").is_err());
    }
}
