use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::warn;

use crate::design::loader::parse_json;
use crate::error::ExtractError;

pub const DEFAULT_CACHE_DIR: &str = ".cache/figma";

/// Sidecar stored next to each cached design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub file_id: String,
    pub file_name: String,
    pub cached_at_ms: u128,
    pub size_bytes: usize,
    /// sha1 of the cached JSON text
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub cache_dir: String,
}

/// On-disk cache of raw design-file responses, keyed by file id.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a file response and its metadata. Returns the data path.
    pub fn save(&self, file_id: &str, data: &Value, file_name: &str) -> Result<PathBuf, ExtractError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| io_error(&self.dir, source))?;

        let json = serde_json::to_string_pretty(data).map_err(|source| {
            ExtractError::JsonSerialize {
                context: format!("cache entry {}", file_id),
                source,
            }
        })?;

        let data_path = self.data_path(file_id);
        std::fs::write(&data_path, &json).map_err(|source| io_error(&data_path, source))?;

        let metadata = CacheMetadata {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            cached_at_ms: now_ms(),
            size_bytes: json.len(),
            fingerprint: fingerprint(&json),
        };
        let meta_json = serde_json::to_string_pretty(&metadata).map_err(|source| {
            ExtractError::JsonSerialize {
                context: format!("cache metadata {}", file_id),
                source,
            }
        })?;

        let meta_path = self.metadata_path(file_id);
        std::fs::write(&meta_path, meta_json).map_err(|source| io_error(&meta_path, source))?;

        Ok(data_path)
    }

    /// Cached response, or `None` when absent or unreadable.
    pub fn load(&self, file_id: &str) -> Option<Value> {
        let path = self.data_path(file_id);
        let content = std::fs::read_to_string(&path).ok()?;

        match parse_json(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                None
            }
        }
    }

    pub fn exists(&self, file_id: &str) -> bool {
        self.data_path(file_id).exists()
    }

    pub fn metadata(&self, file_id: &str) -> Option<CacheMetadata> {
        read_metadata(&self.metadata_path(file_id))
    }

    /// Missing or unreadable metadata counts as stale.
    pub fn is_stale(&self, file_id: &str, ttl: Duration) -> bool {
        match self.metadata(file_id) {
            Some(meta) => now_ms().saturating_sub(meta.cached_at_ms) > ttl.as_millis(),
            None => true,
        }
    }

    /// All cached entries, newest first.
    pub fn list(&self) -> Vec<CacheMetadata> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return vec![];
        };

        let mut listed: Vec<CacheMetadata> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_metadata_file(p))
            .filter_map(|p| read_metadata(&p))
            .collect();

        listed.sort_by(|a, b| b.cached_at_ms.cmp(&a.cached_at_ms));
        listed
    }

    /// Remove one entry. Returns whether a cached file existed.
    pub fn delete(&self, file_id: &str) -> Result<bool, ExtractError> {
        let data_path = self.data_path(file_id);
        let meta_path = self.metadata_path(file_id);

        let existed = data_path.exists();
        if existed {
            std::fs::remove_file(&data_path).map_err(|source| io_error(&data_path, source))?;
        }
        if meta_path.exists() {
            std::fs::remove_file(&meta_path).map_err(|source| io_error(&meta_path, source))?;
        }

        Ok(existed)
    }

    /// Remove every `.json` file in the cache directory. Returns the count.
    pub fn clear(&self) -> Result<usize, ExtractError> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Ok(0);
        };

        let mut removed = 0;
        for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
            if path.extension().is_some_and(|e| e == "json") {
                std::fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let mut total_files = 0;
        let mut total_bytes = 0;

        if let Ok(entries) = std::fs::read_dir(&self.dir) {
            for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
                if path.extension().is_some_and(|e| e == "json") && !is_metadata_file(&path) {
                    total_files += 1;
                    total_bytes += std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                }
            }
        }

        CacheStats {
            total_files,
            total_bytes,
            cache_dir: self.dir.display().to_string(),
        }
    }

    fn data_path(&self, file_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_file_id(file_id)))
    }

    fn metadata_path(&self, file_id: &str) -> PathBuf {
        self.dir.join(format!("{}_meta.json", sanitize_file_id(file_id)))
    }
}

pub fn sanitize_file_id(file_id: &str) -> String {
    file_id.replace(['/', ':'], "_")
}

pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn is_metadata_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_meta.json"))
}

fn read_metadata(path: &Path) -> Option<CacheMetadata> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn io_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
