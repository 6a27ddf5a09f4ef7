use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::cache::DocumentCache;
use crate::design::loader::parse_json;
use crate::design::node_model::{DesignFile, RawNode};
use crate::error::ExtractError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.figma.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static FILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"figma\.com/(?:file|design)/([a-zA-Z0-9]+)").expect("valid regex")
});

/// Pull the file key out of a share URL; anything else is returned as-is.
pub fn extract_file_id(file_id_or_url: &str) -> String {
    FILE_URL
        .captures(file_id_or_url)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| file_id_or_url.to_string())
}

// ============================================================================
// Retry policy
// ============================================================================

/// Bounded exponential backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self.base_delay.saturating_mul(factor);
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }
}

// ============================================================================
// API responses
// ============================================================================

/// Response of `GET /files/:key/nodes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileNodesResponse {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub nodes: BTreeMap<String, Option<NodeEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub document: RawNode,
}

// ============================================================================
// Client
// ============================================================================

/// Blocking design API client.
pub struct FigmaClient {
    access_token: String,
    base_url: String,
    retry: RetryPolicy,
    http: reqwest::blocking::Client,
}

impl FigmaClient {
    pub fn new(access_token: &str, base_url: &str, timeout: Duration) -> Result<Self, ExtractError> {
        if access_token.is_empty() {
            return Err(ExtractError::MissingToken);
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ExtractError::Http {
                context: "building HTTP client".to_string(),
                source,
            })?;

        Ok(Self {
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            http,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Raw JSON of a whole file.
    pub fn get_file(&self, file_id: &str) -> Result<Value, ExtractError> {
        let file_id = extract_file_id(file_id);
        let url = format!("{}/files/{}", self.base_url, file_id);
        self.get_json(&url, &[])
    }

    /// Selected nodes of a file.
    pub fn get_file_nodes(
        &self,
        file_id: &str,
        node_ids: &[String],
    ) -> Result<FileNodesResponse, ExtractError> {
        let file_id = extract_file_id(file_id);
        let url = format!("{}/files/{}/nodes", self.base_url, file_id);
        self.get_json(&url, &[("ids", node_ids.join(","))])
    }

    /// Fetch a file, going through the cache when one is given.
    pub fn fetch_design_file(
        &self,
        file_id: &str,
        cache: Option<&DocumentCache>,
    ) -> Result<DesignFile, ExtractError> {
        let file_id = extract_file_id(file_id);

        if let Some(cached) = cache.and_then(|c| c.load(&file_id)) {
            info!(file_id = %file_id, "using cached design file");
            return design_file_from_value(cached);
        }

        let raw = self.get_file(&file_id)?;
        let design = design_file_from_value(raw.clone())?;

        if let Some(cache) = cache {
            let name = design.name.clone().unwrap_or_default();
            if let Err(e) = cache.save(&file_id, &raw, &name) {
                warn!(file_id = %file_id, error = %e, "could not write cache entry");
            }
        }

        Ok(design)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ExtractError> {
        let mut attempt = 1;
        loop {
            match self.try_get(url, query) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "design API request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ExtractError> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .header("X-Figma-Token", &self.access_token)
            .query(query)
            .send()
            .map_err(|source| ExtractError::Http {
                context: format!("GET {}", url),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().map_err(|source| ExtractError::Http {
            context: format!("reading {}", url),
            source,
        })?;

        parse_json(&body)
            .and_then(serde_json::from_value)
            .map_err(|source| ExtractError::JsonParse {
                context: format!("decoding {}", url),
                source,
            })
    }
}

/// Parse a raw file response into a typed design file.
pub fn design_file_from_value(value: Value) -> Result<DesignFile, ExtractError> {
    serde_json::from_value(value).map_err(|source| ExtractError::JsonParse {
        context: "design file".to_string(),
        source,
    })
}
