use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::cache::DEFAULT_CACHE_DIR;
use crate::client::figma::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::component::classifier::ClassifierProfile;
use crate::extract::extractor::ExtractionConfig;
use crate::relevance::filter::DEFAULT_THRESHOLD;
use crate::relevance::scorer::{MAX_SCORE, ScoringMode};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "design-extract",
    version,
    about = "Extract scored, noise-filtered screen/component trees from design files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: design-extract.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append one JSONL trace event per extracted screen to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract screens from a design file (local JSON or design API)
    Extract {
        /// Local design file JSON (API response or bare node tree)
        #[arg(long, conflicts_with = "figma", required_unless_present = "figma")]
        file: Option<String>,

        /// Design API file key or share URL
        #[arg(long)]
        figma: Option<String>,

        /// Design API token (overrides config and FIGMA_ACCESS_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output format: console, json, yaml
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Keep every component, unscored
        #[arg(long)]
        no_filter: bool,

        /// Minimum relevance score (0-100) to keep a component
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum component tree depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Relevance scoring mode
        #[arg(long, value_enum)]
        scoring: Option<ScoringMode>,

        /// Classification table set
        #[arg(long, value_enum)]
        profile: Option<ClassifierProfile>,

        /// Baseline scenario library (JSON)
        #[arg(long)]
        baseline: Option<String>,

        /// Bypass the local design file cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Load a flattened JSON export snapshot
    Export {
        /// Export snapshot JSON
        #[arg(long)]
        file: String,

        /// Print type counts and screen names instead of screens
        #[arg(long)]
        summary: bool,

        /// Output format: console, json, yaml
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect or clear the design file cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,

        /// Cache directory (overrides config)
        #[arg(long)]
        dir: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// List cached files, newest first
    List,

    /// Show file count and total size
    Stats,

    /// Remove one cached file, or everything when no id is given
    Clear {
        file_id: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `design-extract.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub figma: FigmaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub baseline: BaselineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaConfig {
    pub access_token: Option<String>,

    pub api_base_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_baseline_path")]
    pub path: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "data/test_baseline.json".to_string(),
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_attempts() -> u32 { 3 }
fn default_cache_dir() -> String { DEFAULT_CACHE_DIR.to_string() }
fn default_baseline_path() -> String { "data/test_baseline.json".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("design-extract.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config file > environment > defaults)
// ============================================================================

/// Extraction flags given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOverrides {
    pub no_filter: bool,
    pub threshold: Option<f64>,
    pub max_depth: Option<usize>,
    pub scoring: Option<ScoringMode>,
    pub profile: Option<ClassifierProfile>,
}

/// Merge CLI flags over the config file's extraction section.
pub fn resolve_extraction(config: &ExtractionConfig, overrides: &ExtractionOverrides) -> ExtractionConfig {
    let mut resolved = config.clone();

    if overrides.no_filter {
        resolved.enable_component_filtering = false;
    }
    if let Some(t) = overrides.threshold {
        resolved.component_relevance_threshold = t;
    }
    if let Some(d) = overrides.max_depth {
        resolved.max_component_depth = d;
    }
    if let Some(mode) = overrides.scoring {
        resolved.scoring_mode = mode;
    }
    if let Some(profile) = overrides.profile {
        resolved.classifier_profile = profile;
    }

    let threshold = resolved.component_relevance_threshold;
    resolved.component_relevance_threshold = if threshold.is_finite() {
        threshold.clamp(0.0, MAX_SCORE)
    } else {
        warn!(threshold, "relevance threshold is not finite, using the default");
        DEFAULT_THRESHOLD
    };
    resolved
}

/// Design API token: CLI > config > `FIGMA_ACCESS_TOKEN`.
pub fn resolve_token(
    cli_token: Option<&str>,
    config: &FigmaConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    cli_token
        .map(str::to_string)
        .or_else(|| config.access_token.clone())
        .or_else(|| env("FIGMA_ACCESS_TOKEN"))
        .filter(|t| !t.is_empty())
}

/// Design API base URL: config > `FIGMA_API_BASE_URL` > default.
pub fn resolve_api_base_url(config: &FigmaConfig, env: impl Fn(&str) -> Option<String>) -> String {
    config
        .api_base_url
        .clone()
        .or_else(|| env("FIGMA_API_BASE_URL"))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Process environment lookup for the `resolve_*` helpers.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
