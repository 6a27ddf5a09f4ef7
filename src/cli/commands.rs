use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::baseline::baseline_model::Baseline;
use crate::cli::config::{
    AppConfig, CacheAction, ExtractionOverrides, process_env, resolve_api_base_url,
    resolve_extraction, resolve_token,
};
use crate::client::cache::DocumentCache;
use crate::client::figma::{FigmaClient, RetryPolicy, extract_file_id};
use crate::design::loader::load_design_file;
use crate::design::node_model::DesignFile;
use crate::error::ExtractError;
use crate::extract::export_loader::ExportSnapshot;
use crate::extract::extractor::Extractor;
use crate::report::console::{format_console_report, format_screen};
use crate::report::report_model::ExtractionReport;
use crate::trace::logger::TraceLogger;

/// Where the design document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(String),
    Figma(String),
}

/// One `extract` invocation: the input plus per-run flags layered over the
/// config file.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub source: InputSource,
    pub overrides: ExtractionOverrides,
    pub token: Option<String>,
    pub baseline_path: Option<String>,
    pub no_cache: bool,
    /// console, json or yaml
    pub format: String,
    pub output: Option<String>,
}

impl ExtractRequest {
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            overrides: ExtractionOverrides::default(),
            token: None,
            baseline_path: None,
            no_cache: false,
            format: "console".to_string(),
            output: None,
        }
    }
}

// ============================================================================
// extract subcommand
// ============================================================================

pub fn cmd_extract(
    request: &ExtractRequest,
    config: &AppConfig,
    tracer: &TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let (file_id, design) = load_source(
        &request.source,
        config,
        request.token.as_deref(),
        request.no_cache,
    )?;
    let file_name = design
        .name
        .clone()
        .unwrap_or_else(|| file_id.clone());

    let extraction = resolve_extraction(&config.extraction, &request.overrides);
    let extractor = Extractor::new(extraction.clone());

    let start = std::time::Instant::now();
    let extractions = extractor.extract_detailed(&design.document);
    let duration = start.elapsed().as_millis();

    tracer.log_extractions(
        &extractions,
        extraction
            .enable_component_filtering
            .then_some(extraction.component_relevance_threshold),
    );

    let mut report =
        ExtractionReport::from_extractions(&file_id, &file_name, extractions).with_duration(duration);

    if let Some(baseline) = load_baseline(config, request.baseline_path.as_deref()) {
        report = report.with_baseline(&baseline);
    }

    let content = match request.format.as_str() {
        format @ ("json" | "yaml") => render(&report, format)?,
        _ => format_console_report(&report),
    };
    write_output(&content, request.output.as_deref())?;

    Ok(())
}

/// Resolve the input into a file id and a parsed design file.
fn load_source(
    source: &InputSource,
    config: &AppConfig,
    token: Option<&str>,
    no_cache: bool,
) -> Result<(String, DesignFile), ExtractError> {
    match source {
        InputSource::File(path) => Ok((path.clone(), load_design_file(path)?)),
        InputSource::Figma(id_or_url) => {
            let file_id = extract_file_id(id_or_url);
            let token = resolve_token(token, &config.figma, process_env)
                .ok_or(ExtractError::MissingToken)?;
            let base_url = resolve_api_base_url(&config.figma, process_env);

            let retry = RetryPolicy {
                max_attempts: config.figma.max_attempts.max(1),
                ..RetryPolicy::default()
            };
            let client = FigmaClient::new(
                &token,
                &base_url,
                Duration::from_secs(config.figma.timeout_secs),
            )?
            .with_retry(retry);

            let cache = (config.cache.enabled && !no_cache)
                .then(|| DocumentCache::new(&config.cache.dir));

            info!(file_id = %file_id, "fetching design file");
            let design = client.fetch_design_file(&file_id, cache.as_ref())?;
            Ok((file_id, design))
        }
    }
}

/// CLI path wins; otherwise the configured path when baselines are enabled.
fn load_baseline(config: &AppConfig, cli_path: Option<&str>) -> Option<Baseline> {
    match cli_path {
        Some(path) => Baseline::load_optional(path),
        None if config.baseline.enabled => {
            let path = std::path::Path::new(&config.baseline.path);
            // The default location is optional; stay quiet when it is absent.
            path.exists().then(|| Baseline::load_optional(path)).flatten()
        }
        None => None,
    }
}

// ============================================================================
// export subcommand
// ============================================================================

pub fn cmd_export(
    path: &str,
    summary: bool,
    format: &str,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = ExportSnapshot::from_path(path)?;

    let content = if summary {
        let summary = snapshot.summary();
        match format {
            "json" | "yaml" => render(&summary, format)?,
            _ => {
                let mut out = format!(
                    "Components: {}\nScreens detected: {}\n",
                    summary.total_components, summary.screens_detected
                );
                for (kind, count) in &summary.type_breakdown {
                    out.push_str(&format!("  {}: {}\n", kind, count));
                }
                for name in &summary.screen_names {
                    out.push_str(&format!("  - {}\n", name));
                }
                out
            }
        }
    } else {
        let screens = snapshot.extract_screens();
        match format {
            "json" | "yaml" => render(&screens, format)?,
            _ => screens
                .iter()
                .map(format_screen)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    };

    write_output(&content, output)?;
    Ok(())
}

// ============================================================================
// cache subcommand
// ============================================================================

pub fn cmd_cache(action: &CacheAction, dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cache = DocumentCache::new(dir);

    match action {
        CacheAction::List => {
            let entries = cache.list();
            if entries.is_empty() {
                println!("Cache is empty ({})", dir);
            }
            for meta in entries {
                println!(
                    "  {}  {} ({} bytes, sha1 {})",
                    meta.file_id, meta.file_name, meta.size_bytes, meta.fingerprint
                );
            }
        }
        CacheAction::Stats => {
            let stats = cache.stats();
            println!(
                "{} cached files, {} bytes in {}",
                stats.total_files, stats.total_bytes, stats.cache_dir
            );
        }
        CacheAction::Clear { file_id: Some(id) } => {
            let id = extract_file_id(id);
            if cache.delete(&id)? {
                println!("Removed {}", id);
            } else {
                println!("{} is not cached", id);
            }
        }
        CacheAction::Clear { file_id: None } => {
            let removed = cache.clear()?;
            println!("Removed {} files from {}", removed, dir);
        }
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Serialize as pretty JSON, or YAML when `format == "yaml"`.
pub fn render<T: Serialize>(value: &T, format: &str) -> Result<String, ExtractError> {
    if format == "yaml" {
        serde_yaml::to_string(value).map_err(|source| ExtractError::YamlSerialize {
            context: "command output".to_string(),
            source,
        })
    } else {
        serde_json::to_string_pretty(value).map_err(|source| ExtractError::JsonSerialize {
            context: "command output".to_string(),
            source,
        })
    }
}

fn write_output(content: &str, output: Option<&str>) -> Result<(), ExtractError> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|source| ExtractError::Io {
            path: path.to_string(),
            source,
        }),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
