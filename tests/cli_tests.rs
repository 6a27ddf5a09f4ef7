mod common;

use clap::Parser;
use design_extract::cli::commands::{
    ExtractRequest, InputSource, cmd_export, cmd_extract, render,
};
use design_extract::cli::config::{
    AppConfig, CacheAction, Cli, Commands, ExtractionOverrides, FigmaConfig, load_config,
    resolve_api_base_url, resolve_extraction, resolve_token,
};
use design_extract::client::figma::DEFAULT_API_BASE_URL;
use design_extract::component::classifier::ClassifierProfile;
use design_extract::extract::extractor::{ExtractionConfig, Extractor};
use design_extract::relevance::scorer::ScoringMode;
use design_extract::trace::logger::TraceLogger;
use serde_json::json;

use common::login_document;

// ============================================================================
// Helper builders
// ============================================================================

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_with(key: &'static str, value: &'static str) -> impl Fn(&str) -> Option<String> {
    move |k: &str| (k == key).then(|| value.to_string())
}

fn write_login_file(dir: &std::path::Path) -> String {
    let path = dir.join("design.json");
    let file = json!({
        "name": "Shop App",
        "document": serde_json::to_value(login_document()).unwrap()
    });
    std::fs::write(&path, file.to_string()).unwrap();
    path.to_str().unwrap().to_string()
}

/// Config that never touches the working directory's baseline file.
fn isolated_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.baseline.enabled = false;
    config
}

// ============================================================================
// 1. Argument parsing
// ============================================================================

#[test]
fn parse_extract_from_file_with_defaults() {
    let cli = Cli::try_parse_from(["design-extract", "extract", "--file", "design.json"]).unwrap();

    assert_eq!(cli.verbose, 0);
    match cli.command {
        Commands::Extract {
            file,
            figma,
            format,
            no_filter,
            threshold,
            scoring,
            profile,
            ..
        } => {
            assert_eq!(file.as_deref(), Some("design.json"));
            assert_eq!(figma, None);
            assert_eq!(format, "console");
            assert!(!no_filter);
            assert_eq!(threshold, None);
            assert_eq!(scoring, None);
            assert_eq!(profile, None);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_extract_with_all_flags() {
    let cli = Cli::try_parse_from([
        "design-extract",
        "-vv",
        "--trace",
        "run.jsonl",
        "extract",
        "--figma",
        "https://www.figma.com/file/AbC/App",
        "--token",
        "secret",
        "--format",
        "json",
        "-o",
        "out.json",
        "--threshold",
        "35",
        "--max-depth",
        "4",
        "--scoring",
        "weighted",
        "--profile",
        "export",
        "--no-cache",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace.as_deref(), Some("run.jsonl"));
    match cli.command {
        Commands::Extract {
            figma,
            token,
            output,
            threshold,
            max_depth,
            scoring,
            profile,
            no_cache,
            ..
        } => {
            assert_eq!(figma.as_deref(), Some("https://www.figma.com/file/AbC/App"));
            assert_eq!(token.as_deref(), Some("secret"));
            assert_eq!(output.as_deref(), Some("out.json"));
            assert_eq!(threshold, Some(35.0));
            assert_eq!(max_depth, Some(4));
            assert_eq!(scoring, Some(ScoringMode::Weighted));
            assert_eq!(profile, Some(ClassifierProfile::Export));
            assert!(no_cache);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn extract_needs_exactly_one_source() {
    assert!(Cli::try_parse_from(["design-extract", "extract"]).is_err());
    assert!(
        Cli::try_parse_from([
            "design-extract",
            "extract",
            "--file",
            "a.json",
            "--figma",
            "abc"
        ])
        .is_err()
    );
}

#[test]
fn parse_export_and_cache_commands() {
    let cli = Cli::try_parse_from(["design-extract", "export", "--file", "snap.json", "--summary"])
        .unwrap();
    assert!(matches!(cli.command, Commands::Export { summary: true, .. }));

    let cli = Cli::try_parse_from(["design-extract", "cache", "--dir", "/tmp/c", "clear", "abc"])
        .unwrap();
    match cli.command {
        Commands::Cache { action, dir } => {
            assert_eq!(action, CacheAction::Clear { file_id: Some("abc".into()) });
            assert_eq!(dir.as_deref(), Some("/tmp/c"));
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["design-extract", "cache", "stats"]).unwrap();
    assert!(matches!(cli.command, Commands::Cache { action: CacheAction::Stats, .. }));
}

// ============================================================================
// 2. Config file
// ============================================================================

#[test]
fn missing_config_uses_defaults() {
    let config = load_config(Some("/nonexistent/design-extract.yaml"));

    assert_eq!(config.extraction, ExtractionConfig::default());
    assert_eq!(config.figma.timeout_secs, 30);
    assert_eq!(config.figma.max_attempts, 3);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.dir, ".cache/figma");
    assert_eq!(config.baseline.path, "data/test_baseline.json");
}

#[test]
fn partial_config_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design-extract.yaml");
    std::fs::write(
        &path,
        "extraction:\n  component_relevance_threshold: 35\n  scoring_mode: weighted\nfigma:\n  access_token: from-config\ncache:\n  dir: /tmp/design-cache\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.extraction.component_relevance_threshold, 35.0);
    assert_eq!(config.extraction.scoring_mode, ScoringMode::Weighted);
    assert_eq!(config.extraction.max_component_depth, 10);
    assert!(config.extraction.enable_component_filtering);
    assert_eq!(config.figma.access_token.as_deref(), Some("from-config"));
    assert_eq!(config.figma.timeout_secs, 30);
    assert_eq!(config.cache.dir, "/tmp/design-cache");
    assert!(config.cache.enabled);
}

#[test]
fn malformed_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design-extract.yaml");
    std::fs::write(&path, "extraction: [not, a, map").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.extraction, ExtractionConfig::default());
}

// ============================================================================
// 3. Resolution
// ============================================================================

#[test]
fn cli_flags_override_config() {
    let base = ExtractionConfig {
        component_relevance_threshold: 30.0,
        ..ExtractionConfig::default()
    };
    let overrides = ExtractionOverrides {
        no_filter: true,
        threshold: Some(50.0),
        max_depth: Some(3),
        scoring: Some(ScoringMode::Weighted),
        profile: Some(ClassifierProfile::Export),
    };

    let resolved = resolve_extraction(&base, &overrides);
    assert!(!resolved.enable_component_filtering);
    assert_eq!(resolved.component_relevance_threshold, 50.0);
    assert_eq!(resolved.max_component_depth, 3);
    assert_eq!(resolved.scoring_mode, ScoringMode::Weighted);
    assert_eq!(resolved.classifier_profile, ClassifierProfile::Export);

    let untouched = resolve_extraction(&base, &ExtractionOverrides::default());
    assert_eq!(untouched, base);
}

#[test]
fn threshold_is_clamped() {
    let base = ExtractionConfig::default();

    let high = ExtractionOverrides {
        threshold: Some(150.0),
        ..ExtractionOverrides::default()
    };
    assert_eq!(resolve_extraction(&base, &high).component_relevance_threshold, 100.0);

    let low = ExtractionOverrides {
        threshold: Some(-5.0),
        ..ExtractionOverrides::default()
    };
    assert_eq!(resolve_extraction(&base, &low).component_relevance_threshold, 0.0);
}

#[test]
fn non_finite_threshold_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design-extract.yaml");
    std::fs::write(&path, "extraction:\n  component_relevance_threshold: .nan\n").unwrap();

    let config = load_config(path.to_str());
    assert!(config.extraction.component_relevance_threshold.is_nan());

    let resolved = resolve_extraction(&config.extraction, &ExtractionOverrides::default());
    assert_eq!(resolved.component_relevance_threshold, 20.0);

    let screens = Extractor::new(resolved).extract_screens(&login_document());
    assert_eq!(screens[0].component_count(), 2);

    let infinite = ExtractionOverrides {
        threshold: Some(f64::INFINITY),
        ..ExtractionOverrides::default()
    };
    assert_eq!(
        resolve_extraction(&ExtractionConfig::default(), &infinite).component_relevance_threshold,
        20.0
    );
}

#[test]
fn token_resolution_order() {
    let configured = FigmaConfig {
        access_token: Some("config-token".into()),
        ..FigmaConfig::default()
    };
    let env = env_with("FIGMA_ACCESS_TOKEN", "env-token");

    assert_eq!(resolve_token(Some("cli-token"), &configured, &env).as_deref(), Some("cli-token"));
    assert_eq!(resolve_token(None, &configured, &env).as_deref(), Some("config-token"));
    assert_eq!(resolve_token(None, &FigmaConfig::default(), &env).as_deref(), Some("env-token"));
    assert_eq!(resolve_token(None, &FigmaConfig::default(), no_env), None);
}

#[test]
fn api_base_url_resolution() {
    assert_eq!(resolve_api_base_url(&FigmaConfig::default(), no_env), DEFAULT_API_BASE_URL);

    let env = env_with("FIGMA_API_BASE_URL", "http://localhost:8080/v1");
    assert_eq!(resolve_api_base_url(&FigmaConfig::default(), &env), "http://localhost:8080/v1");

    let configured = FigmaConfig {
        api_base_url: Some("http://proxy/v1".into()),
        ..FigmaConfig::default()
    };
    assert_eq!(resolve_api_base_url(&configured, &env), "http://proxy/v1");
}

// ============================================================================
// 4. Commands
// ============================================================================

#[test]
fn extract_command_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_login_file(dir.path());
    let output = dir.path().join("report.json");

    let request = ExtractRequest {
        format: "json".into(),
        output: output.to_str().map(String::from),
        ..ExtractRequest::new(InputSource::File(input.clone()))
    };
    cmd_extract(&request, &isolated_config(), &TraceLogger::disabled()).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["file_id"], input.as_str());
    assert_eq!(report["file_name"], "Shop App");
    assert_eq!(report["total_screens"], 1);
    assert_eq!(report["total_components"], 2);
    assert!(report["duration_ms"].is_u64());
}

#[test]
fn extract_command_without_filter_keeps_decoration() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_login_file(dir.path());
    let output = dir.path().join("report.txt");
    let request = ExtractRequest {
        overrides: ExtractionOverrides {
            no_filter: true,
            ..ExtractionOverrides::default()
        },
        output: output.to_str().map(String::from),
        ..ExtractRequest::new(InputSource::File(input))
    };

    cmd_extract(&request, &isolated_config(), &TraceLogger::disabled()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("- Rectangle 1 (rectangle)\n"));
    assert!(text.contains("3 components"));
}

#[test]
fn extract_command_reports_missing_input() {
    let request = ExtractRequest::new(InputSource::File("/nonexistent/design.json".into()));
    let result = cmd_extract(&request, &isolated_config(), &TraceLogger::disabled());
    assert!(result.is_err());
}

#[test]
fn export_command_summary_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshot.json");
    std::fs::write(
        &input,
        json!({
            "components": [
                { "id": "4:1", "text": "Login (FRAME)" },
                { "id": "4:2", "text": "Email (INSTANCE)" },
                { "id": "4:3", "text": "Password (INSTANCE)" },
                { "id": "4:4", "text": "Button Submit (INSTANCE)" }
            ]
        })
        .to_string(),
    )
    .unwrap();
    let output = dir.path().join("summary.yaml");

    cmd_export(input.to_str().unwrap(), true, "yaml", output.to_str()).unwrap();

    let yaml = std::fs::read_to_string(&output).unwrap();
    assert!(yaml.contains("total_components: 4"));
    assert!(yaml.contains("screens_detected: 1"));
    assert!(yaml.contains("Screen Login"));
}

#[test]
fn render_formats() {
    let value = json!({ "a": 1 });
    assert_eq!(render(&value, "json").unwrap(), "{\n  \"a\": 1\n}");
    assert_eq!(render(&value, "yaml").unwrap(), "a: 1\n");
}
