use clap::Parser;
use design_extract::cli::commands::{
    ExtractRequest, InputSource, cmd_cache, cmd_export, cmd_extract,
};
use design_extract::cli::config::{Cli, Commands, ExtractionOverrides, load_config};
use design_extract::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Logs go to stderr; stdout carries the report
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let tracer = match cli.trace.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    match cli.command {
        Commands::Extract {
            file,
            figma,
            token,
            format,
            output,
            no_filter,
            threshold,
            max_depth,
            scoring,
            profile,
            baseline,
            no_cache,
        } => {
            let source = match (file, figma) {
                (Some(path), _) => InputSource::File(path),
                (None, Some(id)) => InputSource::Figma(id),
                (None, None) => return Err("either --file or --figma is required".into()),
            };
            let request = ExtractRequest {
                overrides: ExtractionOverrides {
                    no_filter,
                    threshold,
                    max_depth,
                    scoring,
                    profile,
                },
                token,
                baseline_path: baseline,
                no_cache,
                format,
                output,
                ..ExtractRequest::new(source)
            };

            cmd_extract(&request, &config, &tracer)?;
        }
        Commands::Export {
            file,
            summary,
            format,
            output,
        } => {
            cmd_export(&file, summary, &format, output.as_deref())?;
        }
        Commands::Cache { action, dir } => {
            let dir = dir.unwrap_or_else(|| config.cache.dir.clone());
            cmd_cache(&action, &dir)?;
        }
    }

    Ok(())
}
