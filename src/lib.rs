use std::path::Path;

use crate::{
    design::loader::load_design_file,
    error::ExtractError,
    extract::extractor::{ExtractionConfig, Extractor},
    screen::screen_model::Screen,
};

pub mod baseline;
pub mod cli;
pub mod client;
pub mod component;
pub mod design;
pub mod error;
pub mod extract;
pub mod relevance;
pub mod report;
pub mod screen;
pub mod trace;

/// Load a design file from disk and extract its screens.
pub fn extract_file(path: impl AsRef<Path>, config: &ExtractionConfig) -> Result<Vec<Screen>, ExtractError> {
    let design = load_design_file(path)?;
    Ok(Extractor::new(config.clone()).extract_screens(&design.document))
}
