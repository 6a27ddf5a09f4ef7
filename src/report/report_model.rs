use std::collections::BTreeMap;

use serde::Serialize;

use crate::baseline::baseline_model::Baseline;
use crate::baseline::matcher::BaselineScenarios;
use crate::extract::extractor::ScreenExtraction;
use crate::relevance::filter::ScoreDistribution;
use crate::screen::screen_model::{Screen, count_screen_components};

// ============================================================================
// Extraction report, as printed or written by the CLI
// ============================================================================

/// Result of one extraction run over a design file.
///
/// Built via `from_extractions()` or `from_screens()`. Consumed by the
/// console reporter and serialized as-is for JSON/YAML output.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Design file key, or the input path for local files
    pub file_id: String,

    pub file_name: String,

    pub total_screens: usize,

    /// Components across all screens, after filtering
    pub total_components: usize,

    /// Scores seen while filtering (all zero when filtering is off)
    pub distribution: ScoreDistribution,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub screens: Vec<Screen>,

    /// Baseline scenarios keyed by screen node id
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub baseline: BTreeMap<String, BaselineScenarios>,
}

impl ExtractionReport {
    pub fn from_extractions(file_id: &str, file_name: &str, extractions: Vec<ScreenExtraction>) -> Self {
        let mut distribution = ScoreDistribution::default();
        for e in &extractions {
            distribution.merge(&e.distribution);
        }

        let screens = extractions.into_iter().map(|e| e.screen).collect();
        Self::from_screens(file_id, file_name, screens).with_distribution(distribution)
    }

    pub fn from_screens(file_id: &str, file_name: &str, screens: Vec<Screen>) -> Self {
        Self {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            total_screens: screens.len(),
            total_components: count_screen_components(&screens),
            distribution: ScoreDistribution::default(),
            duration_ms: None,
            screens,
            baseline: BTreeMap::new(),
        }
    }

    pub fn with_distribution(mut self, distribution: ScoreDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Attach baseline scenarios for every screen that has any.
    pub fn with_baseline(mut self, baseline: &Baseline) -> Self {
        self.baseline = self
            .screens
            .iter()
            .map(|s| (s.node_id.clone(), baseline.scenarios_for_screen(s)))
            .filter(|(_, scenarios)| !scenarios.is_empty())
            .collect();
        self
    }
}
