use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::component::classifier::ClassifierProfile;
use crate::component::parser::{DEFAULT_MAX_DEPTH, parse_tree};
use crate::design::node_model::RawNode;
use crate::relevance::filter::{DEFAULT_THRESHOLD, RelevanceFilter, ScoreDistribution};
use crate::relevance::scorer::ScoringMode;
use crate::screen::detector::{is_screen, screen_type};
use crate::screen::screen_model::Screen;

// ============================================================================
// Extraction configuration
// ============================================================================

/// Knobs of the extraction pipeline (`extraction:` section of the config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_true")]
    pub enable_component_filtering: bool,

    /// Minimum score (0-100) a component needs to be kept
    #[serde(default = "default_threshold")]
    pub component_relevance_threshold: f64,

    #[serde(default = "default_max_depth")]
    pub max_component_depth: usize,

    #[serde(default)]
    pub scoring_mode: ScoringMode,

    #[serde(default)]
    pub classifier_profile: ClassifierProfile,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_component_filtering: true,
            component_relevance_threshold: DEFAULT_THRESHOLD,
            max_component_depth: DEFAULT_MAX_DEPTH,
            scoring_mode: ScoringMode::TypeOnly,
            classifier_profile: ClassifierProfile::Api,
        }
    }
}

fn default_true() -> bool { true }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }
fn default_max_depth() -> usize { DEFAULT_MAX_DEPTH }

impl ExtractionConfig {
    pub fn relevance_filter(&self) -> RelevanceFilter {
        RelevanceFilter {
            enabled: self.enable_component_filtering,
            threshold: self.component_relevance_threshold,
            mode: self.scoring_mode,
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// One emitted screen plus the scores seen while filtering it.
#[derive(Debug, Clone)]
pub struct ScreenExtraction {
    pub screen: Screen,
    pub page: String,
    pub distribution: ScoreDistribution,
}

/// Turns a design document into filtered per-screen component forests.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    pub config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract all screens in pre-order of the document tree.
    pub fn extract_screens(&self, document: &RawNode) -> Vec<Screen> {
        self.extract_detailed(document)
            .into_iter()
            .map(|e| e.screen)
            .collect()
    }

    /// Like `extract_screens`, keeping page names and score distributions.
    pub fn extract_detailed(&self, document: &RawNode) -> Vec<ScreenExtraction> {
        let mut found = Vec::new();
        self.find_screens(document, "", &mut found);

        info!(
            screens = found.len(),
            filtering = self.config.enable_component_filtering,
            "extracted screens"
        );
        found
    }

    fn find_screens(&self, node: &RawNode, page: &str, found: &mut Vec<ScreenExtraction>) {
        if node.node_type == "CANVAS" {
            let page_name = node.name_or_empty();
            for child in &node.children {
                self.find_screens(child, page_name, found);
            }
        } else if is_screen(node) {
            if let Some(extraction) = self.build_screen(node, page) {
                found.push(extraction);
            }
        } else {
            for child in &node.children {
                self.find_screens(child, page, found);
            }
        }
    }

    fn build_screen(&self, node: &RawNode, page: &str) -> Option<ScreenExtraction> {
        let root = parse_tree(
            node,
            0,
            self.config.max_component_depth,
            self.config.classifier_profile,
        )?;

        // The screen node itself is not a component; its children are.
        let mut distribution = ScoreDistribution::default();
        let components = self
            .config
            .relevance_filter()
            .apply_with_stats(root.children, &mut distribution);

        let bounds = node.absolute_bounding_box.as_ref();
        let mut metadata = BTreeMap::new();
        metadata.insert("page".to_string(), Value::from(page));
        metadata.insert(
            "width".to_string(),
            bounds.map_or(Value::Null, |b| Value::from(b.width)),
        );
        metadata.insert(
            "height".to_string(),
            bounds.map_or(Value::Null, |b| Value::from(b.height)),
        );

        let screen = Screen {
            node_id: node.id.clone(),
            name: node
                .name
                .clone()
                .unwrap_or_else(|| "Unnamed Screen".to_string()),
            screen_type: screen_type(node),
            components,
            metadata,
        };

        debug!(
            screen = %screen.name,
            screen_type = %screen.screen_type,
            components = screen.component_count(),
            "screen detected"
        );

        Some(ScreenExtraction {
            screen,
            page: page.to_string(),
            distribution,
        })
    }
}

/// Extract with the default configuration.
pub fn extract_screens(document: &RawNode) -> Vec<Screen> {
    Extractor::default().extract_screens(document)
}
