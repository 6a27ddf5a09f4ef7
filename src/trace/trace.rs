use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{extract::extractor::ScreenExtraction, relevance::filter::ScoreDistribution};

/// One JSONL line per emitted screen.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub screen_id: Option<String>,
    pub screen_name: Option<String>,
    pub screen_type: Option<String>,
    pub page: Option<String>,

    pub components: usize,
    pub distribution: ScoreDistribution,

    /// None when filtering is disabled
    pub threshold: Option<f64>,
}

impl TraceEvent {
    pub fn now(step: u64) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            screen_id: None,
            screen_name: None,
            screen_type: None,
            page: None,
            components: 0,
            distribution: ScoreDistribution::default(),
            threshold: None,
        }
    }

    pub fn with_screen(mut self, extraction: &ScreenExtraction) -> Self {
        let screen = &extraction.screen;
        self.screen_id = Some(screen.node_id.clone());
        self.screen_name = Some(screen.name.clone());
        self.screen_type = Some(screen.screen_type.to_string());
        self.page = Some(extraction.page.clone());
        self.components = screen.component_count();
        self.distribution = extraction.distribution;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
