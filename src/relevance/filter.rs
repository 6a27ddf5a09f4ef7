use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::component_model::Component;
use crate::relevance::scorer::{ScoringMode, score};

pub const DEFAULT_THRESHOLD: f64 = 20.0;
pub const HIGH_SCORE: f64 = 70.0;
pub const MEDIUM_SCORE: f64 = 40.0;

/// Observability bucket for a scored component. Has no effect on filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
    Filtered,
}

pub fn band(score: f64, threshold: f64) -> ScoreBand {
    if score >= HIGH_SCORE {
        ScoreBand::High
    } else if score >= MEDIUM_SCORE {
        ScoreBand::Medium
    } else if score >= threshold {
        ScoreBand::Low
    } else {
        ScoreBand::Filtered
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub filtered: usize,
}

impl ScoreDistribution {
    pub fn record(&mut self, band: ScoreBand) {
        match band {
            ScoreBand::High => self.high += 1,
            ScoreBand::Medium => self.medium += 1,
            ScoreBand::Low => self.low += 1,
            ScoreBand::Filtered => self.filtered += 1,
        }
    }

    pub fn merge(&mut self, other: &ScoreDistribution) {
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.filtered += other.filtered;
    }

    /// Number of components that were scored.
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.filtered
    }

    pub fn kept(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Noise-reduction pass over a component forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceFilter {
    pub enabled: bool,
    pub threshold: f64,
    pub mode: ScoringMode,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            mode: ScoringMode::TypeOnly,
        }
    }
}

impl RelevanceFilter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ScoringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Filter a forest, discarding the score distribution.
    pub fn apply(&self, components: Vec<Component>) -> Vec<Component> {
        let mut dist = ScoreDistribution::default();
        self.apply_with_stats(components, &mut dist)
    }

    /// Score and prune a forest top-down.
    ///
    /// Each kept component carries its score; its children are filtered in
    /// turn. A dropped component takes its whole subtree with it, so only
    /// components whose ancestors were all kept are ever scored. Returns the
    /// input untouched when the filter is disabled.
    pub fn apply_with_stats(
        &self,
        components: Vec<Component>,
        dist: &mut ScoreDistribution,
    ) -> Vec<Component> {
        if !self.enabled {
            return components;
        }

        let mut level = ScoreDistribution::default();
        let mut kept = Vec::with_capacity(components.len());

        for mut component in components {
            let value = score(&component, self.mode);
            component.relevance_score = Some(value);
            level.record(band(value, self.threshold));

            if value >= self.threshold {
                let children = std::mem::take(&mut component.children);
                component.children = self.apply_with_stats(children, dist);
                kept.push(component);
            }
        }

        debug!(
            high = level.high,
            medium = level.medium,
            low = level.low,
            filtered = level.filtered,
            threshold = self.threshold,
            "relevance filter pass"
        );

        dist.merge(&level);
        kept
    }
}
