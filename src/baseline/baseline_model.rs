use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ExtractError;

// ============================================================================
// Baseline library of known UI-pattern test scenarios
// ============================================================================

/// A reusable test scenario template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub title: String,

    #[serde(default = "default_priority")]
    pub priority: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps_template: Vec<String>,

    /// Any other keys are kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_priority() -> String {
    "medium".to_string()
}

/// Scenarios for one component type, grouped by category in file order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComponentBaseline {
    #[serde(default, deserialize_with = "ordered_map")]
    pub test_scenarios: Vec<(String, Vec<Scenario>)>,
}

impl ComponentBaseline {
    /// All scenarios with categories flattened, in file order.
    pub fn all_scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.test_scenarios.iter().flat_map(|(_, list)| list.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionCriteria {
    #[serde(default)]
    pub screen_name_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScreenPattern {
    #[serde(default)]
    pub detection_criteria: DetectionCriteria,

    #[serde(default)]
    pub test_scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Baseline {
    /// Keyed by semantic component type (`button`, `input`, ...)
    #[serde(default)]
    pub ui_components: BTreeMap<String, ComponentBaseline>,

    /// Kept in file order; keyword matching takes the first hit
    #[serde(default, deserialize_with = "ordered_map")]
    pub screen_patterns: Vec<(String, ScreenPattern)>,
}

impl Baseline {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(content).map_err(|source| ExtractError::JsonParse {
            context: "baseline".to_string(),
            source,
        })
    }

    /// Load a baseline, treating a missing or broken file as "no baseline".
    pub fn load_optional(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "baseline file not found");
            return None;
        }

        match Self::from_path(path) {
            Ok(baseline) => Some(baseline),
            Err(e) => {
                warn!(error = %e, "could not load baseline");
                None
            }
        }
    }
}

/// Deserialize a JSON object into `(key, value)` pairs, preserving order.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::new();
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}
