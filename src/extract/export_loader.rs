use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::component::classifier::{ClassifierProfile, classify};
use crate::component::component_model::{Component, ComponentProperties};
use crate::error::ExtractError;
use crate::screen::screen_model::{Screen, ScreenType};

// ============================================================================
// Flattened JSON export snapshot
// ============================================================================

/// A pre-exported snapshot: a flat list of `{id, text}` entries where `text`
/// reads like `"Frame 75 (FRAME)"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSnapshot {
    #[serde(default)]
    pub components: Vec<ExportEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub text: String,
}

/// Name and native type parsed from an entry's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub name: String,
    pub native_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_components: usize,
    pub type_breakdown: BTreeMap<String, usize>,
    pub screens_detected: usize,
    pub screen_names: Vec<String>,
}

/// Entries needed under a frame before it is treated as a screen.
pub const MIN_SCREEN_CHILDREN: usize = 3;

/// Children are assumed to have ids numbered just after their screen.
pub const CHILD_ID_WINDOW: u64 = 100;

static COMPONENT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\(([A-Z_]+)\)$").expect("valid regex"));

static SCREEN_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\d{2,3}$",
        r"^\d+\.\d+",
        r"(?i)^Screen[\s_-]?\d+",
        r"(?i)^Page[\s_-]?\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const SCREEN_NAME_KEYWORDS: [&str; 10] = [
    "login", "dashboard", "home", "settings", "profile", "detail", "list", "form", "modal",
    "popup",
];

const DISPLAY_PREFIXES: [&str; 6] = ["Typography ", "Cell ", "Head ", "Button ", "Chip ", "Text "];

const SCREEN_CONTENT_RULES: [(ScreenType, &[&str]); 7] = [
    (
        ScreenType::Authentication,
        &["login", "sign in", "signin", "email", "password"],
    ),
    (
        ScreenType::Dashboard,
        &["dashboard", "overview", "analytics", "metrics"],
    ),
    (
        ScreenType::TestManagement,
        &["test suite", "test case", "testing"],
    ),
    (
        ScreenType::Settings,
        &["settings", "preferences", "configuration"],
    ),
    (ScreenType::Profile, &["profile", "account", "user"]),
    (ScreenType::ListView, &["table", "list", "grid"]),
    (
        ScreenType::Form,
        &["form", "create", "add new", "edit", "stepper"],
    ),
];

/// Parse `"Name (TYPE)"`; text that does not match becomes the name with
/// type `UNKNOWN`.
pub fn parse_component_text(text: &str) -> ParsedText {
    match COMPONENT_TEXT.captures(text.trim()) {
        Some(caps) => ParsedText {
            name: caps[1].trim().to_string(),
            native_type: caps[2].trim().to_string(),
        },
        None => ParsedText {
            name: text.to_string(),
            native_type: "UNKNOWN".to_string(),
        },
    }
}

/// Numbered (`001`, `1.2`, `Screen_03`, `Page 2`) or well-known screen names.
pub fn is_screen_name(name: &str) -> bool {
    if SCREEN_NAME_PATTERNS.iter().any(|re| re.is_match(name)) {
        return true;
    }

    let lower = name.to_lowercase();
    SCREEN_NAME_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Human-readable text of an entry, with one design-system prefix removed.
pub fn display_text(text: &str) -> String {
    let parsed = parse_component_text(text);

    DISPLAY_PREFIXES
        .iter()
        .find_map(|prefix| parsed.name.strip_prefix(prefix))
        .map(str::to_string)
        .unwrap_or(parsed.name)
}

/// Infer a screen type from the raw text of its entries.
pub fn screen_type_from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> ScreenType {
    let all_text = texts.into_iter().collect::<Vec<_>>().join(" ").to_lowercase();

    SCREEN_CONTENT_RULES
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| all_text.contains(t)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ScreenType::General)
}

impl ExportSnapshot {
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
            context: "export snapshot".to_string(),
            source,
        })
    }

    /// Detect screens and collect their entries as flat component lists.
    ///
    /// Screens are top-level FRAMEs with screen-like names, one per id;
    /// results are sorted by screen name.
    pub fn extract_screens(&self) -> Vec<Screen> {
        let mut seen = BTreeSet::new();
        let mut screens: Vec<Screen> = self
            .components
            .iter()
            .filter(|entry| is_top_level_screen(entry))
            .filter(|entry| seen.insert(entry.id.clone()))
            .filter_map(|entry| self.build_screen(entry))
            .collect();

        screens.sort_by(|a, b| a.name.cmp(&b.name));
        screens
    }

    pub fn summary(&self) -> ExportSummary {
        let mut type_breakdown = BTreeMap::new();
        for entry in &self.components {
            let parsed = parse_component_text(&entry.text);
            *type_breakdown.entry(parsed.native_type).or_insert(0) += 1;
        }

        let screens = self.extract_screens();

        ExportSummary {
            total_components: self.components.len(),
            type_breakdown,
            screens_detected: screens.len(),
            screen_names: screens.into_iter().map(|s| s.name).collect(),
        }
    }

    fn build_screen(&self, screen_entry: &ExportEntry) -> Option<Screen> {
        let screen_id = &screen_entry.id;
        let Some((prefix, number)) = split_node_id(screen_id) else {
            warn!(id = %screen_id, "screen id is not <prefix>:<number>, skipping");
            return None;
        };

        let children: Vec<&ExportEntry> = self
            .components
            .iter()
            .filter(|entry| entry.id != *screen_id)
            .filter(|entry| {
                if entry.id.starts_with(&format!("I{}", screen_id)) {
                    return true;
                }
                match split_node_id(&entry.id) {
                    Some((p, n)) => p == prefix && number < n && n < number + CHILD_ID_WINDOW,
                    None => false,
                }
            })
            .collect();

        if children.len() < MIN_SCREEN_CHILDREN {
            return None;
        }

        let components: Vec<Component> = children
            .iter()
            .map(|child| {
                let parsed = parse_component_text(&child.text);
                let mut component = Component::new(
                    &child.id,
                    &parsed.name,
                    classify(&parsed.native_type, &parsed.name, ClassifierProfile::Export),
                );
                component.properties = ComponentProperties {
                    text: Some(display_text(&child.text)),
                    figma_type: Some(parsed.native_type),
                    ..ComponentProperties::default()
                };
                component
            })
            .collect();

        let screen_name = parse_component_text(&screen_entry.text).name;

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), Value::from("json_export"));
        metadata.insert("original_name".to_string(), Value::from(screen_name.as_str()));
        metadata.insert("component_count".to_string(), Value::from(components.len()));

        Some(Screen {
            node_id: screen_id.clone(),
            name: format!("Screen {}", screen_name),
            screen_type: screen_type_from_texts(children.iter().map(|c| c.text.as_str())),
            components,
            metadata,
        })
    }
}

fn is_top_level_screen(entry: &ExportEntry) -> bool {
    let nested = entry.id.starts_with('I') || entry.id.contains(';');
    if nested {
        return false;
    }

    let parsed = parse_component_text(&entry.text);
    parsed.native_type == "FRAME" && is_screen_name(&parsed.name)
}

/// `"217:4605"` → `("217", 4605)`; anything after a second `:` is ignored.
fn split_node_id(id: &str) -> Option<(&str, u64)> {
    let mut parts = id.split(':');
    let prefix = parts.next()?;
    let number = parts.next()?.parse().ok()?;
    Some((prefix, number))
}
