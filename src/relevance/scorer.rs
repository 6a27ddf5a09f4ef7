use serde::{Deserialize, Serialize};

use crate::component::component_model::{Component, ComponentType};

pub const MAX_SCORE: f64 = 100.0;

/// Score given to types in no bucket under weighted scoring.
pub const UNLISTED_TYPE_SCORE: f64 = 15.0;

/// How a component's relevance is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// The type's bucket value floored at 0. Text, interactions, visibility
    /// and opacity have no effect.
    #[default]
    TypeOnly,

    /// Bucket value plus text, interaction, visibility and opacity
    /// adjustments, clamped to [0, 100].
    Weighted,
}

/// Bucket a type belongs to. Types in no bucket score 0 (type-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBucket {
    Critical,
    Important,
    Content,
    Decorative,
}

/// Fixed base value of a component type and its bucket.
pub fn base_score(kind: ComponentType) -> Option<(ScoreBucket, f64)> {
    use ComponentType as T;
    use ScoreBucket::*;

    let entry = match kind {
        T::Button => (Critical, 90.0),
        T::Input | T::Textarea => (Critical, 85.0),
        T::Dropdown | T::Select => (Critical, 80.0),
        T::Checkbox | T::Radio | T::Toggle | T::Switch => (Critical, 75.0),
        T::Slider => (Critical, 70.0),

        T::Modal | T::Dialog => (Important, 65.0),
        T::Form | T::Table => (Important, 60.0),
        T::List | T::Navigation => (Important, 55.0),
        T::Card => (Important, 50.0),
        T::Container => (Important, 40.0),
        T::Frame => (Important, 35.0),
        T::Group => (Important, 30.0),

        T::Text | T::Label | T::Paragraph => (Content, 20.0),
        T::Heading | T::Image => (Content, 25.0),
        T::Icon => (Content, 15.0),
        T::Link => (Content, 40.0),

        T::Rectangle
        | T::Ellipse
        | T::Circle
        | T::Line
        | T::Shape
        | T::Polygon
        | T::Spacer
        | T::Background => (Decorative, -50.0),
        T::Vector => (Decorative, -40.0),
        T::Divider | T::Separator => (Decorative, -20.0),
        T::Overlay => (Decorative, -30.0),

        _ => return None,
    };

    Some(entry)
}

/// Relevance of a component in [0, 100]. Higher means more test-worthy.
pub fn score(component: &Component, mode: ScoringMode) -> f64 {
    match mode {
        ScoringMode::TypeOnly => type_score(component.component_type),
        ScoringMode::Weighted => weighted_score(component),
    }
}

fn type_score(kind: ComponentType) -> f64 {
    base_score(kind).map_or(0.0, |(_, value)| value.max(0.0))
}

const PLACEHOLDER_TOKENS: [&str; 6] = ["icon", "btn", "<", ">", "[", "]"];

fn weighted_score(component: &Component) -> f64 {
    let kind = component.component_type;
    let props = &component.properties;
    let mut score = base_score(kind).map_or(UNLISTED_TYPE_SCORE, |(_, value)| value);

    let text = props.text.as_deref().map(str::trim).unwrap_or("");
    let text_len = text.chars().count();

    if text_len > 5 {
        score += (text_len / 3).min(20) as f64;
    }
    if text_len > 0 {
        let lower = text.to_lowercase();
        if PLACEHOLDER_TOKENS.iter().any(|t| lower.contains(t)) {
            score -= 5.0;
        }
    }

    if matches!(kind, ComponentType::Container | ComponentType::Frame | ComponentType::Group)
        && text_len == 0
    {
        score -= 10.0;
    }

    if props.is_interactive() {
        score += 25.0;
    }

    if !props.is_visible() {
        score -= 50.0;
    }

    if props.opacity.is_some_and(|o| o < 0.3) {
        score -= 15.0;
    }

    score.clamp(0.0, MAX_SCORE)
}
