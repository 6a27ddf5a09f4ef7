use serde::{Deserialize, Serialize};

use crate::component::component_model::ComponentType;

/// Which keyword/fallback table set to classify with.
///
/// `Api` is used for trees fetched live from the design API, `Export` for
/// flattened JSON exports. The tables overlap but are not identical, and the
/// fallback for an unmapped native type differs (`unknown` vs `container`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierProfile {
    #[default]
    Api,
    Export,
}

type KeywordGroup = (ComponentType, &'static [&'static str]);

const API_KEYWORDS: &[KeywordGroup] = &[
    (ComponentType::Button, &["button", "btn", "cta"]),
    (ComponentType::Input, &["input", "field", "textbox", "text field"]),
    (ComponentType::Navigation, &["nav", "menu", "header", "footer"]),
    (ComponentType::Card, &["card", "tile"]),
    (ComponentType::Image, &["image", "img", "photo", "avatar"]),
    (ComponentType::Icon, &["icon", "ico"]),
    (ComponentType::Checkbox, &["checkbox", "check", "toggle", "switch"]),
    (ComponentType::Radio, &["radio", "option"]),
    (ComponentType::Dropdown, &["select", "dropdown", "picker"]),
    (ComponentType::Modal, &["modal", "dialog", "popup"]),
    (ComponentType::Tab, &["tab"]),
    (ComponentType::ListItem, &["list", "item"]),
];

const EXPORT_KEYWORDS: &[KeywordGroup] = &[
    (ComponentType::Button, &["button", "btn", "cta"]),
    (ComponentType::Input, &["input", "field", "textbox", "text field"]),
    (ComponentType::Navigation, &["nav", "menu", "sidebar"]),
    (ComponentType::Card, &["card", "tile", "paper"]),
    (ComponentType::Table, &["table", "tablehead", "tablecell", "tablerow"]),
    (ComponentType::Image, &["image", "img", "photo", "avatar"]),
    (ComponentType::Icon, &["icon", "ico", "filled"]),
    (ComponentType::Checkbox, &["checkbox", "check", "toggle", "switch"]),
    (ComponentType::Radio, &["radio", "option"]),
    (ComponentType::Dropdown, &["select", "dropdown", "picker"]),
    (ComponentType::Modal, &["modal", "dialog", "popup"]),
    (ComponentType::Tab, &["tab"]),
    (ComponentType::Chip, &["chip", "tag", "badge"]),
    (ComponentType::Progress, &["progress", "loading", "spinner"]),
    (ComponentType::Text, &["typography", "text", "label", "title", "heading"]),
    (ComponentType::Stepper, &["stepper", "step"]),
];

/// Classify a node into a semantic component type.
///
/// Name keywords win over the native type; groups are checked in table order
/// and the first group with any matching keyword decides.
pub fn classify(native_type: &str, name: &str, profile: ClassifierProfile) -> ComponentType {
    let keywords = match profile {
        ClassifierProfile::Api => API_KEYWORDS,
        ClassifierProfile::Export => EXPORT_KEYWORDS,
    };

    if let Some(kind) = match_keywords(name, keywords) {
        return kind;
    }

    match native_type {
        "FRAME" => ComponentType::Container,
        "GROUP" => ComponentType::Group,
        "COMPONENT" => ComponentType::Component,
        "COMPONENT_SET" => ComponentType::ComponentSet,
        "INSTANCE" => ComponentType::ComponentInstance,
        "TEXT" => ComponentType::Text,
        "RECTANGLE" => ComponentType::Rectangle,
        "ELLIPSE" => ComponentType::Ellipse,
        "LINE" => ComponentType::Line,
        "VECTOR" => ComponentType::Icon,
        "BOOLEAN_OPERATION" if profile == ClassifierProfile::Api => ComponentType::Shape,
        _ => match profile {
            ClassifierProfile::Api => ComponentType::Unknown,
            ClassifierProfile::Export => ComponentType::Container,
        },
    }
}

fn match_keywords(name: &str, groups: &[KeywordGroup]) -> Option<ComponentType> {
    let lower = name.to_lowercase();

    groups
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(kind, _)| *kind)
}
