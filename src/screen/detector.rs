use crate::design::node_model::RawNode;
use crate::screen::screen_model::ScreenType;

const SCREEN_NODE_TYPES: [&str; 3] = ["FRAME", "COMPONENT", "COMPONENT_SET"];

/// Smallest plausible device viewport.
pub const MIN_SCREEN_WIDTH: f64 = 320.0;
pub const MIN_SCREEN_HEIGHT: f64 = 400.0;

const SCREEN_KEYWORDS: [&str; 10] = [
    "screen", "page", "view", "mobile", "desktop", "tablet", "home", "login", "dashboard",
    "profile",
];

// Order matters: earlier entries win when a name has several keywords.
const SCREEN_TYPE_KEYWORDS: [(&str, ScreenType); 21] = [
    ("login", ScreenType::Authentication),
    ("signin", ScreenType::Authentication),
    ("signup", ScreenType::Authentication),
    ("register", ScreenType::Authentication),
    ("home", ScreenType::Home),
    ("dashboard", ScreenType::Dashboard),
    ("profile", ScreenType::Profile),
    ("settings", ScreenType::Settings),
    ("list", ScreenType::List),
    ("detail", ScreenType::Detail),
    ("form", ScreenType::Form),
    ("checkout", ScreenType::Checkout),
    ("cart", ScreenType::Cart),
    ("search", ScreenType::Search),
    ("navigation", ScreenType::Navigation),
    ("modal", ScreenType::Modal),
    ("error", ScreenType::Error),
    ("success", ScreenType::Success),
    ("loading", ScreenType::Loading),
    ("empty", ScreenType::EmptyState),
    ("onboarding", ScreenType::Onboarding),
];

/// Whether a node looks like a screen.
///
/// Only frame-like nodes qualify, and then either a viewport-sized bounding
/// box or a screen-ish name is enough on its own.
pub fn is_screen(node: &RawNode) -> bool {
    if !SCREEN_NODE_TYPES.contains(&node.node_type.as_str()) {
        return false;
    }

    if node.width() >= MIN_SCREEN_WIDTH && node.height() >= MIN_SCREEN_HEIGHT {
        return true;
    }

    let name = node.name_or_empty().to_lowercase();
    SCREEN_KEYWORDS.iter().any(|kw| name.contains(kw))
}

pub fn screen_type(node: &RawNode) -> ScreenType {
    screen_type_for_name(node.name_or_empty())
}

pub fn screen_type_for_name(name: &str) -> ScreenType {
    let lower = name.to_lowercase();

    SCREEN_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(ScreenType::General)
}
