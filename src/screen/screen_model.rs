use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::component_model::{Component, count_components};

/// Keyword-derived category of a screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenType {
    Authentication,
    Home,
    Dashboard,
    Profile,
    Settings,
    List,
    Detail,
    Form,
    Checkout,
    Cart,
    Search,
    Navigation,
    Modal,
    Error,
    Success,
    Loading,
    EmptyState,
    Onboarding,
    // Only produced from export snapshots
    TestManagement,
    ListView,
    #[default]
    General,
}

impl ScreenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenType::Authentication => "authentication",
            ScreenType::Home => "home",
            ScreenType::Dashboard => "dashboard",
            ScreenType::Profile => "profile",
            ScreenType::Settings => "settings",
            ScreenType::List => "list",
            ScreenType::Detail => "detail",
            ScreenType::Form => "form",
            ScreenType::Checkout => "checkout",
            ScreenType::Cart => "cart",
            ScreenType::Search => "search",
            ScreenType::Navigation => "navigation",
            ScreenType::Modal => "modal",
            ScreenType::Error => "error",
            ScreenType::Success => "success",
            ScreenType::Loading => "loading",
            ScreenType::EmptyState => "empty_state",
            ScreenType::Onboarding => "onboarding",
            ScreenType::TestManagement => "test_management",
            ScreenType::ListView => "list_view",
            ScreenType::General => "general",
        }
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level navigable surface and its filtered component forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub node_id: String,
    pub name: String,

    #[serde(default)]
    pub screen_type: ScreenType,

    #[serde(default)]
    pub components: Vec<Component>,

    /// Page name, dimensions, export provenance. Informational only.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Screen {
    pub fn component_count(&self) -> usize {
        count_components(&self.components)
    }

    /// Width and height recorded in metadata, when both are known.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        let width = self.metadata.get("width")?.as_f64()?;
        let height = self.metadata.get("height")?.as_f64()?;
        Some((width, height))
    }
}

/// Count all components across all screens.
pub fn count_screen_components(screens: &[Screen]) -> usize {
    screens.iter().map(Screen::component_count).sum()
}
