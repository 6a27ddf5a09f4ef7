use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Semantic component model produced by the tree parser
// ============================================================================

/// Semantic category of a component. Never the raw native node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    // Interactive controls
    Button,
    Input,
    Textarea,
    Dropdown,
    Select,
    Checkbox,
    Radio,
    Toggle,
    Switch,
    Slider,

    // Structure
    Modal,
    Dialog,
    Form,
    Table,
    List,
    ListItem,
    Navigation,
    Card,
    Tab,
    Container,
    Frame,
    Group,
    Component,
    ComponentSet,
    ComponentInstance,

    // Content
    Text,
    Label,
    Heading,
    Paragraph,
    Image,
    Icon,
    Link,
    Chip,
    Progress,
    Stepper,

    // Decoration
    Rectangle,
    Ellipse,
    Circle,
    Line,
    Shape,
    Polygon,
    Vector,
    Divider,
    Spacer,
    Separator,
    Background,
    Overlay,

    Unknown,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Button => "button",
            ComponentType::Input => "input",
            ComponentType::Textarea => "textarea",
            ComponentType::Dropdown => "dropdown",
            ComponentType::Select => "select",
            ComponentType::Checkbox => "checkbox",
            ComponentType::Radio => "radio",
            ComponentType::Toggle => "toggle",
            ComponentType::Switch => "switch",
            ComponentType::Slider => "slider",
            ComponentType::Modal => "modal",
            ComponentType::Dialog => "dialog",
            ComponentType::Form => "form",
            ComponentType::Table => "table",
            ComponentType::List => "list",
            ComponentType::ListItem => "list_item",
            ComponentType::Navigation => "navigation",
            ComponentType::Card => "card",
            ComponentType::Tab => "tab",
            ComponentType::Container => "container",
            ComponentType::Frame => "frame",
            ComponentType::Group => "group",
            ComponentType::Component => "component",
            ComponentType::ComponentSet => "component_set",
            ComponentType::ComponentInstance => "component_instance",
            ComponentType::Text => "text",
            ComponentType::Label => "label",
            ComponentType::Heading => "heading",
            ComponentType::Paragraph => "paragraph",
            ComponentType::Image => "image",
            ComponentType::Icon => "icon",
            ComponentType::Link => "link",
            ComponentType::Chip => "chip",
            ComponentType::Progress => "progress",
            ComponentType::Stepper => "stepper",
            ComponentType::Rectangle => "rectangle",
            ComponentType::Ellipse => "ellipse",
            ComponentType::Circle => "circle",
            ComponentType::Line => "line",
            ComponentType::Shape => "shape",
            ComponentType::Polygon => "polygon",
            ComponentType::Vector => "vector",
            ComponentType::Divider => "divider",
            ComponentType::Spacer => "spacer",
            ComponentType::Separator => "separator",
            ComponentType::Background => "background",
            ComponentType::Overlay => "overlay",
            ComponentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized attributes pulled from a raw node. Absent when not applicable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_background: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_interactions: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_properties: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Value>,

    /// Native type carried over by the export loader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_type: Option<String>,
}

impl ComponentProperties {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn is_interactive(&self) -> bool {
        self.has_interactions.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A semantically typed UI element and its owned subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub node_id: String,
    pub name: String,
    pub component_type: ComponentType,

    /// Set by the relevance filter; absent until scoring runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,

    #[serde(default)]
    pub properties: ComponentProperties,

    #[serde(default)]
    pub position: Position,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

impl Component {
    pub fn new(node_id: &str, name: &str, component_type: ComponentType) -> Self {
        Self {
            node_id: node_id.to_string(),
            name: name.to_string(),
            component_type,
            relevance_score: None,
            properties: ComponentProperties::default(),
            position: Position::default(),
            children: vec![],
        }
    }

    pub fn with_children(mut self, children: Vec<Component>) -> Self {
        self.children = children;
        self
    }

    /// Number of components in this subtree, including self.
    pub fn subtree_size(&self) -> usize {
        1 + count_components(&self.children)
    }
}

/// Count every component in a forest.
pub fn count_components(components: &[Component]) -> usize {
    components.iter().map(Component::subtree_size).sum()
}
