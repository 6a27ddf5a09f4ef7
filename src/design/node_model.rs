use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Raw design-tree input (design API / exported file JSON)
// ============================================================================

/// A single node of a design document as returned by the design API.
///
/// Every field is optional in the wire format; missing data is defaulted
/// here or by the extractors, never reported as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Native node type (FRAME, TEXT, CANVAS, ...)
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub node_type: String,

    #[serde(default)]
    pub visible: Option<bool>,

    #[serde(default)]
    pub opacity: Option<f64>,

    #[serde(default)]
    pub fills: Option<Vec<Paint>>,

    #[serde(default)]
    pub absolute_bounding_box: Option<BoundingBox>,

    #[serde(default)]
    pub interactions: Option<Vec<Value>>,

    #[serde(default)]
    pub component_properties: Option<Value>,

    #[serde(default)]
    pub constraints: Option<Value>,

    /// Text content of TEXT nodes
    #[serde(default)]
    pub characters: Option<String>,

    #[serde(default)]
    pub style: Option<TypeStyle>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<RawNode>,
}

/// Explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A fill entry. Only the paint type and solid color are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(rename = "type", default)]
    pub paint_type: String,

    #[serde(default)]
    pub color: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_size: Option<f64>,

    #[serde(default)]
    pub font_weight: Option<f64>,
}

/// Top-level response of `GET /files/:key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignFile {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub last_modified: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    pub document: RawNode,
}

impl RawNode {
    pub fn new(id: &str, node_type: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            node_type: node_type.to_string(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        let bounds = self.absolute_bounding_box.get_or_insert_with(BoundingBox::default);
        bounds.width = width;
        bounds.height = height;
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }

    /// Name as written in the file, empty when absent.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn width(&self) -> f64 {
        self.absolute_bounding_box.as_ref().map_or(0.0, |b| b.width)
    }

    pub fn height(&self) -> f64 {
        self.absolute_bounding_box.as_ref().map_or(0.0, |b| b.height)
    }
}
