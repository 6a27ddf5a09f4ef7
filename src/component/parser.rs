use crate::component::classifier::{ClassifierProfile, classify};
use crate::component::component_model::Component;
use crate::component::properties::{extract_position, extract_properties};
use crate::design::node_model::RawNode;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Figma-specific artifacts with no UI meaning.
pub const SKIP_TYPES: [&str; 4] = ["SLICE", "STICKY", "SHAPE_WITH_TEXT", "CONNECTOR"];

/// Recursively parse a raw node into a component tree.
///
/// Returns `None` for skipped node types and for anything deeper than
/// `max_depth`. Truncation is silent: a too-deep subtree simply disappears.
pub fn parse_tree(
    node: &RawNode,
    depth: usize,
    max_depth: usize,
    profile: ClassifierProfile,
) -> Option<Component> {
    if depth > max_depth {
        return None;
    }

    if SKIP_TYPES.contains(&node.node_type.as_str()) {
        return None;
    }

    let name = node.name.as_deref().unwrap_or("Unnamed");

    let children = node
        .children
        .iter()
        .filter_map(|child| parse_tree(child, depth + 1, max_depth, profile))
        .collect();

    Some(Component {
        node_id: node.id.clone(),
        name: name.to_string(),
        component_type: classify(&node.node_type, name, profile),
        relevance_score: None,
        properties: extract_properties(node),
        position: extract_position(node),
        children,
    })
}
