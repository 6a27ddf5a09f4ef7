use crate::component::component_model::{ComponentProperties, Position};
use crate::design::node_model::RawNode;

/// Pull the normalized property bag out of a raw node.
pub fn extract_properties(node: &RawNode) -> ComponentProperties {
    let mut props = ComponentProperties::default();

    if node.node_type == "TEXT" {
        props.text = Some(node.characters.clone().unwrap_or_default());
        if let Some(style) = &node.style {
            props.font_size = style.font_size;
            props.font_weight = style.font_weight;
        }
    }

    props.visible = Some(node.visible.unwrap_or(true));
    props.opacity = node.opacity;

    if let Some(fills) = node.fills.as_ref().filter(|f| !f.is_empty()) {
        props.has_background = Some(true);
        let first = &fills[0];
        if first.paint_type == "SOLID" {
            props.background_color = first.color.clone();
        }
    }

    // An empty interaction list still counts as present
    if let Some(interactions) = &node.interactions {
        props.has_interactions = Some(true);
        props.interaction_count = Some(interactions.len());
    }

    props.component_properties = node.component_properties.clone();
    props.constraints = node.constraints.clone();

    props
}

/// Bounding box of a raw node, each field 0 when the node has no bounds.
pub fn extract_position(node: &RawNode) -> Position {
    match &node.absolute_bounding_box {
        Some(b) => Position {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        },
        None => Position::default(),
    }
}
