#![allow(dead_code)]

use design_extract::component::component_model::{Component, ComponentType};
use design_extract::design::node_model::RawNode;

// ============================================================================
// Shared builders
// ============================================================================

pub fn frame(id: &str, name: &str, width: f64, height: f64) -> RawNode {
    RawNode::new(id, "FRAME", name).with_size(width, height)
}

pub fn text_node(id: &str, text: &str) -> RawNode {
    let mut node = RawNode::new(id, "TEXT", text);
    node.characters = Some(text.to_string());
    node
}

pub fn canvas(id: &str, name: &str, children: Vec<RawNode>) -> RawNode {
    RawNode::new(id, "CANVAS", name).with_children(children)
}

pub fn document(children: Vec<RawNode>) -> RawNode {
    RawNode::new("0:0", "DOCUMENT", "Document").with_children(children)
}

/// The login screen used throughout: a text, a rectangle and a button.
pub fn login_document() -> RawNode {
    let screen = frame("1:1", "Login Screen", 375.0, 812.0).with_children(vec![
        text_node("1:2", "Welcome"),
        RawNode::new("1:3", "RECTANGLE", "Rectangle 1"),
        RawNode::new("1:4", "INSTANCE", "Login Button"),
    ]);

    document(vec![canvas("0:1", "Page 1", vec![screen])])
}

pub fn component(id: &str, kind: ComponentType) -> Component {
    Component::new(id, id, kind)
}

pub fn names(components: &[Component]) -> Vec<&str> {
    components.iter().map(|c| c.name.as_str()).collect()
}
