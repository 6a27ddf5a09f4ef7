pub mod loader;
pub mod node_model;
