pub mod classifier;
pub mod component_model;
pub mod parser;
pub mod properties;
