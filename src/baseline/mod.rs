pub mod baseline_model;
pub mod matcher;
