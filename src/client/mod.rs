pub mod cache;
pub mod figma;
