pub mod detector;
pub mod screen_model;
