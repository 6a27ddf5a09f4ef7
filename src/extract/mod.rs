pub mod export_loader;
pub mod extractor;
