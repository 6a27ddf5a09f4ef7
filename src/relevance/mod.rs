pub mod filter;
pub mod scorer;
