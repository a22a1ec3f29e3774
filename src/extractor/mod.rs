// file: src/extractor/mod.rs
// description: text extraction module exports
// reference: internal module structure

pub mod capacity;
pub mod expiration;
pub mod html;
pub mod patterns;

pub use capacity::CapacityExtractor;
pub use expiration::{ExpirationExtractor, ExpirationHints};
pub use html::clean_html;
