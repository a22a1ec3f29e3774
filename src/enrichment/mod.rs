// file: src/enrichment/mod.rs
// description: characteristic enrichment module exports
// reference: internal module structure

pub mod fallback;
pub mod lookup;

pub use fallback::FallbackChain;
pub use lookup::{CharacteristicLookup, Enrichment};
