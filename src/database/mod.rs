// file: src/database/mod.rs
// description: database operations module exports
// reference: internal module structure

pub mod client;
pub mod memory;
pub mod query;
pub mod source;

pub use client::MySqlCatalog;
pub use memory::InMemoryCatalog;
pub use source::{CatalogSource, ColumnInfo, ExportQuery, RowSet};
