// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod database;
pub mod enrichment;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod shell;
pub mod utils;

pub use config::{Config, DatabaseConfig, ExportConfig};
pub use database::{CatalogSource, ExportQuery, InMemoryCatalog, MySqlCatalog, RowSet};
pub use enrichment::{CharacteristicLookup, Enrichment, FallbackChain};
pub use error::{ExportError, Result};
pub use exporter::{CsvSink, RawExporter, RowProjector};
pub use extractor::{CapacityExtractor, ExpirationExtractor, clean_html};
pub use models::{Attribute, AttributeSpec, CatalogRow, ExportRecord};
pub use pipeline::{
    ExportOrchestrator, ExportRequest, ExportSummary, ProgressTracker, clean_ean_list,
};
pub use shell::Shell;
pub use utils::{OperationTimer, Validator};
