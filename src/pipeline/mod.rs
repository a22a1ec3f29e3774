// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: export orchestration

pub mod orchestrator;
pub mod progress;
pub mod reconcile;

pub use orchestrator::{ExportOrchestrator, ExportRequest, ExportSummary};
pub use progress::{ExportStats, ProgressTracker};
pub use reconcile::clean_ean_list;
