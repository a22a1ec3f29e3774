// file: src/pipeline/orchestrator.rs
// description: coordinates the comprehensive export from query to csv files
// reference: query, enrich, project and write, strictly in sequence

use crate::config::ExportConfig;
use crate::database::{CatalogSource, ExportQuery};
use crate::enrichment::CharacteristicLookup;
use crate::error::{ExportError, Result};
use crate::exporter::csv_sink::CsvSink;
use crate::exporter::json::{ExportManifest, write_manifest};
use crate::exporter::projector::RowProjector;
use crate::exporter::raw::percentage;
use crate::exporter::output_path;
use crate::models::{CatalogRow, ExportRecord};
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::reconcile::{clean_ean_list, dedup_by_product, partition_by_ean};
use crate::utils::{OperationTimer, Validator};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{info, warn};

pub const PRODUCTS_PREFIX: &str = "comprehensive_products";
pub const FOUND_PREFIX: &str = "comprehensive_ean_found";
pub const NOT_FOUND_PREFIX: &str = "comprehensive_ean_not_found";

/// What to export: every active product, the first `limit` of them, or the
/// products carrying the listed EANs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    pub limit: Option<usize>,
    pub eans: Option<Vec<String>>,
}

impl ExportRequest {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn sample(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            eans: None,
        }
    }

    pub fn by_eans<I, T>(eans: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            limit: None,
            eans: Some(eans.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub rows_written: usize,
    pub products_exported: usize,
    pub requested_eans: usize,
    pub found_eans: usize,
    pub not_found_eans: usize,
    pub duration_secs: f64,
}

impl ExportSummary {
    pub fn found_percentage(&self) -> f64 {
        percentage(self.found_eans, self.requested_eans)
    }

    pub fn not_found_percentage(&self) -> f64 {
        percentage(self.not_found_eans, self.requested_eans)
    }

    pub fn is_filtered(&self) -> bool {
        self.requested_eans > 0
    }
}

pub struct ExportOrchestrator<'a, S> {
    source: &'a mut S,
    config: ExportConfig,
    projector: RowProjector,
    colored: bool,
}

impl<'a, S: CatalogSource> ExportOrchestrator<'a, S> {
    pub fn new(source: &'a mut S, config: ExportConfig) -> Self {
        let projector = RowProjector::from_config(&config);
        Self {
            source,
            config,
            projector,
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub async fn run(&mut self, request: &ExportRequest, timestamp: &str) -> Result<ExportSummary> {
        let timer = OperationTimer::new("comprehensive export");

        let eans = match &request.eans {
            Some(raw) => {
                let cleaned = clean_ean_list(raw);
                if cleaned.is_empty() {
                    return Err(ExportError::Validation(
                        "no valid EAN codes provided".to_string(),
                    ));
                }
                info!("Filtering on {} EAN code(s)", cleaned.len());
                Some(cleaned)
            }
            None => None,
        };

        Validator::ensure_output_dir(&self.config.output_dir)?;

        let query = ExportQuery::all()
            .with_limit(request.limit)
            .with_eans(eans.clone().unwrap_or_default());

        let rows = dedup_by_product(self.source.fetch_export_rows(&query).await?);
        info!("Fetched {} products for export", rows.len());

        let mut summary = match eans {
            None => self.write_all(rows, timestamp).await?,
            Some(eans) => self.write_partitioned(&eans, rows, timestamp).await?,
        };

        if self.config.write_manifest {
            if let Some(first) = summary.files.first().cloned() {
                let manifest_path = {
                    let manifest = ExportManifest::new(&summary.files, &summary);
                    write_manifest(&first, &manifest)?
                };
                summary.manifest = Some(manifest_path);
            }
        }

        summary.duration_secs = timer.finish_with_count(summary.rows_written).as_secs_f64();
        Ok(summary)
    }

    async fn write_all(&mut self, rows: Vec<CatalogRow>, timestamp: &str) -> Result<ExportSummary> {
        let path = output_path(&self.config.output_dir, PRODUCTS_PREFIX, timestamp);
        let mut sink = CsvSink::create(&path)?;
        sink.write_catalog_headers()?;

        let progress = ProgressTracker::with_color(rows.len(), self.colored);
        self.write_enriched(&mut sink, &rows, &progress).await?;
        progress.finish();
        log_throughput(&progress);

        let rows_written = sink.finish()?;
        info!("Wrote {} rows to {}", rows_written, path.display());

        Ok(ExportSummary {
            files: vec![path],
            rows_written,
            products_exported: rows_written,
            ..ExportSummary::default()
        })
    }

    async fn write_partitioned(
        &mut self,
        eans: &[String],
        rows: Vec<CatalogRow>,
        timestamp: &str,
    ) -> Result<ExportSummary> {
        let partition = partition_by_ean(eans, rows);

        let found_path = output_path(&self.config.output_dir, FOUND_PREFIX, timestamp);
        let mut found_sink = CsvSink::create(&found_path)?;
        found_sink.write_catalog_headers()?;

        let progress = ProgressTracker::with_color(partition.found_rows(), self.colored);
        for (_, rows) in &partition.found {
            self.write_enriched(&mut found_sink, rows, &progress).await?;
        }
        progress.finish();
        log_throughput(&progress);
        let products_exported = found_sink.finish()?;

        let not_found_path = output_path(&self.config.output_dir, NOT_FOUND_PREFIX, timestamp);
        let mut not_found_sink = CsvSink::create(&not_found_path)?;
        not_found_sink.write_catalog_headers()?;
        for ean in &partition.not_found {
            not_found_sink.write_record(&ExportRecord::not_found(ean))?;
        }
        let placeholders = not_found_sink.finish()?;

        if !partition.not_found.is_empty() {
            warn!("{} EAN code(s) not found in the catalog", partition.not_found.len());
        }

        Ok(ExportSummary {
            files: vec![found_path, not_found_path],
            rows_written: products_exported + placeholders,
            products_exported,
            requested_eans: eans.len(),
            found_eans: partition.found_eans(),
            not_found_eans: partition.not_found.len(),
            ..ExportSummary::default()
        })
    }

    /// Enriches and writes rows one at a time; each product's lookups finish
    /// before the next product starts.
    async fn write_enriched(
        &mut self,
        sink: &mut CsvSink<File>,
        rows: &[CatalogRow],
        progress: &ProgressTracker,
    ) -> Result<()> {
        let mut lookup = CharacteristicLookup::new(&mut *self.source);

        for row in rows {
            let enrichment = lookup.enrich(row).await;
            if row.enrichment_group_id().is_some() {
                progress.inc_rows_enriched();
            }

            sink.write_record(&self.projector.project(row, &enrichment))?;
            progress.inc_rows_written(1);
        }

        Ok(())
    }
}

fn log_throughput(progress: &ProgressTracker) {
    let stats = progress.get_stats();
    info!(
        "Enriched {} of {} rows ({:.1} rows/s)",
        stats.rows_enriched,
        stats.rows_written,
        stats.rows_per_second()
    );
}
