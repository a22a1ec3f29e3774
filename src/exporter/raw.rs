// file: src/exporter/raw.rs
// description: table listing, products overview, batched raw export and EAN search
// reference: produits table dumps in their stored column layout

use crate::database::{CatalogSource, ColumnInfo, RowSet};
use crate::error::Result;
use crate::exporter::csv_sink::CsvSink;
use crate::exporter::{file_size, output_path};
use crate::extractor::clean_html;
use crate::pipeline::ProgressTracker;
use crate::utils::OperationTimer;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ALL_PRODUCTS_PREFIX: &str = "all_products";
pub const EAN_SEARCH_PREFIX: &str = "ean_search_results";
const OVERVIEW_SAMPLE_ROWS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ProductsOverview {
    pub columns: Vec<ColumnInfo>,
    pub total_products: u64,
    pub products_with_ean: u64,
    pub samples: RowSet,
}

impl ProductsOverview {
    pub fn ean_percentage(&self) -> f64 {
        percentage(self.products_with_ean as usize, self.total_products as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawExportOptions {
    pub batch_size: usize,
    pub max_products: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawExportResult {
    pub path: PathBuf,
    pub rows: usize,
    pub batches: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchKind {
    Exact,
    Partial,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EanMatch {
    pub ean: String,
    pub kind: MatchKind,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EanSearchResult {
    pub matches: Vec<EanMatch>,
    /// Unique products across every searched EAN, first occurrence kept.
    pub products: RowSet,
    pub path: Option<PathBuf>,
}

pub struct RawExporter<'a, S> {
    source: &'a mut S,
    output_dir: PathBuf,
    colored: bool,
}

impl<'a, S: CatalogSource> RawExporter<'a, S> {
    pub fn new(source: &'a mut S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub async fn list_tables(&mut self) -> Result<Vec<String>> {
        let tables = self.source.list_tables().await?;
        info!("Found {} tables", tables.len());
        Ok(tables)
    }

    pub async fn describe_products(&mut self) -> Result<ProductsOverview> {
        let columns = self.source.describe_table(crate::database::source::PRODUCTS_TABLE).await?;
        let total_products = self.source.count_products().await?;
        let products_with_ean = self.source.count_products_with_ean().await?;
        let samples = self.source.sample_products(OVERVIEW_SAMPLE_ROWS).await?;

        Ok(ProductsOverview {
            columns,
            total_products,
            products_with_ean,
            samples,
        })
    }

    /// Dumps active products page by page into `all_products_<ts>.csv`.
    pub async fn export_products(
        &mut self,
        options: RawExportOptions,
        timestamp: &str,
    ) -> Result<RawExportResult> {
        let timer = OperationTimer::new("raw products export");

        let active = self.source.count_active_products().await? as usize;
        let total = options.max_products.map_or(active, |max| max.min(active));
        info!(
            "Exporting {} products in batches of {}",
            total, options.batch_size
        );

        let path = output_path(&self.output_dir, ALL_PRODUCTS_PREFIX, timestamp);
        let mut sink = CsvSink::create(&path)?;
        let progress = ProgressTracker::with_color(total, self.colored);

        let mut offset = 0;
        let mut exported = 0;
        let mut header_written = false;

        while offset < total {
            let page_size = options.batch_size.min(total - offset);
            let mut page = self.source.fetch_active_products(page_size, offset).await?;

            if !header_written {
                sink.write_header(&page.columns)?;
                header_written = true;
            }

            if page.is_empty() {
                break;
            }

            clean_description_columns(&mut page);
            for row in &page.rows {
                sink.write_values(row)?;
            }

            exported += page.len();
            offset += options.batch_size;
            progress.inc_batches();
            progress.inc_rows_written(page.len());
            info!(
                "Progress: {}/{} ({:.1}%)",
                exported,
                total,
                percentage(exported, total)
            );
        }

        if !header_written {
            let columns: Vec<String> = self
                .source
                .describe_table(crate::database::source::PRODUCTS_TABLE)
                .await?
                .into_iter()
                .map(|c| c.name)
                .collect();
            sink.write_header(&columns)?;
        }

        let batches = progress.get_stats().batches;
        progress.finish();
        let rows = sink.finish()?;
        timer.finish_with_count(rows);

        Ok(RawExportResult {
            bytes: file_size(&path),
            path,
            rows,
            batches,
        })
    }

    /// Exact match per EAN, falling back to a trimmed substring match.
    pub async fn search_by_ean(&mut self, eans: &[String], timestamp: &str) -> Result<EanSearchResult> {
        let mut matches = Vec::with_capacity(eans.len());
        let mut products: Option<RowSet> = None;
        let mut seen = HashSet::new();

        for ean in eans {
            info!("Searching EAN: {}", ean);

            let mut found = self.source.find_products_by_ean(ean).await?;
            let mut kind = MatchKind::Exact;

            if found.is_empty() {
                found = self.source.find_products_by_partial_ean(ean).await?;
                kind = MatchKind::Partial;
            }

            if found.is_empty() {
                warn!("No matches found for EAN {}", ean);
                kind = MatchKind::Missing;
            }

            matches.push(EanMatch {
                ean: ean.clone(),
                kind,
                count: found.len(),
            });

            let id_index = found.column_index("idproduit");
            let collected = products.get_or_insert_with(|| RowSet::new(found.columns.clone()));
            for row in found.rows {
                let id = id_index.and_then(|i| row.get(i).cloned().flatten());
                if id.is_none() || seen.insert(id) {
                    collected.rows.push(row);
                }
            }
        }

        let mut products = products.unwrap_or_default();
        if products.is_empty() {
            return Ok(EanSearchResult {
                matches,
                products,
                path: None,
            });
        }

        clean_description_columns(&mut products);
        let path = output_path(&self.output_dir, EAN_SEARCH_PREFIX, timestamp);
        write_rowset(&path, &products)?;
        info!("Exported {} unique products to {}", products.len(), path.display());

        Ok(EanSearchResult {
            matches,
            products,
            path: Some(path),
        })
    }
}

fn write_rowset(path: &Path, rows: &RowSet) -> Result<usize> {
    let mut sink = CsvSink::create(path)?;
    sink.write_header(&rows.columns)?;
    for row in &rows.rows {
        sink.write_values(row)?;
    }
    sink.finish()
}

/// Runs every column whose name mentions a description through `clean_html`.
fn clean_description_columns(rows: &mut RowSet) {
    let indexes: Vec<usize> = rows
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| name.to_lowercase().contains("description"))
        .map(|(index, _)| index)
        .collect();

    for row in &mut rows.rows {
        for &index in &indexes {
            if let Some(Some(value)) = row.get_mut(index) {
                *value = clean_html(value);
            }
        }
    }
}

pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
