// file: src/pipeline/reconcile.rs
// description: EAN list cleanup and FOUND / NOT FOUND partitioning
// reference: requested EAN order drives the output order

use crate::models::CatalogRow;
use std::collections::{HashMap, HashSet};

/// Trims codes, drops blanks and keeps the first occurrence of duplicates.
pub fn clean_ean_list<I, T>(eans: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut seen = HashSet::new();
    eans.into_iter()
        .map(|ean| ean.as_ref().trim().to_string())
        .filter(|ean| !ean.is_empty())
        .filter(|ean| seen.insert(ean.clone()))
        .collect()
}

/// Keeps the first row per product id, preserving order.
pub fn dedup_by_product(rows: Vec<CatalogRow>) -> Vec<CatalogRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.product_id))
        .collect()
}

#[derive(Debug, Default)]
pub struct Partition {
    /// Rows grouped under the requested EAN they matched, in request order.
    pub found: Vec<(String, Vec<CatalogRow>)>,
    pub not_found: Vec<String>,
}

impl Partition {
    pub fn found_rows(&self) -> usize {
        self.found.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn found_eans(&self) -> usize {
        self.found.len()
    }
}

/// Splits the requested EANs by whether any exported row carries them.
/// Codes compare case-insensitively, as the catalog collation does.
pub fn partition_by_ean(requested: &[String], rows: Vec<CatalogRow>) -> Partition {
    let mut by_ean: HashMap<String, Vec<CatalogRow>> = HashMap::new();
    for row in rows {
        by_ean
            .entry(row.ean_trimmed().to_ascii_lowercase())
            .or_default()
            .push(row);
    }

    let mut partition = Partition::default();
    for ean in requested {
        match by_ean.remove(&ean.to_ascii_lowercase()) {
            Some(rows) => partition.found.push((ean.clone(), rows)),
            None => partition.not_found.push(ean.clone()),
        }
    }

    partition
}
