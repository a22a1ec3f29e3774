// file: src/database/source.rs
// description: read-only catalog access seam shared by exports and lookups
// reference: internal data access contract

use crate::error::Result;
use crate::models::{AttributeSpec, CatalogRow};
use serde::Serialize;

pub const PRODUCTS_TABLE: &str = "produits";

/// Untyped result set; every value is rendered as text or NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: String,
    pub key: String,
}

/// Filters for the comprehensive export query. EANs are expected already cleaned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportQuery {
    pub eans: Vec<String>,
    pub limit: Option<usize>,
}

impl ExportQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_eans(mut self, eans: Vec<String>) -> Self {
        self.eans = eans;
        self
    }
}

/// The catalog as seen by this tool. One implementation talks to MySQL over a
/// single connection, another keeps rows in memory.
///
/// Methods take `&mut self`: statements are issued one after another on the
/// same handle.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;

    async fn count_products(&mut self) -> Result<u64>;

    /// Products whose EAN is neither NULL nor blank.
    async fn count_products_with_ean(&mut self) -> Result<u64>;

    async fn count_active_products(&mut self) -> Result<u64>;

    async fn sample_products(&mut self, limit: usize) -> Result<RowSet>;

    /// A page of `status = 'on'` products with every column of the table.
    async fn fetch_active_products(&mut self, limit: usize, offset: usize) -> Result<RowSet>;

    async fn find_products_by_ean(&mut self, ean: &str) -> Result<RowSet>;

    /// Products whose trimmed EAN contains `fragment`.
    async fn find_products_by_partial_ean(&mut self, fragment: &str) -> Result<RowSet>;

    /// Active products joined with group, brand and the ten gallery slots.
    async fn fetch_export_rows(&mut self, query: &ExportQuery) -> Result<Vec<CatalogRow>>;

    /// Raw values of matching characteristic bindings for a group, lowest
    /// position first, at most `spec.max_results`.
    async fn find_attribute_values(
        &mut self,
        group_id: i64,
        spec: &AttributeSpec,
    ) -> Result<Vec<String>>;
}
