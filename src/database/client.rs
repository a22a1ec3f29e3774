// file: src/database/client.rs
// description: MySQL catalog client over a single sqlx connection
// reference: https://docs.rs/sqlx

use crate::config::DatabaseConfig;
use crate::database::query;
use crate::database::source::{CatalogSource, ColumnInfo, ExportQuery, PRODUCTS_TABLE, RowSet};
use crate::error::{ExportError, Result};
use crate::models::{AttributeSpec, CatalogRow, GALLERY_SLOTS, GalleryImage};
use crate::utils::OperationTimer;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::time::Duration;
use tracing::{debug, info};

const SLOW_EXPORT_QUERY: Duration = Duration::from_secs(60);

pub struct MySqlCatalog {
    connection: MySqlConnection,
    config: DatabaseConfig,
    product_columns: Option<Vec<String>>,
}

impl MySqlCatalog {
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to MySQL at {}:{}/{}",
            config.host, config.port, config.name
        );

        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.name);

        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let timeout = Duration::from_secs(config.connect_timeout_secs.max(1));
        let connection = tokio::time::timeout(timeout, options.connect())
            .await
            .map_err(|_| {
                ExportError::Connection(format!(
                    "timed out after {}s connecting to {}",
                    timeout.as_secs(),
                    config.host
                ))
            })?
            .map_err(|e| ExportError::Connection(e.to_string()))?;

        info!("Connected to database: {}", config.name);

        Ok(Self {
            connection,
            config,
            product_columns: None,
        })
    }

    pub fn database_name(&self) -> &str {
        &self.config.name
    }

    pub async fn ping(&mut self) -> Result<()> {
        debug!("Checking MySQL connection");
        self.connection
            .ping()
            .await
            .map_err(|e| ExportError::Connection(e.to_string()))
    }

    pub async fn close(self) -> Result<()> {
        self.connection
            .close()
            .await
            .map_err(|e| ExportError::Connection(e.to_string()))?;
        info!("Database connection closed");
        Ok(())
    }

    /// Column names of the products table, fetched once per connection.
    async fn product_columns(&mut self) -> Result<Vec<String>> {
        if let Some(columns) = &self.product_columns {
            return Ok(columns.clone());
        }

        let columns: Vec<String> = self
            .describe_table(PRODUCTS_TABLE)
            .await?
            .into_iter()
            .map(|column| column.name)
            .collect();

        if columns.is_empty() {
            return Err(ExportError::Validation(format!(
                "table {} has no columns or does not exist",
                PRODUCTS_TABLE
            )));
        }

        self.product_columns = Some(columns.clone());
        Ok(columns)
    }

    async fn count(&mut self, sql: &str) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(sql)
            .fetch_one(&mut self.connection)
            .await?;
        Ok(total.max(0) as u64)
    }
}

fn rows_to_rowset(columns: Vec<String>, rows: &[MySqlRow]) -> Result<RowSet> {
    let mut rowset = RowSet::new(columns);

    for row in rows {
        let mut values = Vec::with_capacity(rowset.columns.len());
        for index in 0..rowset.columns.len() {
            values.push(row.try_get::<Option<String>, _>(index)?);
        }
        rowset.rows.push(values);
    }

    Ok(rowset)
}

fn decode_catalog_row(row: &MySqlRow) -> Result<CatalogRow> {
    let mut gallery: [Option<GalleryImage>; GALLERY_SLOTS] = Default::default();

    for (slot, image) in gallery.iter_mut().enumerate() {
        let image_id: Option<i64> = row.try_get(format!("image_{}", slot).as_str())?;
        let extension: Option<String> = row.try_get(format!("ext_{}", slot).as_str())?;

        *image = image_id.map(|id| GalleryImage::new(id, extension.unwrap_or_default()));
    }

    Ok(CatalogRow {
        product_id: row.try_get("product_id")?,
        reference: row.try_get("reference")?,
        ean: row.try_get("ean")?,
        group_id: row.try_get("group_id")?,
        keywords: row.try_get("keywords")?,
        legacy_description: row.try_get("legacy_description")?,
        product_description: row.try_get("product_description")?,
        weight: row.try_get("weight")?,
        size_code: row.try_get("size_code")?,
        virtual_flag: row.try_get("virtual_flag")?,
        variant_group_code: row.try_get("variant_group_code")?,
        group_name: row.try_get("group_name")?,
        group_description: row.try_get("group_description")?,
        brand_name: row.try_get("brand_name")?,
        gallery,
    })
}

impl CatalogSource for MySqlCatalog {
    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(query::LIST_TABLES)
            .fetch_all(&mut self.connection)
            .await?;
        Ok(tables)
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = sqlx::query(query::DESCRIBE_TABLE)
            .bind(table)
            .fetch_all(&mut self.connection)
            .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo> {
                Ok(ColumnInfo {
                    name: row.try_get("name")?,
                    data_type: row.try_get("data_type")?,
                    nullable: row.try_get("nullable")?,
                    key: row
                        .try_get::<Option<String>, _>("column_key")?
                        .unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn count_products(&mut self) -> Result<u64> {
        self.count(query::COUNT_PRODUCTS).await
    }

    async fn count_products_with_ean(&mut self) -> Result<u64> {
        self.count(query::COUNT_PRODUCTS_WITH_EAN).await
    }

    async fn count_active_products(&mut self) -> Result<u64> {
        self.count(query::COUNT_ACTIVE_PRODUCTS).await
    }

    async fn sample_products(&mut self, limit: usize) -> Result<RowSet> {
        let columns = self.product_columns().await?;
        let sql = query::sample_products(&columns);

        let rows = sqlx::query(&sql)
            .bind(limit as u64)
            .fetch_all(&mut self.connection)
            .await?;

        rows_to_rowset(columns, &rows)
    }

    async fn fetch_active_products(&mut self, limit: usize, offset: usize) -> Result<RowSet> {
        let columns = self.product_columns().await?;
        let sql = query::active_products_page(&columns);

        debug!("Fetching products page limit={} offset={}", limit, offset);
        let rows = sqlx::query(&sql)
            .bind(limit as u64)
            .bind(offset as u64)
            .fetch_all(&mut self.connection)
            .await?;

        rows_to_rowset(columns, &rows)
    }

    async fn find_products_by_ean(&mut self, ean: &str) -> Result<RowSet> {
        let columns = self.product_columns().await?;
        let sql = query::products_by_ean(&columns);

        let rows = sqlx::query(&sql)
            .bind(ean)
            .fetch_all(&mut self.connection)
            .await?;

        rows_to_rowset(columns, &rows)
    }

    async fn find_products_by_partial_ean(&mut self, fragment: &str) -> Result<RowSet> {
        let columns = self.product_columns().await?;
        let sql = query::products_by_partial_ean(&columns);

        let rows = sqlx::query(&sql)
            .bind(query::like_contains(fragment))
            .fetch_all(&mut self.connection)
            .await?;

        rows_to_rowset(columns, &rows)
    }

    async fn fetch_export_rows(&mut self, export_query: &ExportQuery) -> Result<Vec<CatalogRow>> {
        let timer = OperationTimer::new("catalog export query");
        let sql = query::export_rows(export_query);

        let mut statement = sqlx::query(&sql);
        for ean in &export_query.eans {
            statement = statement.bind(ean.as_str());
        }

        let rows = statement.fetch_all(&mut self.connection).await?;
        timer.warn_if_slow(SLOW_EXPORT_QUERY, "export join");
        timer.finish_with_count(rows.len());

        rows.iter().map(decode_catalog_row).collect()
    }

    async fn find_attribute_values(
        &mut self,
        group_id: i64,
        spec: &AttributeSpec,
    ) -> Result<Vec<String>> {
        let (sql, patterns) = query::attribute_values(spec);

        let mut statement = sqlx::query_scalar::<_, String>(&sql).bind(group_id);
        for pattern in patterns {
            statement = statement.bind(pattern);
        }
        if let Some(min_len) = spec.min_len {
            statement = statement.bind(min_len as u64);
        }
        statement = statement.bind(spec.max_results as u64);

        let values = statement.fetch_all(&mut self.connection).await?;
        Ok(values)
    }
}
