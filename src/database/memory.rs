// file: src/database/memory.rs
// description: in-memory catalog for offline runs and tests
// reference: mirrors the MySQL query semantics of database::query

use crate::database::source::{CatalogSource, ColumnInfo, ExportQuery, PRODUCTS_TABLE, RowSet};
use crate::error::{ExportError, Result};
use crate::models::{AttributeSpec, CatalogRow, GALLERY_SLOTS, GalleryImage};

const PRODUCT_COLUMNS: [&str; 8] = [
    "idproduit",
    "ref",
    "ean",
    "prix",
    "status",
    "idproduit_group",
    "description_fr",
    "poids",
];

#[derive(Debug, Clone, Default)]
pub struct MemoryProduct {
    pub id: i64,
    pub reference: Option<String>,
    pub ean: Option<String>,
    pub status: String,
    pub group_id: Option<i64>,
    pub price: Option<String>,
    pub keywords: Option<String>,
    pub legacy_description: Option<String>,
    pub description: Option<String>,
    pub weight: Option<String>,
    pub size_code: Option<String>,
    pub virtual_flag: Option<String>,
    pub variant_group_code: Option<String>,
}

impl MemoryProduct {
    pub fn active(id: i64, ean: &str) -> Self {
        Self {
            id,
            reference: Some(format!("REF-{}", id)),
            ean: Some(ean.to_string()),
            status: "on".to_string(),
            ..Self::default()
        }
    }

    pub fn in_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    fn is_active(&self) -> bool {
        self.status == "on"
    }

    fn column_values(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            self.reference.clone(),
            self.ean.clone(),
            self.price.clone(),
            Some(self.status.clone()),
            self.group_id.map(|id| id.to_string()),
            self.description.clone(),
            self.weight.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGroup {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct MemoryGalleryImage {
    pub group_id: i64,
    pub position: usize,
    pub image_id: i64,
    pub extension: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct MemoryCharacteristic {
    pub group_id: i64,
    pub key: String,
    pub value: Option<String>,
    pub position: i32,
    pub binding_status: String,
    pub characteristic_status: String,
}

impl MemoryCharacteristic {
    pub fn new(group_id: i64, key: &str, value: &str, position: i32) -> Self {
        Self {
            group_id,
            key: key.to_string(),
            value: Some(value.to_string()),
            position,
            binding_status: "on".to_string(),
            characteristic_status: "on".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    pub products: Vec<MemoryProduct>,
    pub groups: Vec<MemoryGroup>,
    pub brands: Vec<(i64, String)>,
    pub gallery: Vec<MemoryGalleryImage>,
    pub characteristics: Vec<MemoryCharacteristic>,
    /// Makes every characteristic query fail, as a broken connection would.
    pub fail_attribute_queries: bool,
    attribute_queries: usize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute_queries(&self) -> usize {
        self.attribute_queries
    }

    pub fn add_image(&mut self, group_id: i64, position: usize, image_id: i64, extension: &str) {
        self.gallery.push(MemoryGalleryImage {
            group_id,
            position,
            image_id,
            extension: extension.to_string(),
            status: "on".to_string(),
        });
    }

    fn product_rowset<'a>(&self, products: impl Iterator<Item = &'a MemoryProduct>) -> RowSet {
        let mut rowset = RowSet::new(PRODUCT_COLUMNS.iter().map(|c| c.to_string()).collect());
        rowset.rows = products.map(MemoryProduct::column_values).collect();
        rowset
    }

    fn catalog_row(&self, product: &MemoryProduct) -> CatalogRow {
        let group = product
            .group_id
            .and_then(|id| self.groups.iter().find(|g| g.id == id));

        let brand_name = group
            .and_then(|g| g.brand_id)
            .and_then(|brand_id| self.brands.iter().find(|(id, _)| *id == brand_id))
            .map(|(_, name)| name.clone());

        let mut gallery: [Option<GalleryImage>; GALLERY_SLOTS] = Default::default();
        if let Some(group) = group {
            for (slot, image) in gallery.iter_mut().enumerate() {
                *image = self
                    .gallery
                    .iter()
                    .find(|g| g.group_id == group.id && g.position == slot && g.status == "on")
                    .map(|g| GalleryImage::new(g.image_id, g.extension.clone()));
            }
        }

        CatalogRow {
            product_id: product.id,
            reference: product.reference.clone(),
            ean: product.ean.clone(),
            group_id: product.group_id,
            keywords: product.keywords.clone(),
            legacy_description: product.legacy_description.clone(),
            product_description: product.description.clone(),
            weight: product.weight.clone(),
            size_code: product.size_code.clone(),
            virtual_flag: product.virtual_flag.clone(),
            variant_group_code: product.variant_group_code.clone(),
            group_name: group.and_then(|g| g.name.clone()),
            group_description: group.and_then(|g| g.description.clone()),
            brand_name,
            gallery,
        }
    }
}

impl CatalogSource for InMemoryCatalog {
    async fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(vec![
            "caracteristiques".to_string(),
            "dictionnaires_langues".to_string(),
            PRODUCTS_TABLE.to_string(),
            "produits_gallery".to_string(),
            "produits_group".to_string(),
            "produits_group_caracteristiques".to_string(),
            "produits_marque".to_string(),
        ])
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        if table != PRODUCTS_TABLE {
            return Ok(Vec::new());
        }

        Ok(PRODUCT_COLUMNS
            .iter()
            .map(|name| ColumnInfo {
                name: name.to_string(),
                data_type: if *name == "idproduit" { "int(11)" } else { "varchar(255)" }
                    .to_string(),
                nullable: if *name == "idproduit" { "NO" } else { "YES" }.to_string(),
                key: if *name == "idproduit" { "PRI" } else { "" }.to_string(),
            })
            .collect())
    }

    async fn count_products(&mut self) -> Result<u64> {
        Ok(self.products.len() as u64)
    }

    async fn count_products_with_ean(&mut self) -> Result<u64> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.ean.as_deref().is_some_and(|e| !e.trim().is_empty()))
            .count() as u64)
    }

    async fn count_active_products(&mut self) -> Result<u64> {
        Ok(self.products.iter().filter(|p| p.is_active()).count() as u64)
    }

    async fn sample_products(&mut self, limit: usize) -> Result<RowSet> {
        Ok(self.product_rowset(self.products.iter().take(limit)))
    }

    async fn fetch_active_products(&mut self, limit: usize, offset: usize) -> Result<RowSet> {
        Ok(self.product_rowset(
            self.products
                .iter()
                .filter(|p| p.is_active())
                .skip(offset)
                .take(limit),
        ))
    }

    async fn find_products_by_ean(&mut self, ean: &str) -> Result<RowSet> {
        Ok(self.product_rowset(
            self.products
                .iter()
                .filter(|p| p.ean.as_deref() == Some(ean)),
        ))
    }

    async fn find_products_by_partial_ean(&mut self, fragment: &str) -> Result<RowSet> {
        Ok(self.product_rowset(
            self.products
                .iter()
                .filter(|p| p.ean.as_deref().is_some_and(|e| e.trim().contains(fragment))),
        ))
    }

    async fn fetch_export_rows(&mut self, query: &ExportQuery) -> Result<Vec<CatalogRow>> {
        let mut products: Vec<&MemoryProduct> = self
            .products
            .iter()
            .filter(|p| p.is_active())
            .filter(|p| {
                query.eans.is_empty()
                    || p.ean
                        .as_deref()
                        .is_some_and(|e| {
                            query.eans.iter().any(|q| q.eq_ignore_ascii_case(e.trim_end()))
                        })
            })
            .collect();

        products.sort_by_key(|p| p.id);

        if let Some(limit) = query.limit {
            products.truncate(limit);
        }

        Ok(products.into_iter().map(|p| self.catalog_row(p)).collect())
    }

    async fn find_attribute_values(
        &mut self,
        group_id: i64,
        spec: &AttributeSpec,
    ) -> Result<Vec<String>> {
        self.attribute_queries += 1;

        if self.fail_attribute_queries {
            return Err(ExportError::Validation(
                "characteristic query failed".to_string(),
            ));
        }

        let mut matches: Vec<&MemoryCharacteristic> = self
            .characteristics
            .iter()
            .filter(|c| c.group_id == group_id)
            .filter(|c| c.binding_status == "on" && c.characteristic_status == "on")
            .filter(|c| spec.matches_key(&c.key))
            .filter(|c| c.value.as_deref().is_some_and(|v| spec.accepts_value(v)))
            .collect();

        matches.sort_by_key(|c| c.position);

        Ok(matches
            .into_iter()
            .take(spec.max_results)
            .filter_map(|c| c.value.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attribute;

    #[tokio::test]
    async fn test_export_rows_skip_inactive_products() {
        let mut catalog = InMemoryCatalog::new();
        catalog.products.push(MemoryProduct::active(1, "111"));
        catalog
            .products
            .push(MemoryProduct::active(2, "222").with_status("off"));

        let rows = catalog.fetch_export_rows(&ExportQuery::all()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, 1);
    }

    #[tokio::test]
    async fn test_ean_filter_ignores_case_and_trailing_spaces() {
        let mut catalog = InMemoryCatalog::new();
        catalog.products.push(MemoryProduct::active(1, "12345ABC  "));
        catalog.products.push(MemoryProduct::active(2, "999"));

        let query = ExportQuery::all().with_eans(vec!["12345abc".to_string()]);
        let rows = catalog.fetch_export_rows(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, 1);
    }

    #[tokio::test]
    async fn test_attribute_values_order_by_position() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .characteristics
            .push(MemoryCharacteristic::new(7, "Capacité", "100 ml", 5));
        catalog
            .characteristics
            .push(MemoryCharacteristic::new(7, "Contenance", "50 ml", 2));

        let values = catalog
            .find_attribute_values(7, &Attribute::Capacity.spec())
            .await
            .unwrap();
        assert_eq!(values, vec!["50 ml".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_bindings_are_ignored() {
        let mut catalog = InMemoryCatalog::new();
        let mut disabled = MemoryCharacteristic::new(7, "DLC", "10 jours", 1);
        disabled.characteristic_status = "off".to_string();
        catalog.characteristics.push(disabled);

        let values = catalog
            .find_attribute_values(7, &Attribute::Dlc.spec())
            .await
            .unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_gallery_slots_follow_positions() {
        let mut catalog = InMemoryCatalog::new();
        catalog.products.push(MemoryProduct::active(1, "111").in_group(9));
        catalog.groups.push(MemoryGroup {
            id: 9,
            ..MemoryGroup::default()
        });
        catalog.add_image(9, 0, 500, "jpg");
        catalog.add_image(9, 3, 503, "png");

        let rows = catalog.fetch_export_rows(&ExportQuery::all()).await.unwrap();
        let gallery = &rows[0].gallery;
        assert_eq!(gallery[0], Some(GalleryImage::new(500, "jpg")));
        assert_eq!(gallery[1], None);
        assert_eq!(gallery[3], Some(GalleryImage::new(503, "png")));
    }

    #[tokio::test]
    async fn test_disabled_gallery_image_leaves_slot_empty() {
        let mut catalog = InMemoryCatalog::new();
        catalog.products.push(MemoryProduct::active(1, "111").in_group(9));
        catalog.groups.push(MemoryGroup {
            id: 9,
            ..MemoryGroup::default()
        });
        catalog.add_image(9, 0, 500, "jpg");
        catalog.add_image(9, 1, 501, "jpg");
        catalog.gallery[1].status = "off".to_string();

        let rows = catalog.fetch_export_rows(&ExportQuery::all()).await.unwrap();
        assert_eq!(rows[0].gallery[0], Some(GalleryImage::new(500, "jpg")));
        assert_eq!(rows[0].gallery[1], None);
    }
}
