// file: src/models/catalog_row.rs
// description: one product joined with its group, brand and gallery slots
// reference: produits / produits_group / produits_marque / produits_gallery

use serde::Serialize;

pub const GALLERY_SLOTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub image_id: i64,
    pub extension: String,
}

impl GalleryImage {
    pub fn new(image_id: i64, extension: impl Into<String>) -> Self {
        Self {
            image_id,
            extension: extension.into(),
        }
    }

    pub fn url(&self, cdn_base_url: &str) -> String {
        format!(
            "{}/{}.{}",
            cdn_base_url.trim_end_matches('/'),
            self.image_id,
            self.extension
        )
    }
}

/// Raw column values of the comprehensive export query, before any fallback is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub product_id: i64,
    pub reference: Option<String>,
    pub ean: Option<String>,
    pub group_id: Option<i64>,
    pub keywords: Option<String>,
    pub legacy_description: Option<String>,
    pub product_description: Option<String>,
    pub weight: Option<String>,
    pub size_code: Option<String>,
    pub virtual_flag: Option<String>,
    pub variant_group_code: Option<String>,
    pub group_name: Option<String>,
    pub group_description: Option<String>,
    pub brand_name: Option<String>,
    /// Indexed by gallery position 0..=9.
    pub gallery: [Option<GalleryImage>; GALLERY_SLOTS],
}

impl CatalogRow {
    pub fn new(product_id: i64) -> Self {
        Self {
            product_id,
            ..Self::default()
        }
    }

    /// Group id usable for characteristic lookups; zero and negative ids count as absent.
    pub fn enrichment_group_id(&self) -> Option<i64> {
        self.group_id.filter(|id| *id > 0)
    }

    pub fn ean_trimmed(&self) -> &str {
        self.ean.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Empty or whitespace-only strings count as missing.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
}
