// file: src/exporter/projector.rs
// description: maps a joined catalog row plus its characteristics to the 37-column record
// reference: marketplace catalog ingestion template

use crate::config::ExportConfig;
use crate::enrichment::{Enrichment, FallbackChain};
use crate::extractor::{CapacityExtractor, ExpirationExtractor, clean_html};
use crate::models::catalog_row::non_blank;
use crate::models::{CatalogRow, ExportRecord};

pub const UNKNOWN_BRAND: &str = "Marque inconnue";

pub struct RowProjector {
    cdn_base_url: String,
    capacity: CapacityExtractor,
    expiration: ExpirationExtractor,
    text_expiration_fallback: bool,
}

impl RowProjector {
    pub fn new(cdn_base_url: impl Into<String>) -> Self {
        Self {
            cdn_base_url: cdn_base_url.into(),
            capacity: CapacityExtractor::new(),
            expiration: ExpirationExtractor::new(),
            text_expiration_fallback: false,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.cdn_base_url.clone())
            .with_text_expiration_fallback(config.text_expiration_fallback)
    }

    pub fn with_text_expiration_fallback(mut self, enabled: bool) -> Self {
        self.text_expiration_fallback = enabled;
        self
    }

    pub fn project(&self, row: &CatalogRow, enrichment: &Enrichment) -> ExportRecord {
        let description = self.description(row);
        let group_name = non_blank(&row.group_name).unwrap_or("");

        let title = FallbackChain::new("title")
            .value("group name", group_name)
            .value("keywords", non_blank(&row.keywords).unwrap_or(""))
            .value(
                "legacy description",
                non_blank(&row.legacy_description).unwrap_or(""),
            )
            .resolve_or(&format!("Produit {}", row.product_id));

        let capacity = FallbackChain::new("capacity")
            .value("characteristic", enrichment.capacity.as_str())
            .then("group name", || self.capacity.extract(group_name))
            .then("description", || self.capacity.extract(&description))
            .resolve();

        let hints = if self.text_expiration_fallback
            && (enrichment.dlc.is_empty() || enrichment.ddm.is_empty())
        {
            self.expiration.extract(&description)
        } else {
            Default::default()
        };

        let dlc = FallbackChain::new("dlc")
            .value("characteristic", enrichment.dlc.as_str())
            .value("description", hints.dlc)
            .resolve();

        let ddm = FallbackChain::new("ddm")
            .value("characteristic", enrichment.ddm.as_str())
            .value("description", hints.ddm)
            .resolve();

        let net_weight = FallbackChain::new("net weight")
            .value("characteristic", enrichment.net_weight.as_str())
            .then("product weight", || positive_weight(row))
            .resolve();

        let mut images: [String; 10] = Default::default();
        for (url, image) in images.iter_mut().zip(row.gallery.iter()) {
            if let Some(image) = image {
                *url = image.url(&self.cdn_base_url);
            }
        }

        let is_parent = if row.enrichment_group_id().is_some() {
            "Oui"
        } else {
            "Non"
        };

        let product_or_service = if row.virtual_flag.as_deref() == Some("oui") {
            "Service"
        } else {
            "Produit"
        };

        ExportRecord {
            category: String::new(),
            shop_sku: row.reference.clone().unwrap_or_default(),
            title,
            brand: FallbackChain::new("brand")
                .value("brand", row.brand_name.clone().unwrap_or_default())
                .resolve_or(UNKNOWN_BRAND),
            description,
            ean: row.ean_trimmed().to_string(),
            color: enrichment.color.clone(),
            images,
            is_parent: is_parent.to_string(),
            attachment_id: row.variant_group_code.clone().unwrap_or_default(),
            compositions: enrichment.compositions.clone(),
            care_advice: enrichment.care_advice.clone(),
            capacity,
            dimensions: enrichment.dimensions.clone(),
            dlc,
            ddm,
            ingredients: enrichment.ingredients.clone(),
            net_weight,
            pattern: enrichment.pattern.clone(),
            commercial_warranty: String::new(),
            eco_responsible: "Non".to_string(),
            metrage: "Non".to_string(),
            product_or_service: product_or_service.to_string(),
            bzc: String::new(),
            package_weight: package_weight(row),
            size: map_size(row.size_code.as_deref()),
        }
    }

    /// Cleaned group description, else the cleaned product description.
    fn description(&self, row: &CatalogRow) -> String {
        FallbackChain::new("description")
            .then("group description", || {
                clean_html(row.group_description.as_deref().unwrap_or(""))
            })
            .then("product description", || {
                clean_html(row.product_description.as_deref().unwrap_or(""))
            })
            .resolve()
    }
}

/// Size code to marketplace size label.
pub fn map_size(code: Option<&str>) -> String {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return String::new();
    };

    match code {
        "T.U." | "T.U" => "Taille Unique".to_string(),
        _ => match code.strip_prefix("T.") {
            Some(size) => size.to_string(),
            None => code.to_string(),
        },
    }
}

fn positive_weight(row: &CatalogRow) -> String {
    match non_blank(&row.weight) {
        Some(weight) if weight.trim().parse::<f64>().is_ok_and(|w| w > 0.0) => {
            weight.trim().to_string()
        }
        _ => String::new(),
    }
}

fn package_weight(row: &CatalogRow) -> String {
    non_blank(&row.weight)
        .map(|weight| weight.trim().to_string())
        .unwrap_or_else(|| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COLUMN_COUNT, GalleryImage};
    use pretty_assertions::assert_eq;

    fn projector() -> RowProjector {
        RowProjector::new("https://cdn.example.com/i/tmp")
    }

    fn grouped_row() -> CatalogRow {
        let mut row = CatalogRow::new(17);
        row.reference = Some("SKU-17".to_string());
        row.ean = Some("3760000000017 ".to_string());
        row.group_id = Some(5);
        row.group_name = Some("Sérum éclat".to_string());
        row.group_description = Some("<p>Flacon de 30ml</p>".to_string());
        row.brand_name = Some("Maison Lune".to_string());
        row.weight = Some("0.25".to_string());
        row.size_code = Some("T.U.".to_string());
        row.variant_group_code = Some("VG-5".to_string());
        row
    }

    #[test]
    fn test_map_size() {
        assert_eq!(map_size(Some("T.U.")), "Taille Unique");
        assert_eq!(map_size(Some("T.U")), "Taille Unique");
        assert_eq!(map_size(Some("T.42")), "42");
        assert_eq!(map_size(Some("T.M")), "M");
        assert_eq!(map_size(Some("")), "");
        assert_eq!(map_size(None), "");
        assert_eq!(map_size(Some("XL")), "XL");
        assert_eq!(map_size(Some("T.")), "");
        assert_eq!(map_size(Some(" T. ")), "");
    }

    #[test]
    fn test_characteristic_capacity_beats_description() {
        let enrichment = Enrichment {
            capacity: "50 ml".to_string(),
            ..Enrichment::default()
        };
        let record = projector().project(&grouped_row(), &enrichment);
        assert_eq!(record.capacity, "50 ml");
    }

    #[test]
    fn test_capacity_falls_back_to_description() {
        let record = projector().project(&grouped_row(), &Enrichment::default());
        assert_eq!(record.capacity, "30 ml");
        assert_eq!(record.description, "Flacon de 30ml");
    }

    #[test]
    fn test_title_chain_and_defaults() {
        let mut row = CatalogRow::new(99);
        assert_eq!(projector().project(&row, &Enrichment::default()).title, "Produit 99");

        row.legacy_description = Some("Bougie".to_string());
        assert_eq!(projector().project(&row, &Enrichment::default()).title, "Bougie");

        row.keywords = Some("bougie parfumée".to_string());
        assert_eq!(
            projector().project(&row, &Enrichment::default()).title,
            "bougie parfumée"
        );

        let record = projector().project(&row, &Enrichment::default());
        assert_eq!(record.brand, UNKNOWN_BRAND);
        assert_eq!(record.is_parent, "Non");
        assert_eq!(record.product_or_service, "Produit");
        assert_eq!(record.package_weight, "0");
        assert_eq!(record.net_weight, "");
        assert_eq!(record.eco_responsible, "Non");
        assert_eq!(record.metrage, "Non");
    }

    #[test]
    fn test_grouped_row_projection() {
        let mut row = grouped_row();
        row.virtual_flag = Some("oui".to_string());
        row.gallery[0] = Some(GalleryImage::new(1001, "jpg"));
        row.gallery[2] = Some(GalleryImage::new(1003, "png"));

        let record = projector().project(&row, &Enrichment::default());

        assert_eq!(record.title, "Sérum éclat");
        assert_eq!(record.brand, "Maison Lune");
        assert_eq!(record.shop_sku, "SKU-17");
        assert_eq!(record.ean, "3760000000017");
        assert_eq!(record.is_parent, "Oui");
        assert_eq!(record.attachment_id, "VG-5");
        assert_eq!(record.product_or_service, "Service");
        assert_eq!(record.size, "Taille Unique");
        assert_eq!(record.net_weight, "0.25");
        assert_eq!(record.package_weight, "0.25");
        assert_eq!(record.images[0], "https://cdn.example.com/i/tmp/1001.jpg");
        assert_eq!(record.images[1], "");
        assert_eq!(record.images[2], "https://cdn.example.com/i/tmp/1003.png");
        assert!(record.images[3..].iter().all(String::is_empty));
        assert_eq!(record.to_row().len(), COLUMN_COUNT);
    }

    #[test]
    fn test_text_expiration_fallback_is_opt_in() {
        let mut row = grouped_row();
        row.group_description = Some("A consommer de préférence dans les 12 mois".to_string());

        let disabled = projector().project(&row, &Enrichment::default());
        assert_eq!(disabled.ddm, "");

        let enabled = projector()
            .with_text_expiration_fallback(true)
            .project(&row, &Enrichment::default());
        assert_eq!(enabled.ddm, "12 mois");
    }

    #[test]
    fn test_group_description_preferred() {
        let mut row = grouped_row();
        row.product_description = Some("Description produit".to_string());
        assert_eq!(
            projector().project(&row, &Enrichment::default()).description,
            "Flacon de 30ml"
        );

        row.group_description = Some("  ".to_string());
        assert_eq!(
            projector().project(&row, &Enrichment::default()).description,
            "Description produit"
        );
    }
}
