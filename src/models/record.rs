// file: src/models/record.rs
// description: fixed 37-column record of the comprehensive catalog feed
// reference: marketplace catalog ingestion template

use serde::Serialize;

pub const COLUMN_COUNT: usize = 37;

/// Display label and technical field name for every output column, in file order.
pub const COLUMNS: [(&str, &str); COLUMN_COUNT] = [
    ("Category", "family_id"),
    ("Shop sku", "shop_sku"),
    ("Titre du produit", "name"),
    ("Marque", "brand_id"),
    ("Description Longue", "description"),
    ("EAN", "ean"),
    ("Couleur commercial", "technical_spec_1_color"),
    ("Image principale", "media_1"),
    ("image secondaire", "media_2"),
    ("Image 3", "media_3"),
    ("Image 4", "media_4"),
    ("Image 5", "media_5"),
    ("Image 6", "media_6"),
    ("Image 7", "media_7"),
    ("Image 8", "media_8"),
    ("Image 9", "media_9"),
    ("Image_10", "media_10"),
    ("Produit Parent (identification)", "is_parent"),
    ("Id de rattachement", "variant_group_code"),
    ("Composition 1", "technical_spec_1_composition"),
    ("Composition 2", "technical_spec_2_composition"),
    ("Composition 3", "technical_spec_3_composition"),
    ("Conseil d'entretien", "technical_spec_1_care_advice"),
    ("Capacité", "technical_spec_1_capacity"),
    ("Dimensions", "technical_spec_1_dimensions"),
    ("DLC (Date limite de consommation)", "technical_spec_1_expiration_date"),
    ("DDM (Date de durabilité minimale)", "technical_spec_1_durability_date"),
    ("Ingrédients", "technical_spec_1_ingredients"),
    ("Poids net du produit", "technical_spec_1_net_weight"),
    ("Motif", "technical_spec_1_pattern"),
    ("Garantie commerciale", "technical_spec_1_commercial_warranty"),
    ("Eco-responsable", "technical_spec_1_eco_responsibility"),
    ("Métrage ? (oui /non)", "is_cloth"),
    ("Produit ou Service", "is_virtual"),
    ("BZC ( à ne pas remplir )", "is_bzc"),
    ("Poids du colis (kg)", "weight"),
    ("Taille unique", "size_id"),
];

pub const EAN_COLUMN: usize = 5;

pub fn display_headers() -> [&'static str; COLUMN_COUNT] {
    COLUMNS.map(|(display, _)| display)
}

pub fn technical_headers() -> [&'static str; COLUMN_COUNT] {
    COLUMNS.map(|(_, technical)| technical)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub category: String,
    pub shop_sku: String,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub ean: String,
    pub color: String,
    pub images: [String; 10],
    pub is_parent: String,
    pub attachment_id: String,
    pub compositions: [String; 3],
    pub care_advice: String,
    pub capacity: String,
    pub dimensions: String,
    pub dlc: String,
    pub ddm: String,
    pub ingredients: String,
    pub net_weight: String,
    pub pattern: String,
    pub commercial_warranty: String,
    pub eco_responsible: String,
    pub metrage: String,
    pub product_or_service: String,
    pub bzc: String,
    pub package_weight: String,
    pub size: String,
}

impl ExportRecord {
    /// Placeholder written for a requested EAN with no catalog match.
    pub fn not_found(ean: &str) -> Self {
        Self {
            ean: ean.to_string(),
            ..Self::default()
        }
    }

    pub fn to_row(&self) -> Vec<&str> {
        let mut row = Vec::with_capacity(COLUMN_COUNT);
        row.extend([
            self.category.as_str(),
            self.shop_sku.as_str(),
            self.title.as_str(),
            self.brand.as_str(),
            self.description.as_str(),
            self.ean.as_str(),
            self.color.as_str(),
        ]);
        row.extend(self.images.iter().map(String::as_str));
        row.extend([self.is_parent.as_str(), self.attachment_id.as_str()]);
        row.extend(self.compositions.iter().map(String::as_str));
        row.extend([
            self.care_advice.as_str(),
            self.capacity.as_str(),
            self.dimensions.as_str(),
            self.dlc.as_str(),
            self.ddm.as_str(),
            self.ingredients.as_str(),
            self.net_weight.as_str(),
            self.pattern.as_str(),
            self.commercial_warranty.as_str(),
            self.eco_responsible.as_str(),
            self.metrage.as_str(),
            self.product_or_service.as_str(),
            self.bzc.as_str(),
            self.package_weight.as_str(),
            self.size.as_str(),
        ]);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_has_fixed_width() {
        let record = ExportRecord::default();
        assert_eq!(record.to_row().len(), COLUMN_COUNT);
        assert_eq!(display_headers().len(), COLUMN_COUNT);
        assert_eq!(technical_headers().len(), COLUMN_COUNT);
    }

    #[test]
    fn test_not_found_row_only_carries_ean() {
        let record = ExportRecord::not_found("0000000000000");
        let row = record.to_row();

        assert_eq!(row[EAN_COLUMN], "0000000000000");
        assert_eq!(
            row.iter().enumerate().filter(|(i, v)| *i != EAN_COLUMN && !v.is_empty()).count(),
            0
        );
    }

    #[test]
    fn test_columns_line_up_with_fields() {
        let record = ExportRecord {
            capacity: "50 ml".to_string(),
            size: "Taille Unique".to_string(),
            images: std::array::from_fn(|i| format!("img{}", i + 1)),
            ..ExportRecord::default()
        };
        let row = record.to_row();
        let technical = technical_headers();

        let at = |name: &str| technical.iter().position(|t| *t == name).unwrap();
        assert_eq!(row[at("technical_spec_1_capacity")], "50 ml");
        assert_eq!(row[at("size_id")], "Taille Unique");
        assert_eq!(row[at("media_1")], "img1");
        assert_eq!(row[at("media_10")], "img10");
        assert_eq!(technical[EAN_COLUMN], "ean");
    }
}
