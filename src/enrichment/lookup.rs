// file: src/enrichment/lookup.rs
// description: per-group characteristic lookups for the comprehensive export
// reference: produits_group_caracteristiques -> caracteristiques -> dictionnaires_langues

use crate::database::CatalogSource;
use crate::models::{Attribute, CatalogRow};
use serde::Serialize;
use tracing::{debug, warn};

/// Characteristic values found for one product group. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub capacity: String,
    pub dlc: String,
    pub ddm: String,
    pub ingredients: String,
    pub color: String,
    pub care_advice: String,
    pub compositions: [String; 3],
    pub net_weight: String,
    pub pattern: String,
    pub dimensions: String,
}

pub struct CharacteristicLookup<'a, S> {
    source: &'a mut S,
}

impl<'a, S: CatalogSource> CharacteristicLookup<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }

    /// Best value for `attribute`, or `""` when the group is absent, nothing
    /// matches or the query fails.
    pub async fn lookup(&mut self, group_id: Option<i64>, attribute: Attribute) -> String {
        self.lookup_all(group_id, attribute)
            .await
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Cleaned values in binding order, at most the attribute's result limit.
    pub async fn lookup_all(&mut self, group_id: Option<i64>, attribute: Attribute) -> Vec<String> {
        let Some(group_id) = group_id.filter(|id| *id > 0) else {
            return Vec::new();
        };

        let spec = attribute.spec();
        match self.source.find_attribute_values(group_id, &spec).await {
            Ok(values) => values
                .iter()
                .map(|value| spec.clean_value(value))
                .filter(|value| !value.is_empty())
                .take(spec.max_results)
                .collect(),
            Err(e) => {
                warn!(
                    "Failed to look up {} for group {}: {}",
                    attribute.label(),
                    group_id,
                    e
                );
                Vec::new()
            }
        }
    }

    /// All characteristic fields of the export for one joined row.
    pub async fn enrich(&mut self, row: &CatalogRow) -> Enrichment {
        let group_id = row.enrichment_group_id();
        if group_id.is_none() {
            debug!("Product {} has no group, skipping characteristics", row.product_id);
            return Enrichment::default();
        }

        let mut compositions: [String; 3] = Default::default();
        for (slot, value) in compositions
            .iter_mut()
            .zip(self.lookup_all(group_id, Attribute::Composition).await)
        {
            *slot = value;
        }

        Enrichment {
            capacity: self.lookup(group_id, Attribute::Capacity).await,
            dlc: self.lookup(group_id, Attribute::Dlc).await,
            ddm: self.lookup(group_id, Attribute::Ddm).await,
            ingredients: self.lookup(group_id, Attribute::Ingredients).await,
            color: self.lookup(group_id, Attribute::Color).await,
            care_advice: self.lookup(group_id, Attribute::CareAdvice).await,
            compositions,
            net_weight: self.lookup(group_id, Attribute::NetWeight).await,
            pattern: self.lookup(group_id, Attribute::Pattern).await,
            dimensions: self.lookup(group_id, Attribute::Dimensions).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{InMemoryCatalog, MemoryCharacteristic};
    use pretty_assertions::assert_eq;

    fn catalog_with(characteristics: Vec<MemoryCharacteristic>) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.characteristics = characteristics;
        catalog
    }

    #[tokio::test]
    async fn test_lowest_position_wins() {
        let mut catalog = catalog_with(vec![
            MemoryCharacteristic::new(4, "Capacité", "100 ml", 5),
            MemoryCharacteristic::new(4, "Capacité", "50 ml", 2),
        ]);

        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Capacity)
            .await;
        assert_eq!(value, "50 ml");
    }

    #[tokio::test]
    async fn test_absent_group_issues_no_query() {
        let mut catalog = catalog_with(vec![MemoryCharacteristic::new(4, "DLC", "5 jours", 1)]);

        {
            let mut lookup = CharacteristicLookup::new(&mut catalog);
            assert_eq!(lookup.lookup(None, Attribute::Dlc).await, "");
            assert_eq!(lookup.lookup(Some(0), Attribute::Dlc).await, "");
            assert_eq!(lookup.lookup(Some(-3), Attribute::Dlc).await, "");
        }

        assert_eq!(catalog.attribute_queries(), 0);
    }

    #[tokio::test]
    async fn test_query_failure_yields_empty_value() {
        let mut catalog = catalog_with(vec![MemoryCharacteristic::new(4, "DLC", "5 jours", 1)]);
        catalog.fail_attribute_queries = true;

        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Dlc)
            .await;
        assert_eq!(value, "");
        assert_eq!(catalog.attribute_queries(), 1);
    }

    #[tokio::test]
    async fn test_disabled_binding_or_characteristic_is_skipped() {
        let mut binding_off = MemoryCharacteristic::new(4, "DLC", "5 jours", 1);
        binding_off.binding_status = "off".to_string();
        let mut characteristic_off = MemoryCharacteristic::new(4, "DLC", "8 jours", 2);
        characteristic_off.characteristic_status = "off".to_string();

        let mut catalog = catalog_with(vec![binding_off, characteristic_off]);
        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Dlc)
            .await;
        assert_eq!(value, "");

        catalog
            .characteristics
            .push(MemoryCharacteristic::new(4, "DLC", "12 jours", 3));
        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Dlc)
            .await;
        assert_eq!(value, "12 jours");
    }

    #[tokio::test]
    async fn test_values_are_cleaned_and_capped() {
        let long = format!("Eau,\r\n  glycérine   {}", "x".repeat(900));
        let mut catalog = catalog_with(vec![MemoryCharacteristic::new(4, "Ingrédients", &long, 1)]);

        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Ingredients)
            .await;

        assert!(value.starts_with("Eau, glycérine x"));
        assert!(value.ends_with("..."));
        assert_eq!(value.chars().count(), 803);
    }

    #[tokio::test]
    async fn test_short_values_are_rejected() {
        let mut catalog = catalog_with(vec![
            MemoryCharacteristic::new(4, "Couleur", "Rouge", 1),
            MemoryCharacteristic::new(4, "Couleur commerciale", "Rouge carmin profond mat", 2),
        ]);

        let value = CharacteristicLookup::new(&mut catalog)
            .lookup(Some(4), Attribute::Color)
            .await;
        assert_eq!(value, "Rouge carmin profond mat");
    }

    #[tokio::test]
    async fn test_enrich_fills_three_compositions() {
        let mut catalog = catalog_with(vec![
            MemoryCharacteristic::new(4, "Composition tige", "100% cuir", 3),
            MemoryCharacteristic::new(4, "Composition semelle", "Caoutchouc", 1),
            MemoryCharacteristic::new(4, "Composition doublure", "Textile", 2),
            MemoryCharacteristic::new(4, "Composition lacets", "Coton ciré", 4),
            MemoryCharacteristic::new(4, "Motif", "Uni", 1),
        ]);

        let mut row = CatalogRow::new(1);
        row.group_id = Some(4);

        let enrichment = CharacteristicLookup::new(&mut catalog).enrich(&row).await;

        assert_eq!(
            enrichment.compositions,
            [
                "Caoutchouc".to_string(),
                "Textile".to_string(),
                "100% cuir".to_string()
            ]
        );
        assert_eq!(enrichment.pattern, "Uni");
        assert_eq!(enrichment.capacity, "");
    }

    #[tokio::test]
    async fn test_enrich_without_group_is_empty() {
        let mut catalog = InMemoryCatalog::new();
        let enrichment = CharacteristicLookup::new(&mut catalog)
            .enrich(&CatalogRow::new(1))
            .await;

        assert_eq!(enrichment, Enrichment::default());
        assert_eq!(catalog.attribute_queries(), 0);
    }
}
