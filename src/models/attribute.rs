// file: src/models/attribute.rs
// description: logical catalog attributes and the matcher spec used to find them
// reference: generic key/value characteristic dictionaries

use serde::Serialize;

/// A logical attribute stored in the characteristic dictionaries of a product group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Attribute {
    Capacity,
    Dlc,
    Ddm,
    Ingredients,
    Color,
    CareAdvice,
    Composition,
    NetWeight,
    Pattern,
    Dimensions,
}

/// How a characteristic key is recognised and how its value is cleaned up.
///
/// Key comparisons are case-insensitive, as they are under the catalog's
/// default collation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub exact: &'static [&'static str],
    pub contains: &'static [&'static str],
    /// Values must be strictly longer than this many characters.
    pub min_len: Option<usize>,
    /// Values longer than this many characters are cut and suffixed with `...`.
    pub cap: Option<usize>,
    pub max_results: usize,
}

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Attribute::Capacity,
        Attribute::Dlc,
        Attribute::Ddm,
        Attribute::Ingredients,
        Attribute::Color,
        Attribute::CareAdvice,
        Attribute::Composition,
        Attribute::NetWeight,
        Attribute::Pattern,
        Attribute::Dimensions,
    ];

    pub fn spec(self) -> AttributeSpec {
        match self {
            Attribute::Capacity => AttributeSpec {
                exact: &[],
                contains: &["capacité", "capacity", "volume", "contenance"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
            Attribute::Dlc => AttributeSpec {
                exact: &[],
                contains: &["DLC"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
            Attribute::Ddm => AttributeSpec {
                exact: &[],
                contains: &["DDM", "durabilité"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
            Attribute::Ingredients => AttributeSpec {
                exact: &["Ingrédients", "Ingredients"],
                contains: &["ngrédient", "ngredient"],
                min_len: Some(20),
                cap: Some(800),
                max_results: 1,
            },
            Attribute::Color => AttributeSpec {
                exact: &[],
                contains: &["Couleur", "Color"],
                min_len: Some(20),
                cap: Some(500),
                max_results: 1,
            },
            Attribute::CareAdvice => AttributeSpec {
                exact: &["Conseil d'entretien"],
                contains: &["entretien"],
                min_len: Some(10),
                cap: Some(500),
                max_results: 1,
            },
            Attribute::Composition => AttributeSpec {
                exact: &[],
                contains: &["Composition"],
                min_len: Some(5),
                cap: Some(500),
                max_results: 3,
            },
            Attribute::NetWeight => AttributeSpec {
                exact: &[],
                contains: &["Poids"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
            Attribute::Pattern => AttributeSpec {
                exact: &[],
                contains: &["Motif"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
            Attribute::Dimensions => AttributeSpec {
                exact: &[],
                contains: &["Dimensions"],
                min_len: None,
                cap: None,
                max_results: 1,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Attribute::Capacity => "capacity",
            Attribute::Dlc => "DLC",
            Attribute::Ddm => "DDM",
            Attribute::Ingredients => "ingredients",
            Attribute::Color => "color",
            Attribute::CareAdvice => "care advice",
            Attribute::Composition => "composition",
            Attribute::NetWeight => "net weight",
            Attribute::Pattern => "pattern",
            Attribute::Dimensions => "dimensions",
        }
    }
}

impl AttributeSpec {
    pub fn matches_key(&self, key: &str) -> bool {
        let key_lower = key.to_lowercase();

        self.exact
            .iter()
            .any(|candidate| candidate.to_lowercase() == key_lower)
            || self
                .contains
                .iter()
                .any(|fragment| key_lower.contains(&fragment.to_lowercase()))
    }

    /// The raw value must be present and, when a minimum applies, long enough.
    pub fn accepts_value(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        match self.min_len {
            Some(min) => value.chars().count() > min,
            None => true,
        }
    }

    pub fn clean_value(&self, raw: &str) -> String {
        let flattened = raw.trim().replace(['\r', '\n'], " ");
        let collapsed = collapse_spaces(&flattened);

        match self.cap {
            Some(cap) => truncate_chars(&collapsed, cap),
            None => collapsed,
        }
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_space = false;

    for c in text.chars() {
        if c == ' ' {
            if !previous_space {
                result.push(c);
            }
            previous_space = true;
        } else {
            result.push(c);
            previous_space = false;
        }
    }

    result
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredients_key_matching() {
        let spec = Attribute::Ingredients.spec();
        assert!(spec.matches_key("Ingrédients"));
        assert!(spec.matches_key("Ingredients"));
        assert!(spec.matches_key("Liste des ingrédients"));
        assert!(!spec.matches_key("Composition"));
    }

    #[test]
    fn test_key_matching_ignores_case() {
        assert!(Attribute::Capacity.spec().matches_key("CAPACITÉ du flacon"));
        assert!(Attribute::Dlc.spec().matches_key("dlc"));
        assert!(Attribute::CareAdvice.spec().matches_key("conseil d'entretien"));
    }

    #[test]
    fn test_min_length_is_exclusive() {
        let spec = Attribute::CareAdvice.spec();
        assert!(!spec.accepts_value("0123456789"));
        assert!(spec.accepts_value("01234567890"));
        assert!(Attribute::Dlc.spec().accepts_value("3"));
        assert!(!Attribute::Dlc.spec().accepts_value(""));
    }

    #[test]
    fn test_clean_value_flattens_and_truncates() {
        let spec = Attribute::Color.spec();
        let cleaned = spec.clean_value("  Rouge\r\nvif  et   brillant ");
        assert_eq!(cleaned, "Rouge vif et brillant");

        let long = "a".repeat(600);
        let truncated = spec.clean_value(&long);
        assert_eq!(truncated.chars().count(), 503);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("éééé", 2), "éé...");
        assert_eq!(truncate_chars("éé", 2), "éé");
    }

    #[test]
    fn test_only_composition_returns_several_values() {
        for attribute in Attribute::ALL {
            let expected = if attribute == Attribute::Composition { 3 } else { 1 };
            assert_eq!(attribute.spec().max_results, expected);
        }
    }
}
