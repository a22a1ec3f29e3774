// file: src/extractor/expiration.rs
// description: use-by (DLC) and durability (DDM) hints from description text
// reference: french food and cosmetics labelling wording

use crate::extractor::patterns::*;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpirationHints {
    pub dlc: String,
    pub ddm: String,
}

pub struct ExpirationExtractor {
    ddm_patterns: Vec<(&'static Regex, &'static str)>,
    dlc_patterns: Vec<&'static Regex>,
}

impl ExpirationExtractor {
    pub fn new() -> Self {
        Self {
            ddm_patterns: vec![
                (&*DDM_MONTHS, "mois"),
                (&*DDM_YEARS, "ans"),
                (&*DDM_YEAR_WORD, "ans"),
                (&*DDM_DURABILITY, "mois"),
                (&*DDM_CONSERVATION, "mois"),
            ],
            dlc_patterns: vec![&*DLC_DATE_LIMIT, &*DLC_EXPIRE, &*DLC_PEREMPTION],
        }
    }

    pub fn extract(&self, text: &str) -> ExpirationHints {
        if text.trim().is_empty() {
            return ExpirationHints::default();
        }

        let lowered = text.to_lowercase();

        let ddm = self
            .ddm_patterns
            .iter()
            .find_map(|(pattern, unit)| {
                first_capture(pattern, &lowered).map(|value| format!("{} {}", value, unit))
            })
            .unwrap_or_default();

        let dlc = self
            .dlc_patterns
            .iter()
            .find_map(|pattern| {
                first_capture(pattern, &lowered).map(|value| format!("{} jours", value))
            })
            .unwrap_or_default();

        ExpirationHints { dlc, ddm }
    }
}

impl Default for ExpirationExtractor {
    fn default() -> Self {
        Self::new()
    }
}
