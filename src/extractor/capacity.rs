// file: src/extractor/capacity.rs
// description: capacity/volume heuristics over free product text
// reference: fallback when no capacity characteristic exists

use crate::extractor::patterns::*;
use regex::Regex;

pub struct CapacityExtractor {
    units: Vec<(&'static Regex, &'static str)>,
}

impl CapacityExtractor {
    pub fn new() -> Self {
        Self {
            units: vec![
                (&*CAPACITY_ML, "ml"),
                (&*CAPACITY_L, "L"),
                (&*CAPACITY_CL, "cl"),
                (&*CAPACITY_LITRE, "L"),
            ],
        }
    }

    /// Returns `"<value> <unit>"` for the first unit pattern that matches, or `""`.
    pub fn extract(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let lowered = text.to_lowercase();

        self.units
            .iter()
            .find_map(|(pattern, unit)| {
                first_capture(pattern, &lowered).map(|value| format!("{} {}", value, unit))
            })
            .unwrap_or_default()
    }
}

impl Default for CapacityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
