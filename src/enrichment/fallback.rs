// file: src/enrichment/fallback.rs
// description: ordered chain of lazily evaluated value providers
// reference: first non-empty provider wins

use tracing::trace;

type Provider<'a> = Box<dyn FnOnce() -> String + 'a>;

/// Candidates for one output field. Providers run in insertion order and
/// evaluation stops at the first one that yields a non-blank value.
#[derive(Default)]
pub struct FallbackChain<'a> {
    field: &'static str,
    providers: Vec<(&'static str, Provider<'a>)>,
}

impl<'a> FallbackChain<'a> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            providers: Vec::new(),
        }
    }

    pub fn then(mut self, source: &'static str, provider: impl FnOnce() -> String + 'a) -> Self {
        self.providers.push((source, Box::new(provider)));
        self
    }

    /// Adds an already computed candidate.
    pub fn value(self, source: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        self.then(source, move || value)
    }

    pub fn resolve(self) -> String {
        self.resolve_or("")
    }

    pub fn resolve_or(self, default: &str) -> String {
        for (source, provider) in self.providers {
            let candidate = provider();
            if !candidate.trim().is_empty() {
                trace!("{} resolved from {}", self.field, source);
                return candidate;
            }
        }

        default.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_non_empty_wins() {
        let value = FallbackChain::new("title")
            .value("group", "")
            .value("keywords", "   ")
            .value("legacy", "Savon")
            .value("generated", "Produit 1")
            .resolve();
        assert_eq!(value, "Savon");
    }

    #[test]
    fn test_later_providers_are_not_evaluated() {
        let calls = Cell::new(0);
        let value = FallbackChain::new("capacity")
            .value("lookup", "50 ml")
            .then("description", || {
                calls.set(calls.get() + 1);
                "30 ml".to_string()
            })
            .resolve();

        assert_eq!(value, "50 ml");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_default_when_all_empty() {
        let chain = FallbackChain::new("brand").value("brand", "");
        assert_eq!(chain.resolve_or("Marque inconnue"), "Marque inconnue");
        assert_eq!(FallbackChain::new("size").resolve(), "");
    }
}
