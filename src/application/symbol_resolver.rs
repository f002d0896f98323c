//! Free text to instrument symbols.
//!
//! Strategies are tried in order and the first one that yields anything wins:
//!
//! 1. symbols the caller supplied explicitly
//! 2. company names from the dictionary (whole-word, case-insensitive)
//! 3. upper-case tokens of 3-12 letters that are not stop words
//! 4. sector keywords mapped to a representative symbol
//! 5. the default index symbol
//!
//! Resolution never fails; the worst case is the default index.

use crate::application::text::{find_phrase, normalize};
use crate::config::ReferenceData;
use crate::domain::entities::news_item::NewsItem;
use crate::domain::values::venue::Venue;
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    Explicit,
    CompanyName,
    Token,
    SectorProxy,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub symbols: Vec<String>,
    pub strategy: ResolutionStrategy,
}

pub struct SymbolResolver {
    reference: Arc<ReferenceData>,
    stop_words: HashSet<String>,
}

fn token_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{3,12}\b").ok()).as_ref()
}

impl SymbolResolver {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        let stop_words = reference
            .stop_words
            .iter()
            .map(|w| w.trim().to_uppercase())
            .collect();
        Self {
            reference,
            stop_words,
        }
    }

    /// Best single symbol for `text`.
    pub fn resolve(&self, text: &str, explicit: &[String]) -> String {
        self.resolve_all(text, explicit, 1)
            .symbols
            .into_iter()
            .next()
            .unwrap_or_else(|| self.default_symbol())
    }

    /// Up to `max` distinct symbols from the first strategy that matches.
    /// Never returns an empty list.
    pub fn resolve_all(&self, text: &str, explicit: &[String], max: usize) -> Resolution {
        let max = max.max(1);
        let attempts: [(ResolutionStrategy, Vec<String>); 4] = [
            (ResolutionStrategy::Explicit, self.explicit_symbols(explicit)),
            (ResolutionStrategy::CompanyName, self.company_names(text)),
            (ResolutionStrategy::Token, self.tokens(text)),
            (ResolutionStrategy::SectorProxy, self.sector_proxies(text)),
        ];

        for (strategy, found) in attempts {
            let symbols = dedup_take(found, max);
            if !symbols.is_empty() {
                return Resolution { symbols, strategy };
            }
        }

        Resolution {
            symbols: vec![self.default_symbol()],
            strategy: ResolutionStrategy::Default,
        }
    }

    pub fn resolve_item(&self, item: &NewsItem, max: usize) -> Resolution {
        self.resolve_all(&item.text(), &item.symbols, max)
    }

    fn default_symbol(&self) -> String {
        Venue::canonical_symbol(&self.reference.default_symbol)
    }

    fn explicit_symbols(&self, explicit: &[String]) -> Vec<String> {
        explicit
            .iter()
            .map(|s| Venue::canonical_symbol(s))
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn company_names(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let mut hits: Vec<(usize, usize, &String)> = self
            .reference
            .company_names
            .iter()
            .filter_map(|(name, symbol)| {
                find_phrase(&normalized, name).map(|pos| (pos, name.len(), symbol))
            })
            .collect();
        // Earliest mention first; longer names win ties.
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        hits.into_iter()
            .map(|(_, _, symbol)| Venue::canonical_symbol(symbol))
            .collect()
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let Some(re) = token_regex() else {
            return Vec::new();
        };
        re.find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    fn sector_proxies(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let mut hits: Vec<(usize, &String)> = self
            .reference
            .sector_proxies
            .iter()
            .filter_map(|(keyword, symbol)| find_phrase(&normalized, keyword).map(|pos| (pos, symbol)))
            .collect();
        hits.sort_by_key(|(pos, _)| *pos);
        hits.into_iter()
            .map(|(_, symbol)| Venue::canonical_symbol(symbol))
            .collect()
    }
}

fn dedup_take(symbols: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SymbolResolver {
        SymbolResolver::new(Arc::new(ReferenceData::default()))
    }

    #[test]
    fn test_explicit_symbols_win() {
        let r = resolver().resolve_all("Reliance profit", &["tcs.ns".into(), "TCS".into()], 3);
        assert_eq!(r.strategy, ResolutionStrategy::Explicit);
        assert_eq!(r.symbols, vec!["TCS".to_string()]);
    }

    #[test]
    fn test_company_name_case_insensitive() {
        assert_eq!(resolver().resolve("RELIANCE reports record quarterly profit", &[]), "RELIANCE");
        assert_eq!(resolver().resolve("shares of infosys slip", &[]), "INFY");
    }

    #[test]
    fn test_company_names_ordered_by_mention() {
        let r = resolver().resolve_all("Wipro and HDFC Bank lead gains, Infosys lags", &[], 3);
        assert_eq!(r.symbols, vec!["WIPRO", "HDFCBANK", "INFY"]);
    }

    #[test]
    fn test_token_extraction_skips_stop_words() {
        let r = resolver().resolve_all("BREAKING: ZOMATO and RBI NEWS", &[], 3);
        assert_eq!(r.strategy, ResolutionStrategy::Token);
        assert_eq!(r.symbols, vec!["ZOMATO".to_string()]);
    }

    #[test]
    fn test_sector_proxy() {
        let r = resolver().resolve_all("Banking sector under pressure amid rate concerns", &[], 3);
        assert_eq!(r.strategy, ResolutionStrategy::SectorProxy);
        assert_eq!(r.symbols, vec!["HDFCBANK".to_string()]);
    }

    #[test]
    fn test_default_index() {
        let r = resolver().resolve_all("Markets quiet ahead of holiday", &[], 3);
        assert_eq!(r.strategy, ResolutionStrategy::Default);
        assert_eq!(r.symbols, vec!["NIFTY".to_string()]);
        assert_eq!(resolver().resolve("", &[]), "NIFTY");
    }
}
