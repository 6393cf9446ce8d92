//! CSS selector chains.
//!
//! The portal's markup drifts between releases, so every extracted field is
//! addressed by a chain of selectors tried in order. The first selector
//! that matches wins. Chains are plain data, which keeps markup changes a
//! one-line fix and lets callers override a chain without touching the
//! extraction logic.

use scraper::{ElementRef, Selector};

use super::text;

/// An ordered list of compiled selectors, primary first.
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles the given selector sources. Sources that fail to compile
    /// are dropped with a warning rather than failing the whole chain.
    pub fn new(sources: &[&str]) -> Self {
        let mut selectors = Vec::with_capacity(sources.len());
        for source in sources {
            match Selector::parse(source) {
                Ok(selector) => selectors.push(selector),
                Err(e) => tracing::warn!("Ignoring invalid selector {:?}: {}", source, e),
            }
        }
        Self { selectors }
    }

    /// First element matched by the first selector that matches anything.
    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Every element matched by the first selector that matches anything.
    /// Later selectors are only consulted when earlier ones match nothing,
    /// so primary and fallback matches never mix.
    pub fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let matched: Vec<ElementRef<'a>> = scope.select(selector).collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        Vec::new()
    }

    /// Cleaned text of the first match, `None` when empty.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first(scope)
            .map(element_text)
            .filter(|text| !text.is_empty())
    }

    /// An attribute of the first match.
    pub fn first_attr(&self, scope: ElementRef<'_>, attr: &str) -> Option<String> {
        self.first(scope)
            .and_then(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Text content of an element with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    text::clean_text(&element.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn chain_prefers_earlier_selectors() {
        let html = Html::parse_document(
            r#"<div><p class="new">primary</p><p class="old">fallback</p></div>"#,
        );
        let chain = SelectorChain::new(&["p.new", "p.old"]);
        assert_eq!(
            chain.first_text(html.root_element()),
            Some("primary".to_string())
        );
    }

    #[test]
    fn chain_falls_back_when_primary_is_absent() {
        let html = Html::parse_document(r#"<div><p class="old">fallback</p></div>"#);
        let chain = SelectorChain::new(&["p.new", "p.old"]);
        assert_eq!(
            chain.first_text(html.root_element()),
            Some("fallback".to_string())
        );
    }

    #[test]
    fn all_does_not_mix_chain_levels() {
        let html = Html::parse_document(
            r#"<div><p class="new">a</p><p class="new">b</p><p class="old">c</p></div>"#,
        );
        let chain = SelectorChain::new(&["p.new", "p.old"]);
        let texts: Vec<String> = chain
            .all(html.root_element())
            .into_iter()
            .map(element_text)
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn invalid_selector_is_skipped() {
        let html = Html::parse_document(r#"<p class="ok">text</p>"#);
        let chain = SelectorChain::new(&["p[[broken", "p.ok"]);
        assert_eq!(
            chain.first_text(html.root_element()),
            Some("text".to_string())
        );
    }
}
