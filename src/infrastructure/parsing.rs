//! HTML parsing infrastructure for storefront search listings
//!
//! Each storefront gets a [`ListingParser`] that turns a search results page
//! into [`ProductRecord`]s. Field extraction is defensive: every field is a
//! small function returning a value or its placeholder, so a card missing
//! one element still yields the others.

pub mod config;
pub mod context;
pub mod error;
pub mod shopclues_parser;
pub mod snapdeal_parser;

// Re-export public types
pub use config::{ListingSelectors, ParsingConfig, SiteConfig};
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use shopclues_parser::ShopCluesParser;
pub use snapdeal_parser::SnapdealParser;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::domain::product::{Platform, ProductRecord};

/// Parser for one storefront's search results page
pub trait ListingParser: Send + Sync {
    fn context(&self) -> &ParseContext;

    /// Search page URL for `query`
    fn search_url(&self, query: &str) -> String;

    /// Extract up to `context().max_products` records from a parsed page
    fn parse_listing(&self, html: &Html) -> Vec<ProductRecord>;

    fn platform(&self) -> Platform {
        self.context().platform
    }

    /// Parse a raw response body
    fn parse_document(&self, body: &str) -> ParsingResult<Vec<ProductRecord>> {
        if body.trim().is_empty() {
            return Err(ParsingError::EmptyDocument {
                platform: self.platform().to_string(),
            });
        }

        let html = Html::parse_document(body);
        let products = self.parse_listing(&html);
        debug!("Extracted {} {} products", products.len(), self.platform());
        Ok(products)
    }
}

/// Compile a single CSS selector
pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Compile fallback selectors, skipping invalid ones as long as one survives
pub fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile {} selector '{}': {}", field, selector_str, e);
                errors.push(ParsingError::invalid_selector(selector_str, e));
            }
        }
    }

    if selectors.is_empty() {
        return Err(errors.into_iter().next().unwrap_or_else(|| ParsingError::NoSelectors {
            field: field.to_string(),
        }));
    }

    Ok(selectors)
}

/// First descendant of `card` matched by any selector, tried in order
pub fn first_match<'a>(card: &ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|selector| card.select(selector).next())
}

/// Trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First attribute among `names` with a non-empty value
pub fn first_non_empty_attr(element: &ElementRef<'_>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Make a `/`-rooted fragment absolute against `origin`.
///
/// Applied to links and images of both storefronts. Scheme-relative
/// `//host/...` fragments take the origin's scheme instead of being appended
/// to the origin, so `//img.cdn.test/a.jpg` becomes `https://img.cdn.test/a.jpg`,
/// not `https://www.snapdeal.com//img.cdn.test/a.jpg`. Anything else,
/// including absolute URLs and bare relative paths, is returned unchanged.
pub fn resolve_link(href: &str, origin: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = origin.split_once("://").map_or("https", |(scheme, _)| scheme);
        format!("{scheme}://{rest}")
    } else if href.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}
