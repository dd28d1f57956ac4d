//! Parsing configuration for listing extraction
//!
//! Centralized configuration for storefront endpoints and CSS selectors.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::{defaults, storefronts};

/// Parsing configuration for every supported storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParsingConfig {
    pub snapdeal: SiteConfig,
    pub shopclues: SiteConfig,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            snapdeal: SiteConfig::snapdeal(),
            shopclues: SiteConfig::shopclues(),
        }
    }
}

/// Endpoint and selectors for one storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Origin used to absolutize `/`-rooted links
    pub origin: String,

    /// Search URL with a `{query}` placeholder
    pub search_template: String,

    /// Cards beyond this count are ignored
    pub max_products: usize,

    pub selectors: ListingSelectors,
}

impl SiteConfig {
    pub fn snapdeal() -> Self {
        Self {
            origin: storefronts::SNAPDEAL_ORIGIN.to_string(),
            search_template: storefronts::SNAPDEAL_SEARCH.to_string(),
            max_products: defaults::MAX_PRODUCTS_PER_PAGE,
            selectors: ListingSelectors::snapdeal(),
        }
    }

    pub fn shopclues() -> Self {
        Self {
            origin: storefronts::SHOPCLUES_ORIGIN.to_string(),
            search_template: storefronts::SHOPCLUES_SEARCH.to_string(),
            max_products: defaults::MAX_PRODUCTS_PER_PAGE,
            selectors: ListingSelectors::shopclues(),
        }
    }

    /// Substitute an already-prepared query into the search template
    pub fn search_url(&self, query: &str) -> String {
        self.search_template.replace("{query}", query)
    }
}

/// CSS selectors for a search results page.
///
/// Field selectors are fallbacks tried in order inside each card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Selector for one product card
    pub card: String,

    pub title: Vec<String>,
    pub price: Vec<String>,
    pub link: Vec<String>,
    pub image: Vec<String>,

    /// Filled-stars widget; unused by storefronts without ratings
    #[serde(default)]
    pub rating: Vec<String>,
}

impl ListingSelectors {
    pub fn snapdeal() -> Self {
        Self {
            card: "div.product-tuple-listing".to_string(),
            title: vec!["p.product-title".to_string()],
            price: vec!["span.lfloat.product-price".to_string()],
            link: vec!["a.dp-widget-link".to_string()],
            image: vec!["img".to_string()],
            rating: vec!["div.filled-stars".to_string()],
        }
    }

    pub fn shopclues() -> Self {
        Self {
            card: ".column.col3.search_blocks".to_string(),
            title: vec!["h2".to_string()],
            price: vec!["span.p_price".to_string()],
            link: vec!["a".to_string()],
            image: vec!["img".to_string()],
            rating: Vec::new(),
        }
    }
}
