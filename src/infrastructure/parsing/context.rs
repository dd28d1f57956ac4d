//! Parsing context shared by every card on a page

use crate::domain::product::Platform;
use crate::infrastructure::parsing::SiteConfig;

/// Context information for parsing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    pub platform: Platform,

    /// Origin for resolving `/`-rooted links
    pub origin: String,

    /// Cap on cards read from one page
    pub max_products: usize,
}

impl ParseContext {
    pub fn new(platform: Platform, origin: impl Into<String>) -> Self {
        use crate::infrastructure::config::defaults::MAX_PRODUCTS_PER_PAGE;

        Self {
            platform,
            origin: origin.into(),
            max_products: MAX_PRODUCTS_PER_PAGE,
        }
    }

    pub fn from_site(platform: Platform, site: &SiteConfig) -> Self {
        Self::new(platform, site.origin.clone()).with_max_products(site.max_products)
    }

    /// Set the card cap
    pub const fn with_max_products(mut self, count: usize) -> Self {
        self.max_products = count;
        self
    }
}
