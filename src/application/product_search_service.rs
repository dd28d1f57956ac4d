//! Product search service
//!
//! Resolves a platform to its listing parser, fetches the search page through
//! the resilient fetcher and parses it. [`ProductSearchService::search`]
//! never fails: errors are logged and collapse to an empty result.

use anyhow::Context;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::product::{Platform, ProductRecord};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http_client::{FetchError, ResilientFetcher};
use crate::infrastructure::parsing::{
    ListingParser, ParsingConfig, ParsingError, ParsingResult, ShopCluesParser, SnapdealParser,
};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

/// Search across the supported storefronts
#[derive(Clone)]
pub struct ProductSearchService {
    fetcher: ResilientFetcher,
    snapdeal: Arc<SnapdealParser>,
    shopclues: Arc<ShopCluesParser>,
}

impl ProductSearchService {
    pub fn new(fetcher: ResilientFetcher, parsing: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            fetcher,
            snapdeal: Arc::new(SnapdealParser::with_config(&parsing.snapdeal)?),
            shopclues: Arc::new(ShopCluesParser::with_config(&parsing.shopclues)?),
        })
    }

    /// Service over `reqwest` built from the application config
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let fetcher =
            ResilientFetcher::from_config(&config.fetch).context("Failed to create HTTP fetcher")?;
        Self::new(fetcher, &config.parsing).context("Failed to compile listing selectors")
    }

    pub fn parser(&self, platform: Platform) -> &dyn ListingParser {
        match platform {
            Platform::Snapdeal => self.snapdeal.as_ref(),
            Platform::ShopClues => self.shopclues.as_ref(),
        }
    }

    /// Best-effort search: failures are logged and yield an empty list
    pub async fn search(&self, platform: Platform, query: &str) -> Vec<ProductRecord> {
        match self.try_search(platform, query).await {
            Ok(products) => {
                if products.is_empty() {
                    warn!("No products found for \"{}\" on {}", query, platform);
                } else {
                    info!("✅ {} products for \"{}\" on {}", products.len(), query, platform);
                }
                products
            }
            Err(e) => {
                error!("{} search error for \"{}\": {}", platform, query, e);
                Vec::new()
            }
        }
    }

    pub async fn try_search(
        &self,
        platform: Platform,
        query: &str,
    ) -> Result<Vec<ProductRecord>, ScrapeError> {
        let parser = self.parser(platform);
        let url = parser.search_url(query);
        info!("🔍 Searching {} for \"{}\"", platform, query);

        let body = self.fetcher.try_fetch(&url).await?;
        Ok(parser.parse_document(&body)?)
    }
}
