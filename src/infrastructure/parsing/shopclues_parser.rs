//! ShopClues search listing parser
//!
//! Results are tiled search blocks with no rating signal. Unlike Snapdeal, a
//! card only becomes a record when it yields both a title and a link.

use scraper::{ElementRef, Html, Selector};

use super::{
    ListingParser, ParseContext, ParsingResult, SiteConfig, compile_selector, compile_selectors,
    element_text, first_match, first_non_empty_attr, resolve_link,
};
use crate::domain::product::{Platform, ProductRecord, Rating};

pub const NO_TITLE: &str = "No title";
pub const NO_PRICE: &str = "No price";

const IMAGE_ATTRS: [&str; 2] = ["data-img", "src"];

pub struct ShopCluesParser {
    context: ParseContext,
    site: SiteConfig,
    card_selector: Selector,
    title_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
}

impl ShopCluesParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&SiteConfig::shopclues())
    }

    pub fn with_config(site: &SiteConfig) -> ParsingResult<Self> {
        let selectors = &site.selectors;

        Ok(Self {
            context: ParseContext::from_site(Platform::ShopClues, site),
            site: site.clone(),
            card_selector: compile_selector(&selectors.card)?,
            title_selectors: compile_selectors("title", &selectors.title)?,
            price_selectors: compile_selectors("price", &selectors.price)?,
            link_selectors: compile_selectors("link", &selectors.link)?,
            image_selectors: compile_selectors("image", &selectors.image)?,
        })
    }

    /// A present but blank heading yields an empty title, which the
    /// inclusion gate then rejects
    fn extract_title(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.title_selectors)
            .map_or_else(|| NO_TITLE.to_string(), |e| element_text(&e))
    }

    fn extract_price(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.price_selectors)
            .map_or_else(|| NO_PRICE.to_string(), |e| element_text(&e))
    }

    fn extract_link(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.link_selectors)
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_link(href.trim(), &self.context.origin))
            .unwrap_or_default()
    }

    fn extract_image(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.image_selectors)
            .and_then(|img| first_non_empty_attr(&img, &IMAGE_ATTRS))
            .map(|src| resolve_link(&src, &self.context.origin))
            .unwrap_or_default()
    }

    /// `None` when the card fails the title-and-link gate
    fn build_record(&self, card: &ElementRef<'_>) -> Option<ProductRecord> {
        let title = self.extract_title(card);
        let link = self.extract_link(card);
        if title.is_empty() || link.is_empty() {
            return None;
        }

        Some(ProductRecord {
            title,
            price: self.extract_price(card),
            link,
            rating: Rating::NoRating,
            image_url: self.extract_image(card),
            platform: self.context.platform.display_name().to_string(),
        })
    }
}

impl ListingParser for ShopCluesParser {
    fn context(&self) -> &ParseContext {
        &self.context
    }

    /// The query is embedded as given
    fn search_url(&self, query: &str) -> String {
        self.site.search_url(query)
    }

    /// The cap applies to matched cards, before the inclusion gate
    fn parse_listing(&self, html: &Html) -> Vec<ProductRecord> {
        html.select(&self.card_selector)
            .take(self.context.max_products)
            .filter_map(|card| self.build_record(&card))
            .collect()
    }
}
