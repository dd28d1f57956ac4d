//! Snapdeal search listing parser
//!
//! Cards carry a star-rating widget whose inline `width` percentage encodes
//! the score. Every matched card becomes a record, however many of its
//! fields fall back to placeholders.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{
    ListingParser, ParseContext, ParsingError, ParsingResult, SiteConfig, compile_selector,
    compile_selectors, element_text, first_match, first_non_empty_attr, resolve_link,
};
use crate::domain::product::{Platform, ProductRecord, Rating};

const WIDTH_PATTERN: &str = r"(?i)width\s*:\s*(-?\d+(?:\.\d+)?)\s*%?";
const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "data-original"];

pub struct SnapdealParser {
    context: ParseContext,
    site: SiteConfig,
    card_selector: Selector,
    title_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    rating_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    width_pattern: Regex,
}

impl SnapdealParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&SiteConfig::snapdeal())
    }

    pub fn with_config(site: &SiteConfig) -> ParsingResult<Self> {
        let selectors = &site.selectors;
        let width_pattern = Regex::new(WIDTH_PATTERN).map_err(|e| ParsingError::InvalidPattern {
            pattern: WIDTH_PATTERN.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            context: ParseContext::from_site(Platform::Snapdeal, site),
            site: site.clone(),
            card_selector: compile_selector(&selectors.card)?,
            title_selectors: compile_selectors("title", &selectors.title)?,
            price_selectors: compile_selectors("price", &selectors.price)?,
            link_selectors: compile_selectors("link", &selectors.link)?,
            rating_selectors: compile_selectors("rating", &selectors.rating)?,
            image_selectors: compile_selectors("image", &selectors.image)?,
            width_pattern,
        })
    }

    fn extract_title(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.title_selectors)
            .map(|e| element_text(&e))
            .unwrap_or_default()
    }

    fn extract_price(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.price_selectors)
            .map(|e| element_text(&e))
            .unwrap_or_default()
    }

    fn extract_link(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.link_selectors)
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_link(href.trim(), &self.context.origin))
            .unwrap_or_default()
    }

    /// `style="width:86%"` on the filled-stars widget becomes 4.3
    fn extract_rating(&self, card: &ElementRef<'_>) -> Rating {
        first_match(card, &self.rating_selectors)
            .and_then(|widget| widget.value().attr("style"))
            .and_then(|style| self.parse_width_percent(style))
            .and_then(Rating::from_width_percent)
            .unwrap_or(Rating::NoRating)
    }

    fn parse_width_percent(&self, style: &str) -> Option<f64> {
        self.width_pattern
            .captures(style)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }

    fn extract_image(&self, card: &ElementRef<'_>) -> String {
        first_match(card, &self.image_selectors)
            .and_then(|img| first_non_empty_attr(&img, &IMAGE_ATTRS))
            .map(|src| resolve_link(&src, &self.context.origin))
            .unwrap_or_default()
    }

    fn build_record(&self, card: &ElementRef<'_>) -> ProductRecord {
        ProductRecord {
            title: self.extract_title(card),
            price: self.extract_price(card),
            link: self.extract_link(card),
            rating: self.extract_rating(card),
            image_url: self.extract_image(card),
            platform: self.context.platform.display_name().to_string(),
        }
    }
}

impl ListingParser for SnapdealParser {
    fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Spaces become a literal `%20`; nothing else is encoded
    fn search_url(&self, query: &str) -> String {
        self.site.search_url(&query.replace(' ', "%20"))
    }

    fn parse_listing(&self, html: &Html) -> Vec<ProductRecord> {
        html.select(&self.card_selector)
            .take(self.context.max_products)
            .map(|card| self.build_record(&card))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NO_RATING;

    fn card(body: &str) -> String {
        format!(r#"<div class="product-tuple-listing js-tuple">{body}</div>"#)
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><section>{}</section></body></html>", cards.concat())
    }

    const FULL_CARD: &str = r#"
        <a class="dp-widget-link" href="/product/sparx-men-shoe/6341">
            <img class="product-image" src="" data-src="https://n1.sdlcdn.com/shoe.jpg">
        </a>
        <p class="product-title"> Sparx Men Running Shoe </p>
        <span class="lfloat product-price">Rs. 1,049</span>
        <div class="rating-stars"><div class="filled-stars" style="width:86%"></div></div>
    "#;

    #[test]
    fn search_url_encodes_spaces_only() {
        let parser = SnapdealParser::new().unwrap();
        assert_eq!(
            parser.search_url("running shoes & socks"),
            "https://www.snapdeal.com/search?keyword=running%20shoes%20&%20socks&sort=plrty"
        );
    }

    #[test]
    fn extracts_full_card() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(&page(&[card(FULL_CARD)]));

        let records = parser.parse_listing(&html);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Sparx Men Running Shoe");
        assert_eq!(record.price, "Rs. 1,049");
        assert_eq!(record.link, "https://www.snapdeal.com/product/sparx-men-shoe/6341");
        assert_eq!(record.rating, Rating::Stars(4.3));
        assert_eq!(record.image_url, "https://n1.sdlcdn.com/shoe.jpg");
        assert_eq!(record.platform, "Snapdeal");
    }

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(&page(&[card("<span>nothing useful</span>")]));

        let records = parser.parse_listing(&html);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "");
        assert_eq!(record.price, "");
        assert_eq!(record.link, "");
        assert_eq!(record.rating, Rating::NoRating);
        assert_eq!(record.image_url, "");
        assert_eq!(serde_json::to_value(record).unwrap()["rating"], NO_RATING);
    }

    #[test]
    fn rating_widget_without_style_is_no_rating() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(&page(&[card(r#"<div class="filled-stars"></div>"#)]));
        assert_eq!(parser.parse_listing(&html)[0].rating, Rating::NoRating);
    }

    #[test]
    fn rating_tolerates_spacing_and_decimals() {
        let parser = SnapdealParser::new().unwrap();
        assert_eq!(parser.parse_width_percent("width: 73.5 %"), Some(73.5));
        assert_eq!(parser.parse_width_percent("color:red; width:100%"), Some(100.0));
        assert_eq!(parser.parse_width_percent("height:10px"), None);
    }

    #[test]
    fn absolute_link_passes_through() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(&page(&[card(
            r#"<a class="dp-widget-link" href="https://m.snapdeal.com/p/1">x</a>"#,
        )]));
        assert_eq!(parser.parse_listing(&html)[0].link, "https://m.snapdeal.com/p/1");
    }

    #[test]
    fn image_falls_back_through_lazy_attributes() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(&page(&[
            card(r#"<img src="a.jpg" data-src="b.jpg">"#),
            card(r#"<img data-original="/imgs/c.jpg">"#),
            card(r#"<img alt="none">"#),
        ]));

        let images: Vec<_> = parser.parse_listing(&html).into_iter().map(|r| r.image_url).collect();
        assert_eq!(images, vec!["a.jpg", "https://www.snapdeal.com/imgs/c.jpg", ""]);
    }

    #[test]
    fn caps_cards_at_forty() {
        let parser = SnapdealParser::new().unwrap();
        let cards: Vec<String> = (0..55).map(|_| card(FULL_CARD)).collect();
        let html = Html::parse_document(&page(&cards));
        assert_eq!(parser.parse_listing(&html).len(), 40);
    }

    #[test]
    fn ignores_elements_outside_cards() {
        let parser = SnapdealParser::new().unwrap();
        let html = Html::parse_document(
            r#"<html><body><p class="product-title">Sidebar</p><div class="product-tuple">x</div></body></html>"#,
        );
        assert!(parser.parse_listing(&html).is_empty());
    }

    #[test]
    fn empty_body_is_a_parse_error() {
        let parser = SnapdealParser::new().unwrap();
        assert!(matches!(
            parser.parse_document("   "),
            Err(ParsingError::EmptyDocument { .. })
        ));
    }
}
