//! Application layer module
//!
//! Coordinates fetching and parsing for a `(platform, query)` search.

pub mod product_search_service;

pub use product_search_service::{ProductSearchService, ScrapeError};
