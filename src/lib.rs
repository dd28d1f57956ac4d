//! Shopmania backend
//!
//! Scrapes product search listings from Snapdeal and ShopClues and serves
//! them as JSON over a small HTTP API.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use api::{AppState, create_router};
pub use application::ProductSearchService;
pub use domain::{Platform, ProductRecord, Rating};
