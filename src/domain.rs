//! Domain module - Core entities
//!
//! Product records and the set of storefronts they are extracted from.

pub mod product;

// Re-export commonly used items
pub use product::{NO_RATING, Platform, ProductRecord, Rating, UnknownPlatform};
