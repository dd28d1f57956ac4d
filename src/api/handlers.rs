use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ApiError;
use crate::application::ProductSearchService;
use crate::domain::product::{Platform, ProductRecord};

pub const LIVENESS_MESSAGE: &str = "Shopmania backend is running";

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<ProductSearchService>,
}

impl AppState {
    pub fn new(search: ProductSearchService) -> Self {
        Self {
            search: Arc::new(search),
        }
    }
}

pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// `GET /api/products/{platform}/{query}`
///
/// Upstream failures surface as an empty array, never as an error status.
pub async fn get_products(
    State(state): State<AppState>,
    Path((platform, query)): Path<(String, String)>,
) -> Result<Json<Vec<ProductRecord>>, ApiError> {
    let platform: Platform = platform.parse().map_err(|e| {
        warn!("Rejected search request: {}", e);
        ApiError::from(e)
    })?;

    info!("📥 Product search: platform={}, query=\"{}\"", platform, query);
    let products = state.search.search(platform, &query).await;
    Ok(Json(products))
}
