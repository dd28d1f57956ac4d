use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};

/// Full application router; CORS is open on `/api`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api: Router<AppState> = Router::new()
        .route("/products/:platform/:query", get(handlers::get_products))
        .layer(cors);

    Router::new()
        .route("/", get(handlers::liveness))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
