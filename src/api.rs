//! HTTP surface over the product search service

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
pub use server::serve;
