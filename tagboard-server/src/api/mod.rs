pub mod error;
pub mod hashtags;

pub use error::{ApiError, ApiResult};

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the service router with tracing and permissive CORS
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Hashtag routes
        .route("/hashtags/normalize", post(hashtags::normalize))
        .route("/hashtags/extract", post(hashtags::extract))
        .route("/hashtags/linkify", post(hashtags::linkify))
        .route("/hashtags/batch", post(hashtags::batch))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
