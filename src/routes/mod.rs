use axum::{
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::{AppError, AppResult},
    services::RecommendationEngine,
};

pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: RecommendationEngine,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self { engine }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/recommendations/:user_id",
            get(recommendations::recommend),
        )
        .with_state(state)
}

/// CORS policy: only `origin` when given, otherwise any origin
pub fn cors_layer(origin: Option<&str>) -> AppResult<CorsLayer> {
    let layer = CorsLayer::new().allow_methods([Method::GET]);

    match origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|e| {
                AppError::InvalidInput(format!("Invalid CORS origin {}: {}", origin, e))
            })?;
            Ok(layer.allow_origin(value))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_origin() {
        assert!(cors_layer(Some("https://doomsday058.github.io")).is_ok());
        assert!(cors_layer(None).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(matches!(
            cors_layer(Some("bad\norigin")),
            Err(AppError::InvalidInput(_))
        ));
    }
}
