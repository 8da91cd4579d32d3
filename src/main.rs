use std::sync::Arc;

use kinopick_api::{
    config::Config,
    routes::{cors_layer, create_router, AppState},
    services::RecommendationEngine,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kinopick_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let engine = RecommendationEngine::from_config(&config)?;
    let state = Arc::new(AppState::new(engine));

    let app = create_router(state)
        .layer(cors_layer(config.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        scoring_policy = ?config.scoring_policy,
        catalog_pages = config.catalog_pages,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
