//! Postgate - sanitizing write gate for blog posts

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postgate::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{PgPostCategoryRepository, PgPostRepository},
    },
    services::{identity::HttpIdentityVerifier, post::PostService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postgate=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting postgate...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected");

    // Wire services: all collaborators are injected, nothing is global
    let posts = PgPostRepository::boxed(pool.clone());
    let links = PgPostCategoryRepository::boxed(pool);
    let identity = Arc::new(HttpIdentityVerifier::new(&config.identity)?);

    let state = AppState {
        post_service: Arc::new(PostService::new(posts, links)),
        identity,
    };

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
