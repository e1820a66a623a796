mod config;
mod cv;
mod db;
mod embedding;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod recommender;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::{CachedEmbedder, Embedder, EmbeddingClient};
use crate::llm_client::LlmClient;
use crate::recommender::{PgSimilarityLookup, Recommender};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; missing required env vars abort startup
    let config = Config::from_env()?;

    // Structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvmatch API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (+ migrations)
    let db = create_pool(&config.database_url).await?;

    // Redis (embedding cache)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Embeddings
    let embedding_client = EmbeddingClient::new(
        &config.embedding_api_url,
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_dimensions,
    );
    info!(
        "Embedding client initialized (model: {}, {} dims, cache TTL {}s)",
        config.embedding_model,
        embedding_client.dimensions(),
        config.embedding_cache_ttl_secs
    );
    let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(
        embedding_client,
        redis,
        config.embedding_cache_ttl_secs,
    ));

    // Recommendation engine
    let recommender = Arc::new(Recommender::new(
        embedder.clone(),
        Arc::new(PgSimilarityLookup::new(db.clone())),
    ));

    let state = AppState {
        db,
        s3,
        llm,
        config: config.clone(),
        embedder,
        recommender,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "cvmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
