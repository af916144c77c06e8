use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use minda_bedrock::embed::BedrockEmbedder;
use minda_bedrock::generate::BedrockGenerator;
use minda_insights::orchestrator::InsightOrchestrator;
use minda_search::corpus::download_corpus;
use minda_search::error::SearchError;
use minda_search::retrieval::VectorRetriever;
use minda_search::store::InMemoryVectorStore;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    minda_instruments::validate_catalog()?;

    let s3 = minda_storage::client::build_client().await;

    // A missing corpus is not fatal: retrieval returns nothing and the
    // pipeline runs on the sentinel context.
    let store = match download_corpus(&s3, &config.bucket, &config.corpus_key).await {
        Ok(corpus) => {
            tracing::info!(etag = %corpus.etag, "serving knowledge corpus snapshot");
            if corpus.embedding_model_id != config.embedding_model_id {
                tracing::warn!(
                    corpus_model = %corpus.embedding_model_id,
                    configured_model = %config.embedding_model_id,
                    "corpus was embedded with a different model"
                );
            }
            corpus.store
        }
        Err(SearchError::CorpusNotFound) => {
            tracing::info!(key = %config.corpus_key, "no knowledge corpus found, starting empty");
            InMemoryVectorStore::new(Vec::new())
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(dimensions) = store.dimensions()
        && dimensions != config.embedding_dimensions
    {
        tracing::warn!(
            corpus_dimensions = dimensions,
            configured_dimensions = config.embedding_dimensions,
            "embedding dimensions differ; retrieval will degrade to empty context"
        );
    }
    let corpus_articles = store.len();

    let sdk_config = minda_bedrock::client::load_sdk_config(config.region.clone()).await;
    let bedrock = minda_bedrock::client::build_runtime_client(&sdk_config);

    let orchestrator = InsightOrchestrator::new(
        Arc::new(BedrockEmbedder::new(
            bedrock.clone(),
            config.embedding_model_id.clone(),
            config.embedding_dimensions,
        )),
        Arc::new(VectorRetriever::new(store)),
        Arc::new(BedrockGenerator::new(bedrock, config.chat_model_id.clone())),
        config.pipeline.clone(),
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        corpus_articles,
        chat_model_id: config.chat_model_id,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/instruments", get(routes::instruments::list_instruments))
        .route(
            "/instruments/{id}",
            get(routes::instruments::get_instrument_detail),
        )
        .route(
            "/assessments/score",
            post(routes::assessments::score_assessment),
        )
        .route("/triage", post(routes::triage::triage))
        .route("/insights", post(routes::insights::generate_insight))
        .route("/chat", post(routes::chat::chat))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
