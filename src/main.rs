use alchemist::api;
use alchemist::config::Config;
use alchemist::services::{AnalysisService, ChartPipeline, HttpContextProvider, HttpDecisionEngine, PngRenderer};
use alchemist::sources::BinanceClient;
use alchemist::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alchemist=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting Alchemist server on {}:{}", config.host, config.port);

    if config.decision_url.is_none() {
        warn!("DECISION_URL not set, analysis requests will report the model as unavailable");
    }

    let source = Arc::new(BinanceClient::new(config.binance_api_url.clone(), config.http_timeout()));
    let renderer = Arc::new(PngRenderer::new(config.chart_width, config.chart_height));
    let pipeline = ChartPipeline::new(source, renderer, config.kline_limit, config.max_concurrent_timeframes);

    let decision = Arc::new(HttpDecisionEngine::new(
        config.decision_url.clone(),
        config.decision_api_key.clone(),
        config.http_timeout(),
    ));
    let context = Arc::new(HttpContextProvider::new(
        config.fundamentals_url.clone(),
        config.economic_events_url.clone(),
        config.http_timeout(),
    ));

    let state = AppState {
        config: config.clone(),
        analysis: Arc::new(AnalysisService::new(pipeline, decision, context)),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Alchemist server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
