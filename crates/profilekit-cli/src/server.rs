//! HTTP server for the `serve` subcommand
//!
//! Routes:
//! - `GET /stats?platform=P&username=U` or `GET /stats?leetcode=a&gfg=b...`
//! - `GET /health`

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use profilekit::{Aggregator, StatsQuery, StatsResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared state passed to handlers via axum State
pub struct AppState {
    pub aggregator: Aggregator,
}

/// Build the router
pub fn router(aggregator: Aggregator) -> Router {
    let state = Arc::new(AppState { aggregator });

    Router::new()
        .route("/stats", get(handle_stats))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
///
/// Expired cache entries are purged once per TTL while serving.
pub async fn run(addr: &str, aggregator: Aggregator) -> std::io::Result<()> {
    if let Some(cache) = aggregator.cache() {
        cache.spawn_purger(cache.ttl());
    }
    let app = router(aggregator);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Stats server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

async fn handle_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<StatsResponse> {
    let query = StatsQuery::from_params(&params, &state.aggregator.platform_names());
    debug!(pairs = query.requests().len(), "Stats request");
    Json(state.aggregator.query(&query).await)
}

async fn handle_health() -> &'static str {
    "ok"
}
