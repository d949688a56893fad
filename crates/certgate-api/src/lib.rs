//! # certgate-api: Axum API Service
//!
//! HTTP surface over a single shared [`Ledger`](certgate_registry::Ledger).
//! Every mutating request is one ledger transaction in the next block.
//!
//! ## API Surface
//!
//! | Prefix                                  | Module                    | Domain          |
//! |-----------------------------------------|---------------------------|-----------------|
//! | `/v1/anchors`, `/v1/subjects/*/root*`   | [`routes::anchors`]       | State anchoring |
//! | `/v1/feedback`, `/v1/subjects/*/feedback*` | [`routes::feedback`]   | Gated feedback  |
//! | `/v1/credentials`, `/v1/subjects/*/credentials/*` | [`routes::credentials`] | Credential mint |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::anchors::router())
        .merge(routes::feedback::router())
        .merge(routes::credentials::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness check.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check. The ledger is in memory, so a running process is ready.
async fn readiness() -> &'static str {
    "ready"
}
