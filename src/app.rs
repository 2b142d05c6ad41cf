use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::io;
use tracing::{error, info};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tab/:tab", get(handlers::select_tab))
        .route("/predict", post(handlers::predict))
        .route("/filters", post(handlers::apply_filters))
        .route("/filters/reset", post(handlers::reset_filters))
        .route("/api/state", get(handlers::get_state))
        .route("/api/predict", post(handlers::api_predict))
        .with_state(state)
}

/// Resolves once `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running until it is killed.
pub async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            error!(error = %err, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
