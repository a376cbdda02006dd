pub mod error;
pub mod pro;
pub mod trivia;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/trivia", trivia::router(state.clone()))
        .nest("/pro", pro::router(state))
}
