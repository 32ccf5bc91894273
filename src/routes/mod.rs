//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page is served at `/`; form posts for login, signup and logout each
//! run a full render cycle and answer with the re-rendered page.

pub mod page;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::view))
        .route("/login", post(page::login))
        .route("/signup", post(page::signup))
        .route("/logout", post(page::logout))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
