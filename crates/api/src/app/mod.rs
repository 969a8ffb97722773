//! RPC application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store + catalog service construction
//! - `routes/`: the RPC endpoint, per-pattern handlers, health
//! - `dto.rs`: payload DTOs and their validation into domain types
//! - `errors.rs`: the `{status, message}` failure shape

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(
                    middleware::request_context_middleware,
                ))
                .layer(Extension(services)),
        )
}
