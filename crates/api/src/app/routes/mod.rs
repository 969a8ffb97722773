use axum::{Router, routing::post};

pub mod products;
pub mod rpc;
pub mod system;

/// Router for the RPC endpoint.
pub fn router() -> Router {
    Router::new().route("/rpc", post(rpc::handle_rpc))
}
