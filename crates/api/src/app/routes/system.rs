use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use catalog_infra::StoreLifecycle;

use crate::app::services::AppServices;

/// Liveness plus store connectivity; 503 while the store handle is closed.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let connected = services.store().is_connected();
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if connected { "ok" } else { "degraded" },
            "store_connected": connected,
        })),
    )
}
