use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::dto::RpcEnvelope;
use crate::app::errors::{RpcError, RpcResult};
use crate::app::routes::products;
use crate::app::services::AppServices;
use crate::context::RequestContext;

/// `POST /rpc`: decode the envelope, route by pattern, encode the outcome.
///
/// Success is `200` with the operation's JSON result. Failure uses the error's
/// status as the HTTP status and `{status, message}` as the body.
pub async fn handle_rpc(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<RpcEnvelope>, JsonRejection>,
) -> Response {
    let envelope = match body {
        Ok(Json(envelope)) => envelope,
        Err(rejection) => {
            tracing::warn!(request_id = ctx.request_id(), "malformed rpc envelope: {rejection}");
            return RpcError::bad_request(format!("malformed message: {}", rejection.body_text()))
                .into_response();
        }
    };

    let cmd = envelope.cmd.clone();
    match dispatch(&services, envelope).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => {
            tracing::info!(
                request_id = ctx.request_id(),
                cmd = %cmd,
                status = err.status,
                "rpc request failed: {}",
                err.message
            );
            err.into_response()
        }
    }
}

/// Route one envelope to its pattern handler.
pub async fn dispatch(services: &AppServices, envelope: RpcEnvelope) -> RpcResult {
    let RpcEnvelope { cmd, payload } = envelope;

    match cmd.as_str() {
        products::CREATE_PRODUCT => products::create_product(services, payload).await,
        products::FIND_ALL_PRODUCTS => products::find_all_products(services, payload).await,
        products::FIND_ONE_PRODUCT => products::find_one_product(services, payload).await,
        products::UPDATE_PRODUCT => products::update_product(services, payload).await,
        products::DELETE_PRODUCT => products::delete_product(services, payload).await,
        products::VALIDATE_PRODUCTS => products::validate_products(services, payload).await,
        other => Err(RpcError::new(
            StatusCode::BAD_REQUEST,
            format!("unknown message pattern: {other}"),
        )),
    }
}
