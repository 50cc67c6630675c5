//! Password reset endpoints.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;
use tanvan_core::PerformResetInput;

use crate::{middleware::AppState, response::ApiResponse};

/// Reset request by email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResetRequest {
    pub email: String,
}

/// Generic acknowledgement.
///
/// The same response is returned whether or not an account exists for the
/// address.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAcknowledgement {
    pub message: String,
}

/// Request a password-reset email.
async fn request_reset(
    State(state): State<AppState>,
    Json(req): Json<RequestResetRequest>,
) -> AppResult<ApiResponse<ResetAcknowledgement>> {
    state.reset_service.request_reset(&req.email).await?;

    Ok(ApiResponse::ok(ResetAcknowledgement {
        message: "check your inbox for password reset instructions".to_string(),
    }))
}

/// Confirmation result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmation {
    pub ok: bool,
}

/// Perform a password reset with a previously issued token.
async fn confirm_reset(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<PerformResetInput>,
) -> AppResult<ApiResponse<ResetConfirmation>> {
    state.reset_service.perform_reset(&token, req).await?;

    Ok(ApiResponse::ok(ResetConfirmation { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(request_reset))
        .route("/confirm/{token}", post(confirm_reset))
}
