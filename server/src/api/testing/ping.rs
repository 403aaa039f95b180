use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

/// Smoke test for the whole auth path: a valid token gets a pong with the
/// caller's username, anything else gets a 401.
#[utoipa::path(
    get,
    path = "/api/test/ping",
    tag = "testing",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated ping response", body = PingResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn ping(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(PingResponse {
        message: format!("pong {}", user.username),
    })
}
