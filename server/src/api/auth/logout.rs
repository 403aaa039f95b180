use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::delete_session;
use crate::db::DbPool;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    // The auth middleware already validated this header; re-read it here to
    // know which session to revoke.
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        let mut conn = pool.get()?;
        delete_session(&mut conn, token)?;
    }

    Ok(StatusCode::NO_CONTENT)
}
