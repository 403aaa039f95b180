use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::{self, AuthUser};
use crate::db::DbPool;
use crate::schema::users;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/account",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;

    // Log the user out everywhere first, then let the cascade take the
    // profile, recipes, reviews, saves, and images with the user row.
    conn.transaction::<_, ApiError, _>(|conn| {
        auth::delete_sessions_for_user(conn, user.id)?;
        diesel::delete(users::table.find(user.id)).execute(conn)?;
        Ok(())
    })?;

    tracing::info!("Deleted account {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}
