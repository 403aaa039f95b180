use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub token: String,
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Invalid credentials".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "paul", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account is disabled", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(users::username.eq(&request.username))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    // Same response for unknown users and wrong passwords.
    let Some(user) = user else {
        return Ok(invalid_credentials());
    };
    if !verify_password(&request.password, &user.password_hash) {
        return Ok(invalid_credentials());
    }

    if !user.is_active {
        return Ok((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Account is disabled".to_string(),
            }),
        )
            .into_response());
    }

    let token = create_session(&mut conn, user.id)?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            user_id: user.id,
            token,
        }),
    )
        .into_response())
}
