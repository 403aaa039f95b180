use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::recipe_query;
use crate::schema::profiles;
use crate::types::RecipeSummary;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSavedResponse {
    pub recipes: Vec<RecipeSummary>,
}

/// The uncapped version of the account page's saved-recipe list.
#[utoipa::path(
    get,
    path = "/api/account/saved",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every recipe the caller has saved, best-rated first", body = AccountSavedResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn list_saved(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountSavedResponse>, ApiError> {
    let mut conn = pool.get()?;

    let profile_id: Uuid = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .select(profiles::id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Profile"))?;

    let recipes = recipe_query::saved_by_profile(&mut conn, profile_id, None)?;
    Ok(Json(AccountSavedResponse {
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}
