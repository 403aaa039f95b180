use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::recipe_query;
use crate::types::RecipeSummary;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
}

/// The uncapped version of the account page's recipe list.
#[utoipa::path(
    get,
    path = "/api/account/recipes",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All of the caller's recipes, best-rated first", body = AccountRecipesResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountRecipesResponse>, ApiError> {
    let mut conn = pool.get()?;
    let recipes = recipe_query::by_author(&mut conn, user.id, None)?;
    Ok(Json(AccountRecipesResponse {
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}
