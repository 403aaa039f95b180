use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::recipe_query;
use crate::schema::users;
use crate::types::RecipeSummary;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/recipes",
    tag = "users",
    params(
        ("user_id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "The user's recipes, best-rated first", body = AuthorRecipesResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AuthorRecipesResponse>, ApiError> {
    let mut conn = pool.get()?;

    let author_exists: bool = diesel::select(diesel::dsl::exists(
        users::table
            .find(user_id)
            .filter(users::is_active.eq(true)),
    ))
    .get_result(&mut conn)?;
    if !author_exists {
        return Err(ApiError::NotFound("User"));
    }

    let recipes = recipe_query::by_author(&mut conn, user_id, Some(super::PROFILE_RECIPE_COUNT))?;

    Ok(Json(AuthorRecipesResponse {
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}
