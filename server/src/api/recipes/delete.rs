use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Recipe;
use crate::policy::{self, Action, Entity};
use crate::schema::recipes;
use crate::types::{recipe_fragment, FragmentUpdate};
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Recipe id")
    ),
    responses(
        (status = 200, description = "Recipe deleted; tells the client which fragment to drop", body = FragmentUpdate),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FragmentUpdate>, ApiError> {
    let mut conn = pool.get()?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if !policy::can(&user, Action::Delete, Entity::Recipe(&recipe)) {
        return Err(ApiError::Forbidden);
    }

    // Category links, reviews, and saves go with the row.
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    tracing::info!("Deleted recipe {}", recipe.id);
    Ok(Json(FragmentUpdate::deleted(recipe_fragment(recipe.id))))
}
