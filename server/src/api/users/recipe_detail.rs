use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::OptionalAuthUser;
use crate::db::DbPool;
use crate::models::User;
use crate::policy::{self, Action, Entity};
use crate::recipe_query;
use crate::schema::{profiles, users};
use crate::types::ReviewWithAuthor;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub ingredients: String,
    pub tags: String,
    pub cooking_time_secs: i64,
    pub servings: String,
    pub image_id: Option<Uuid>,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub categories: Vec<CategoryRef>,
    /// All reviews of the recipe, oldest first.
    pub reviews: Vec<ReviewWithAuthor>,
    /// Whether the caller may post a review right now. False for anonymous
    /// viewers, the recipe's author, and anyone who already reviewed it.
    pub viewer_can_review: bool,
    /// Whether the caller currently has this recipe saved. Always false for
    /// anonymous viewers.
    pub viewer_has_saved: bool,
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/recipes/{recipe_slug}",
    tag = "users",
    params(
        ("user_id" = Uuid, Path, description = "Recipe author's user id"),
        ("recipe_slug" = String, Path, description = "Recipe slug, unique per author")
    ),
    responses(
        (status = 200, description = "Full recipe detail", body = RecipeDetailResponse),
        (status = 404, description = "User or recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(pool): State<Arc<DbPool>>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path((user_id, recipe_slug)): Path<(Uuid, String)>,
) -> Result<Json<RecipeDetailResponse>, ApiError> {
    let mut conn = pool.get()?;

    let author: User = users::table
        .find(user_id)
        .filter(users::is_active.eq(true))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))?;

    let (recipe, average_rating) =
        recipe_query::find_by_author_slug(&mut conn, author.id, &recipe_slug)?
            .ok_or(ApiError::NotFound("Recipe"))?;

    let categories = recipe_query::categories_of(&mut conn, recipe.id)?;
    let reviews = recipe_query::reviews_for_recipe(&mut conn, recipe.id)?;

    let mut viewer_can_review = false;
    let mut viewer_has_saved = false;
    if let Some(viewer) = &viewer {
        viewer_can_review = policy::can(viewer, Action::Review, Entity::Recipe(&recipe))
            && !recipe_query::has_reviewed(&mut conn, viewer.id, recipe.id)?;

        let profile_id: Option<Uuid> = profiles::table
            .filter(profiles::user_id.eq(viewer.id))
            .select(profiles::id)
            .first(&mut conn)
            .optional()?;
        if let Some(profile_id) = profile_id {
            viewer_has_saved = recipe_query::is_saved(&mut conn, profile_id, recipe.id)?;
        }
    }

    Ok(Json(RecipeDetailResponse {
        id: recipe.id,
        author_id: recipe.author_id,
        author_username: author.username,
        title: recipe.title,
        slug: recipe.slug,
        content: recipe.content,
        ingredients: recipe.ingredients,
        tags: recipe.tags,
        cooking_time_secs: recipe.cooking_time_secs,
        servings: recipe.servings,
        image_id: recipe.image_id,
        average_rating,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
        categories: categories
            .into_iter()
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name,
                slug: c.slug,
            })
            .collect(),
        reviews: reviews.into_iter().map(ReviewWithAuthor::from_row).collect(),
        viewer_can_review,
        viewer_has_saved,
    }))
}
