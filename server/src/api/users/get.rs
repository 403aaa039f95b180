use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::OptionalAuthUser;
use crate::db::DbPool;
use crate::models::{Profile, User};
use crate::recipe_query;
use crate::schema::{profiles, users};
use crate::types::{RecipeSummary, ReviewWithRecipe, UserSummary};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfileResponse {
    pub user: UserSummary,
    pub profile_id: Uuid,
    pub bio: String,
    pub picture_image_id: Option<Uuid>,
    /// The user's best-rated recipes, capped for the profile page.
    pub top_recipes: Vec<RecipeSummary>,
    /// The user's first few reviews, oldest first.
    pub reviews: Vec<ReviewWithRecipe>,
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileResponse),
        (status = 303, description = "Viewing yourself; use the account endpoint"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(pool): State<Arc<DbPool>>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    // Your own profile lives at the account endpoint, where the caps differ
    // and saved recipes are visible.
    if viewer.is_some_and(|v| v.id == user_id) {
        return Ok(Redirect::to("/api/account").into_response());
    }

    let mut conn = pool.get()?;

    let user: User = users::table
        .find(user_id)
        .filter(users::is_active.eq(true))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))?;

    let profile: Profile = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .select(Profile::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Profile"))?;

    let top_recipes = recipe_query::by_author(&mut conn, user.id, Some(super::PROFILE_RECIPE_COUNT))?;
    let reviews = recipe_query::reviews_by_author(&mut conn, user.id, Some(super::PROFILE_REVIEW_COUNT))?;

    Ok(Json(PublicProfileResponse {
        user: user.into(),
        profile_id: profile.id,
        bio: profile.bio,
        picture_image_id: profile.picture_image_id,
        top_recipes: top_recipes.into_iter().map(RecipeSummary::from_row).collect(),
        reviews: reviews.into_iter().map(ReviewWithRecipe::from_row).collect(),
    })
    .into_response())
}
