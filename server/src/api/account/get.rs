use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Profile;
use crate::recipe_query;
use crate::schema::profiles;
use crate::types::{RecipeSummary, ReviewWithRecipe, UserSummary};
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub user: UserSummary,
    pub profile_id: Uuid,
    pub bio: String,
    pub picture_image_id: Option<Uuid>,
    /// The caller's best-rated recipes, capped for the account page.
    pub recipes: Vec<RecipeSummary>,
    /// Recipes the caller has saved, capped for the account page.
    pub saved_recipes: Vec<RecipeSummary>,
    /// Reviews the caller has written, oldest first, capped for the account
    /// page.
    pub reviews: Vec<ReviewWithRecipe>,
}

#[utoipa::path(
    get,
    path = "/api/account",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's own account page", body = AccountResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn get_account(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let mut conn = pool.get()?;

    let profile: Profile = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .select(Profile::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Profile"))?;

    let recipes = recipe_query::by_author(&mut conn, user.id, Some(super::ACCOUNT_ITEM_COUNT))?;
    let saved =
        recipe_query::saved_by_profile(&mut conn, profile.id, Some(super::ACCOUNT_ITEM_COUNT))?;
    let reviews =
        recipe_query::reviews_by_author(&mut conn, user.id, Some(super::ACCOUNT_ITEM_COUNT))?;

    Ok(Json(AccountResponse {
        user: user.into(),
        profile_id: profile.id,
        bio: profile.bio,
        picture_image_id: profile.picture_image_id,
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
        saved_recipes: saved.into_iter().map(RecipeSummary::from_row).collect(),
        reviews: reviews.into_iter().map(ReviewWithRecipe::from_row).collect(),
    }))
}
