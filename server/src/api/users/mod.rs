pub mod get;
pub mod recipe_detail;
pub mod recipes;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// How many recipes a profile page shows, best-rated first.
const PROFILE_RECIPE_COUNT: i64 = 4;
/// How many of the user's reviews a profile page shows, oldest first.
const PROFILE_REVIEW_COUNT: i64 = 3;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/{user_id}", get(get::get_user))
        .route("/api/users/{user_id}/recipes", get(recipes::list_recipes))
        .route(
            "/api/users/{user_id}/recipes/{recipe_slug}",
            get(recipe_detail::get_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_user, recipes::list_recipes, recipe_detail::get_recipe),
    components(schemas(
        get::PublicProfileResponse,
        recipes::AuthorRecipesResponse,
        recipe_detail::RecipeDetailResponse,
        recipe_detail::CategoryRef,
    ))
)]
pub struct ApiDoc;
