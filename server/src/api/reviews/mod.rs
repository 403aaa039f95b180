pub mod create;
pub mod delete;
pub mod update;

use crate::AppState;
use axum::routing::{post, put};
use axum::Router;
use utoipa::OpenApi;

/// Ratings run from one (inedible) to ten (perfect).
const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/{user_id}/recipes/{recipe_slug}/reviews",
            post(create::create_review),
        )
        .route(
            "/api/reviews/{id}",
            put(update::update_review).delete(delete::delete_review),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(create::create_review, update::update_review, delete::delete_review),
    components(schemas(create::CreateReviewRequest, update::UpdateReviewRequest))
)]
pub struct ApiDoc;
