use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::recipe_query;
use crate::types::ReviewWithRecipe;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountReviewsResponse {
    pub reviews: Vec<ReviewWithRecipe>,
}

/// The uncapped version of the account page's review list.
#[utoipa::path(
    get,
    path = "/api/account/reviews",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reviews the caller has written, oldest first", body = AccountReviewsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_reviews(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountReviewsResponse>, ApiError> {
    let mut conn = pool.get()?;
    let reviews = recipe_query::reviews_by_author(&mut conn, user.id, None)?;
    Ok(Json(AccountReviewsResponse {
        reviews: reviews.into_iter().map(ReviewWithRecipe::from_row).collect(),
    }))
}
