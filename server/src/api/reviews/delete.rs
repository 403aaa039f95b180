use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Review;
use crate::policy::{self, Action, Entity};
use crate::schema::reviews;
use crate::types::{review_fragment, FragmentUpdate};
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review deleted; tells the client which fragment to drop", body = FragmentUpdate),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the review's author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn delete_review(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FragmentUpdate>, ApiError> {
    let mut conn = pool.get()?;

    let review: Review = reviews::table
        .find(id)
        .select(Review::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Review"))?;

    if !policy::can(&user, Action::Delete, Entity::Review(&review)) {
        return Err(ApiError::Forbidden);
    }

    diesel::delete(reviews::table.find(review.id)).execute(&mut conn)?;

    Ok(Json(FragmentUpdate::deleted(review_fragment(review.id))))
}
