use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewReview, Review};
use crate::policy::{self, Action, Entity};
use crate::recipe_query;
use crate::schema::reviews;
use crate::types::ReviewSummary;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const ALREADY_REVIEWED: &str = "You have already reviewed this recipe";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub content: String,
    /// One to ten inclusive.
    pub rating: i32,
}

fn validate(request: &CreateReviewRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if request.content.trim().is_empty() {
        errors.push(FieldError {
            field: "content".to_string(),
            message: "Content cannot be empty".to_string(),
        });
    }
    if !(super::MIN_RATING..=super::MAX_RATING).contains(&request.rating) {
        errors.push(FieldError {
            field: "rating".to_string(),
            message: format!(
                "Rating must be between {} and {}",
                super::MIN_RATING,
                super::MAX_RATING
            ),
        });
    }
    errors
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/recipes/{recipe_slug}/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "Recipe author's user id"),
        ("recipe_slug" = String, Path, description = "Recipe slug, unique per author")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review posted", body = ReviewSummary),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Authors cannot review their own recipes", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already reviewed", body = ErrorResponse)
    )
)]
pub async fn create_review(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path((user_id, recipe_slug)): Path<(Uuid, String)>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewSummary>), ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let mut conn = pool.get()?;

    let (recipe, _) = recipe_query::find_by_author_slug(&mut conn, user_id, &recipe_slug)?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if !policy::can(&user, Action::Review, Entity::Recipe(&recipe)) {
        return Err(ApiError::Forbidden);
    }

    // One review per reviewer per recipe. The unique index backs this up
    // against a concurrent double-post.
    let review = conn.transaction::<_, ApiError, _>(|conn| {
        if recipe_query::has_reviewed(conn, user.id, recipe.id)? {
            return Err(ApiError::conflict(ALREADY_REVIEWED));
        }

        let review: Review = match diesel::insert_into(reviews::table)
            .values(&NewReview {
                author_id: user.id,
                recipe_id: recipe.id,
                content: request.content.trim(),
                rating: request.rating,
            })
            .returning(Review::as_returning())
            .get_result(conn)
        {
            Ok(review) => review,
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                return Err(ApiError::conflict(ALREADY_REVIEWED))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(review)
    })?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            content: "cool".to_string(),
            rating,
        }
    }

    #[test]
    fn accepts_every_rating_in_range() {
        for rating in super::super::MIN_RATING..=super::super::MAX_RATING {
            assert!(validate(&request(rating)).is_empty(), "rating {rating}");
        }
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for rating in [0, 11, -3] {
            let errors = validate(&request(rating));
            assert_eq!(errors[0].field, "rating", "rating {rating}");
        }
    }

    #[test]
    fn rejects_blank_content() {
        let mut req = request(7);
        req.content = "   ".to_string();
        let errors = validate(&req);
        assert_eq!(errors[0].field, "content");
    }
}
