use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Review;
use crate::policy::{self, Action, Entity};
use crate::schema::reviews;
use crate::types::ReviewSummary;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Every field is optional; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub content: Option<String>,
    /// One to ten inclusive.
    pub rating: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::reviews)]
struct ReviewChanges<'a> {
    /// Re-bound to the caller on every edit.
    author_id: Uuid,
    content: Option<&'a str>,
    rating: Option<i32>,
    updated_at: DateTime<Utc>,
}

fn validate(request: &UpdateReviewRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(content) = &request.content {
        if content.trim().is_empty() {
            errors.push(FieldError {
                field: "content".to_string(),
                message: "Cannot be blanked".to_string(),
            });
        }
    }
    if let Some(rating) = request.rating {
        if !(super::MIN_RATING..=super::MAX_RATING).contains(&rating) {
            errors.push(FieldError {
                field: "rating".to_string(),
                message: format!(
                    "Rating must be between {} and {}",
                    super::MIN_RATING,
                    super::MAX_RATING
                ),
            });
        }
    }
    errors
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review id")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewSummary),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the review's author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn update_review(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewSummary>, ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let mut conn = pool.get()?;

    let review: Review = reviews::table
        .find(id)
        .select(Review::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Review"))?;

    if !policy::can(&user, Action::Edit, Entity::Review(&review)) {
        return Err(ApiError::Forbidden);
    }

    let updated: Review = diesel::update(reviews::table.find(review.id))
        .set(&ReviewChanges {
            author_id: user.id,
            content: request.content.as_deref().map(str::trim),
            rating: request.rating,
            updated_at: Utc::now(),
        })
        .returning(Review::as_returning())
        .get_result(&mut conn)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_an_empty_update() {
        assert!(validate(&UpdateReviewRequest::default()).is_empty());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let request = UpdateReviewRequest {
            rating: Some(11),
            ..Default::default()
        };
        assert_eq!(validate(&request)[0].field, "rating");
    }

    #[test]
    fn rejects_blanking_the_content() {
        let request = UpdateReviewRequest {
            content: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate(&request)[0].field, "content");
    }

    #[test]
    fn edits_rebind_the_author_to_the_caller() {
        let changes = ReviewChanges {
            author_id: Uuid::from_u128(3),
            content: Some("even better"),
            rating: None,
            updated_at: Utc::now(),
        };
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(
            &diesel::update(reviews::table.find(Uuid::from_u128(1))).set(&changes),
        )
        .to_string();
        assert!(sql.contains(r#""author_id" = "#));
    }
}
