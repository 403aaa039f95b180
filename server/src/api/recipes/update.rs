use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::images::ensure_owned;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Recipe;
use crate::policy::{self, Action, Entity};
use crate::schema::recipes;
use crate::slug::slugify;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;
const MAX_SERVINGS_LEN: usize = 32;

/// Every field is optional; absent fields keep their current value. Setting
/// the title also re-derives the slug, so the recipe's public address moves.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub ingredients: Option<String>,
    pub tags: Option<String>,
    pub cooking_time_secs: Option<i64>,
    pub servings: Option<String>,
    /// Replaces the full category set when present.
    pub category_ids: Option<Vec<Uuid>>,
    /// Must name an image the caller uploaded.
    pub image_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub id: Uuid,
    /// The slug after the update; changes when the title does.
    pub slug: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
struct RecipeChanges<'a> {
    title: Option<&'a str>,
    slug: Option<&'a str>,
    content: Option<&'a str>,
    ingredients: Option<&'a str>,
    tags: Option<&'a str>,
    cooking_time_secs: Option<i64>,
    servings: Option<&'a str>,
    image_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
}

fn validate(request: &UpdateRecipeRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(title) = &request.title {
        let title = title.trim();
        if title.is_empty() {
            errors.push(FieldError {
                field: "title".to_string(),
                message: "Title cannot be empty".to_string(),
            });
        } else if title.len() > MAX_TITLE_LEN {
            errors.push(FieldError {
                field: "title".to_string(),
                message: format!("Title cannot exceed {} characters", MAX_TITLE_LEN),
            });
        } else if slugify(title).is_empty() {
            errors.push(FieldError {
                field: "title".to_string(),
                message: "Title must contain letters or digits".to_string(),
            });
        }
    }
    for (field, value) in [
        ("content", &request.content),
        ("ingredients", &request.ingredients),
    ] {
        if let Some(value) = value {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field: field.to_string(),
                    message: "Cannot be blanked".to_string(),
                });
            }
        }
    }
    if let Some(servings) = &request.servings {
        let servings = servings.trim();
        if servings.is_empty() {
            errors.push(FieldError {
                field: "servings".to_string(),
                message: "Cannot be blanked".to_string(),
            });
        } else if servings.len() > MAX_SERVINGS_LEN {
            errors.push(FieldError {
                field: "servings".to_string(),
                message: format!("Servings cannot exceed {} characters", MAX_SERVINGS_LEN),
            });
        }
    }
    if let Some(secs) = request.cooking_time_secs {
        if secs <= 0 {
            errors.push(FieldError {
                field: "cooking_time_secs".to_string(),
                message: "Cooking time must be positive".to_string(),
            });
        }
    }
    errors
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Recipe id")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "A recipe with this title already exists", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<UpdateRecipeResponse>, ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let mut conn = pool.get()?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if !policy::can(&user, Action::Edit, Entity::Recipe(&recipe)) {
        return Err(ApiError::Forbidden);
    }

    if let Some(image_id) = request.image_id {
        ensure_owned(&mut conn, image_id, user.id, "image_id")?;
    }

    let new_slug: Option<String> = request.title.as_deref().map(|t| slugify(t.trim()));
    let category_ids = request.category_ids.clone().map(super::dedup_ids);

    let updated = conn.transaction::<_, ApiError, _>(|conn| {
        let updated: Recipe = match diesel::update(recipes::table.find(recipe.id))
            .set(&RecipeChanges {
                title: request.title.as_deref().map(str::trim),
                slug: new_slug.as_deref(),
                content: request.content.as_deref().map(str::trim),
                ingredients: request.ingredients.as_deref().map(str::trim),
                tags: request.tags.as_deref().map(str::trim),
                cooking_time_secs: request.cooking_time_secs,
                servings: request.servings.as_deref().map(str::trim),
                image_id: request.image_id,
                updated_at: Utc::now(),
            })
            .returning(Recipe::as_returning())
            .get_result(conn)
        {
            Ok(recipe) => recipe,
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                return Err(ApiError::conflict(
                    "You already have a recipe with this title",
                ))
            }
            Err(e) => return Err(e.into()),
        };

        // Replacing the category set: drop the old links, write the new.
        if let Some(ids) = &category_ids {
            super::ensure_categories_exist(conn, ids)?;
            super::clear_category_links(recipe.id).execute(conn)?;
            super::link_categories(conn, recipe.id, ids)?;
        }

        Ok(updated)
    })?;

    Ok(Json(UpdateRecipeResponse {
        id: updated.id,
        slug: updated.slug,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_an_empty_update() {
        assert!(validate(&UpdateRecipeRequest::default()).is_empty());
    }

    #[test]
    fn rejects_blanking_the_title() {
        let request = UpdateRecipeRequest {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate(&request)[0].field, "title");
    }

    #[test]
    fn rejects_blanking_the_content() {
        let request = UpdateRecipeRequest {
            content: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validate(&request)[0].field, "content");
    }

    #[test]
    fn rejects_nonpositive_cooking_time() {
        let request = UpdateRecipeRequest {
            cooking_time_secs: Some(-5),
            ..Default::default()
        };
        assert_eq!(validate(&request)[0].field, "cooking_time_secs");
    }

    #[test]
    fn absent_fields_do_not_validate() {
        let request = UpdateRecipeRequest {
            tags: Some(String::new()),
            ..Default::default()
        };
        // Tags may be blanked; they are only search keywords.
        assert!(validate(&request).is_empty());
    }
}
