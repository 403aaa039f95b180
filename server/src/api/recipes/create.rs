use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::images::ensure_owned;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use crate::slug::slugify;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;
const MAX_SERVINGS_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub title: String,
    /// The preparation instructions.
    pub content: String,
    pub ingredients: String,
    /// Free-text search keywords, not shown to readers.
    #[serde(default)]
    pub tags: String,
    pub cooking_time_secs: i64,
    pub servings: String,
    /// Categories to file the recipe under.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// Must name an image the caller uploaded.
    pub image_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
    /// Derived from the title; forms the recipe's public address together
    /// with the author id.
    pub slug: String,
}

fn validate(request: &CreateRecipeRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let title = request.title.trim();
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
    for (field, value) in [
        ("content", &request.content),
        ("ingredients", &request.ingredients),
        ("servings", &request.servings),
    ] {
        if value.trim().is_empty() {
            errors.push(FieldError {
                field: field.to_string(),
                message: format!("{} cannot be empty", capitalized(field)),
            });
        }
    }
    if request.servings.trim().len() > MAX_SERVINGS_LEN {
        errors.push(FieldError {
            field: "servings".to_string(),
            message: format!("Servings cannot exceed {} characters", MAX_SERVINGS_LEN),
        });
    }
    if request.cooking_time_secs <= 0 {
        errors.push(FieldError {
            field: "cooking_time_secs".to_string(),
            message: "Cooking time must be positive".to_string(),
        });
    }
    errors
}

fn capitalized(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    security(("bearer_auth" = [])),
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "A recipe with this title already exists", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let slug = slugify(request.title.trim());
    let category_ids = super::dedup_ids(request.category_ids.clone());

    let mut conn = pool.get()?;

    if let Some(image_id) = request.image_id {
        ensure_owned(&mut conn, image_id, user.id, "image_id")?;
    }

    // The recipe and its category links land together or not at all.
    let recipe = conn.transaction::<_, ApiError, _>(|conn| {
        super::ensure_categories_exist(conn, &category_ids)?;

        let recipe: Recipe = match diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                title: request.title.trim(),
                slug: &slug,
                content: request.content.trim(),
                ingredients: request.ingredients.trim(),
                tags: request.tags.trim(),
                cooking_time_secs: request.cooking_time_secs,
                servings: request.servings.trim(),
                image_id: request.image_id,
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

        super::link_categories(conn, recipe.id, &category_ids)?;
        Ok(recipe)
    })?;

    tracing::info!("Created recipe {} ({})", recipe.id, recipe.slug);
    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            id: recipe.id,
            slug: recipe.slug,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: title.to_string(),
            content: "Put dough in oven.".to_string(),
            ingredients: "Flour, water, salt, yeast".to_string(),
            tags: "bread baking".to_string(),
            cooking_time_secs: 864_000,
            servings: "1".to_string(),
            category_ids: Vec::new(),
            image_id: None,
        }
    }

    #[test]
    fn accepts_a_reasonable_recipe() {
        assert!(validate(&request("Bread")).is_empty());
    }

    #[test]
    fn rejects_blank_title() {
        let errors = validate(&request("   "));
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn rejects_title_with_no_sluggable_characters() {
        let errors = validate(&request("!!!"));
        assert_eq!(errors[0].field, "title");
        assert!(errors[0].message.contains("letters or digits"));
    }

    #[test]
    fn rejects_overlong_title() {
        let errors = validate(&request(&"x".repeat(MAX_TITLE_LEN + 1)));
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn rejects_blank_content() {
        let mut req = request("Bread");
        req.content = "  ".to_string();
        let errors = validate(&req);
        assert_eq!(errors[0].field, "content");
    }

    #[test]
    fn rejects_nonpositive_cooking_time() {
        let mut req = request("Bread");
        req.cooking_time_secs = 0;
        let errors = validate(&req);
        assert_eq!(errors[0].field, "cooking_time_secs");
    }

    #[test]
    fn rejects_overlong_servings() {
        let mut req = request("Bread");
        req.servings = "x".repeat(MAX_SERVINGS_LEN + 1);
        let errors = validate(&req);
        assert_eq!(errors[0].field, "servings");
    }

    #[test]
    fn collects_multiple_field_errors() {
        let mut req = request("");
        req.ingredients = String::new();
        let fields: Vec<String> = validate(&req).into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"title".to_string()));
        assert!(fields.contains(&"ingredients".to_string()));
    }
}
