use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::Category;
use crate::recipe_query;
use crate::schema::categories;
use crate::types::RecipeSummary;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Every recipe in the category, in insertion order.
    pub recipes: Vec<RecipeSummary>,
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    tag = "browse",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category with its recipes", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let mut conn = pool.get()?;

    let category: Category = categories::table
        .filter(categories::slug.eq(&slug))
        .select(Category::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Category"))?;

    let recipes = recipe_query::in_category(&mut conn, category.id)?;

    Ok(Json(CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        image_id: category.image_id,
        created_at: category.created_at,
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}
