use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::recipe_query;
use crate::types::CategorySummary;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategorySummary>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "browse",
    responses(
        (status = 200, description = "All categories with recipe counts", body = ListCategoriesResponse)
    )
)]
pub async fn list_categories(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let mut conn = pool.get()?;
    let categories = recipe_query::categories_with_counts(&mut conn)?;

    Ok(Json(ListCategoriesResponse {
        categories: categories
            .into_iter()
            .map(CategorySummary::from_row)
            .collect(),
    }))
}
