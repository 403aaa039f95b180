use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::recipe_query;
use crate::types::{CategorySummary, RecipeSummary};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// The front page shows a fixed-size strip of each.
const TOP_CATEGORY_COUNT: usize = 4;
const TOP_RECIPE_COUNT: i64 = 4;

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    /// Most-populated categories, largest first.
    pub top_categories: Vec<CategorySummary>,
    /// Best-rated recipes, unrated ones excluded only by ranking.
    pub top_recipes: Vec<RecipeSummary>,
}

#[utoipa::path(
    get,
    path = "/api/home",
    tag = "browse",
    responses(
        (status = 200, description = "Front-page highlights", body = HomeResponse)
    )
)]
pub async fn home(State(pool): State<Arc<DbPool>>) -> Result<Json<HomeResponse>, ApiError> {
    let mut conn = pool.get()?;

    let mut categories = recipe_query::categories_with_counts(&mut conn)?;
    categories.truncate(TOP_CATEGORY_COUNT);

    let recipes = recipe_query::top_rated(&mut conn, TOP_RECIPE_COUNT)?;

    Ok(Json(HomeResponse {
        top_categories: categories
            .into_iter()
            .map(CategorySummary::from_row)
            .collect(),
        top_recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/home", get(home))
}

#[derive(OpenApi)]
#[openapi(paths(home), components(schemas(HomeResponse)))]
pub struct ApiDoc;
