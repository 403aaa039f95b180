use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::recipe_query::{self, parse_terms, RecipeFilter, SortBy};
use crate::schema::profiles;
use crate::types::RecipeSummary;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query; whitespace-separated terms are ORed across title,
    /// ingredients, and tags.
    pub q: Option<String>,
    /// Comma-separated category ids; matches recipes in at least one.
    pub categories: Option<String>,
    /// Inclusive upper bound on cooking time.
    pub max_cooking_time_secs: Option<i64>,
    /// Profile id of an author to restrict to.
    pub author: Option<Uuid>,
    /// Result order; defaults to insertion order.
    pub sort: Option<SortBy>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub recipes: Vec<RecipeSummary>,
}

fn parse_category_ids(raw: &str) -> Result<Vec<Uuid>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part)
                .map_err(|_| ApiError::validation("categories", "Malformed category id"))
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/search",
    tag = "browse",
    params(SearchParams),
    responses(
        (status = 200, description = "Recipes matching every given filter", body = SearchResponse),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 404, description = "Unknown author profile", body = ErrorResponse)
    )
)]
pub async fn search(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut conn = pool.get()?;

    let mut filter = RecipeFilter {
        terms: params.q.as_deref().map(parse_terms).unwrap_or_default(),
        category_ids: params
            .categories
            .as_deref()
            .map(parse_category_ids)
            .transpose()?
            .unwrap_or_default(),
        max_cooking_time_secs: params.max_cooking_time_secs,
        author_id: None,
        sort: params.sort,
    };

    // The author facet arrives as a profile id; recipes hang off the user.
    if let Some(profile_id) = params.author {
        let author_id: Uuid = profiles::table
            .find(profile_id)
            .select(profiles::user_id)
            .first(&mut conn)
            .optional()?
            .ok_or(ApiError::NotFound("Author"))?;
        filter.author_id = Some(author_id);
    }

    let recipes = recipe_query::search(&mut conn, &filter)?;

    Ok(Json(SearchResponse {
        recipes: recipes.into_iter().map(RecipeSummary::from_row).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/search", get(search))
}

#[derive(OpenApi)]
#[openapi(paths(search), components(schemas(SearchResponse)))]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_category_ids(&format!("{a},{b}")).unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn tolerates_spaces_and_trailing_commas() {
        let a = Uuid::new_v4();
        let parsed = parse_category_ids(&format!(" {a} , ")).unwrap();
        assert_eq!(parsed, vec![a]);
    }

    #[test]
    fn empty_string_parses_to_no_ids() {
        assert!(parse_category_ids("").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_uuid_segments() {
        let err = parse_category_ids("baked").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
