use super::{LookupItem, LookupParams, LookupResponse, LOOKUP_LIMIT};
use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::recipe_query::like_pattern;
use crate::schema::categories;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/lookup/categories",
    tag = "browse",
    params(LookupParams),
    responses(
        (status = 200, description = "Up to three matching categories", body = LookupResponse)
    )
)]
pub async fn lookup_categories(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, ApiError> {
    let q = params.q.unwrap_or_default();
    let q = q.trim();
    if q.is_empty() {
        return Ok(Json(LookupResponse {
            results: Vec::new(),
        }));
    }

    let mut conn = pool.get()?;
    let rows: Vec<(Uuid, String)> = categories::table
        .filter(categories::name.ilike(like_pattern(q)))
        .order(categories::name.asc())
        .limit(LOOKUP_LIMIT)
        .select((categories::id, categories::name))
        .load(&mut conn)?;

    Ok(Json(LookupResponse {
        results: rows
            .into_iter()
            .map(|(id, text)| LookupItem { id, text })
            .collect(),
    }))
}
