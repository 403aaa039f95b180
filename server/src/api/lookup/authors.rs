use super::{LookupItem, LookupParams, LookupResponse, LOOKUP_LIMIT};
use crate::api::error::ApiError;
use crate::db::DbPool;
use crate::recipe_query::like_pattern;
use crate::schema::{profiles, users};
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/lookup/authors",
    tag = "browse",
    params(LookupParams),
    responses(
        (status = 200, description = "Up to three matching authors", body = LookupResponse)
    )
)]
pub async fn lookup_authors(
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
    // Ids here are profile ids, which is what the search author facet takes.
    let rows: Vec<(Uuid, String)> = profiles::table
        .inner_join(users::table)
        .filter(users::username.ilike(like_pattern(q)))
        .filter(users::is_active.eq(true))
        .order(users::username.asc())
        .limit(LOOKUP_LIMIT)
        .select((profiles::id, users::username))
        .load(&mut conn)?;

    Ok(Json(LookupResponse {
        results: rows
            .into_iter()
            .map(|(id, text)| LookupItem { id, text })
            .collect(),
    }))
}
