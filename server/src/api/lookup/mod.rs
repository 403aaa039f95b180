//! Typeahead endpoints backing the search form's category and author fields.

pub mod authors;
pub mod categories;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

/// Suggestions are capped to a short list the picker can always render.
pub const LOOKUP_LIMIT: i64 = 3;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LookupParams {
    /// Prefix or fragment typed so far. Blank means no suggestions.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LookupItem {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LookupResponse {
    pub results: Vec<LookupItem>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/lookup/categories", get(categories::lookup_categories))
        .route("/api/lookup/authors", get(authors::lookup_authors))
}

#[derive(OpenApi)]
#[openapi(
    paths(categories::lookup_categories, authors::lookup_authors),
    components(schemas(LookupItem, LookupResponse))
)]
pub struct ApiDoc;
