pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list::list_categories))
        .route("/api/categories/{slug}", get(get::get_category))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_categories, get::get_category),
    components(schemas(list::ListCategoriesResponse, get::CategoryResponse))
)]
pub struct ApiDoc;
