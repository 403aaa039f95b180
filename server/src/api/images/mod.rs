pub mod get;
pub mod upload;

use crate::api::error::ApiError;
use crate::schema::images;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;
use uuid::Uuid;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/images/{id}", get(get::get_image))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/images", post(upload::upload_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(upload::upload_image, get::get_image),
    components(schemas(upload::UploadImageRequest, upload::UploadImageResponse))
)]
pub struct ApiDoc;

/// Rejects image ids that do not exist or that belong to someone else, so a
/// recipe or profile can only ever point at its owner's uploads.
pub(super) fn ensure_owned(
    conn: &mut PgConnection,
    image_id: Uuid,
    owner_id: Uuid,
    field: &str,
) -> Result<(), ApiError> {
    let owned: bool = diesel::select(diesel::dsl::exists(
        images::table
            .find(image_id)
            .filter(images::owner_id.eq(owner_id)),
    ))
    .get_result(conn)?;
    if owned {
        Ok(())
    } else {
        Err(ApiError::validation(field, "Unknown image"))
    }
}
