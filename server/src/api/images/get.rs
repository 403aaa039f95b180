use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::schema::images;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// Image rows never change once written, so clients may cache forever.
fn image_response(content_type: String, data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        data,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Image bytes in their original format"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut conn = pool.get()?;

    let (content_type, data): (String, Vec<u8>) = images::table
        .find(id)
        .select((images::content_type, images::data))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Image"))?;

    Ok(image_response(content_type, data))
}
