use crate::api::error::{ApiError, ValidationErrorResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::images::{sniff_content_type, MAX_FILE_SIZE};
use crate::models::NewImage;
use crate::schema::images;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadImageResponse {
    pub id: Uuid,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadImageRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Fixed messages only; whatever detail the multipart layer produced stays
/// in the log.
fn upload_read_error(status: StatusCode) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::validation("file", "File too large. Maximum size is 2MB")
    } else {
        ApiError::validation("file", "Failed to read upload")
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e.body_text());
    upload_read_error(e.status())
}

#[utoipa::path(
    post,
    path = "/api/images",
    tag = "images",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", content = UploadImageRequest),
    responses(
        (status = 201, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Missing, oversized, or unsupported file", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadImageResponse>), ApiError> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Err(ApiError::validation("file", "No file provided")),
        Err(e) => return Err(multipart_error(e)),
    };

    let data = field.bytes().await.map_err(multipart_error)?;

    if data.len() > MAX_FILE_SIZE {
        return Err(ApiError::validation(
            "file",
            &format!("File too large. Maximum size is {} bytes", MAX_FILE_SIZE),
        ));
    }

    // The client's declared content type is ignored; the stored type comes
    // from the bytes themselves.
    let content_type =
        sniff_content_type(&data).map_err(|reason| ApiError::validation("file", &reason))?;

    let mut conn = pool.get()?;

    let image_id: Uuid = diesel::insert_into(images::table)
        .values(&NewImage {
            owner_id: user.id,
            content_type: &content_type,
            data: &data,
        })
        .returning(images::id)
        .get_result(&mut conn)?;

    tracing::info!("Stored {} image {} ({} bytes)", content_type, image_id, data.len());
    Ok((StatusCode::CREATED, Json(UploadImageResponse { id: image_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_message(err: ApiError) -> String {
        match err {
            ApiError::Validation(mut fields) => fields.remove(0).message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_uploads_report_the_limit() {
        let message = field_message(upload_read_error(StatusCode::PAYLOAD_TOO_LARGE));
        assert_eq!(message, "File too large. Maximum size is 2MB");
    }

    #[test]
    fn other_read_failures_get_a_fixed_message() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR] {
            let message = field_message(upload_read_error(status));
            assert_eq!(message, "Failed to read upload");
        }
    }
}
