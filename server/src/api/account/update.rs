use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::images::ensure_owned;
use crate::api::ErrorResponse;
use crate::auth::{self, AuthUser};
use crate::db::DbPool;
use crate::models::{Profile, User};
use crate::policy::{self, Action, Entity};
use crate::schema::{profiles, users};
use crate::types::UserSummary;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

/// Every field is optional; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    /// Must name an image the caller uploaded.
    pub picture_image_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateAccountResponse {
    pub user: UserSummary,
    pub bio: String,
    pub picture_image_id: Option<Uuid>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
struct UserChanges<'a> {
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    password_hash: Option<String>,
    updated_at: DateTime<Utc>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
struct ProfileChanges<'a> {
    bio: Option<&'a str>,
    picture_image_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
}

fn validate(request: &UpdateAccountRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(password) = &request.password {
        if password.len() < MIN_PASSWORD_LEN {
            errors.push(FieldError {
                field: "password".to_string(),
                message: format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            });
        }
    }
    for (field, value) in [
        ("first_name", &request.first_name),
        ("last_name", &request.last_name),
    ] {
        if let Some(value) = value {
            if value.trim().len() > MAX_NAME_LEN {
                errors.push(FieldError {
                    field: field.to_string(),
                    message: format!("Name cannot exceed {} characters", MAX_NAME_LEN),
                });
            }
        }
    }
    errors
}

#[utoipa::path(
    put,
    path = "/api/account",
    tag = "account",
    security(("bearer_auth" = [])),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = UpdateAccountResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not permitted", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn update_account(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<UpdateAccountResponse>, ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let mut conn = pool.get()?;

    let profile: Profile = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .select(Profile::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Profile"))?;

    if !policy::can(&user, Action::Edit, Entity::Profile(&profile)) {
        return Err(ApiError::Forbidden);
    }

    if let Some(image_id) = request.picture_image_id {
        ensure_owned(&mut conn, image_id, user.id, "picture_image_id")?;
    }

    let password_hash = match &request.password {
        Some(password) => Some(
            auth::hash_password(password)
                .map_err(|_| ApiError::validation("password", "Password could not be hashed"))?,
        ),
        None => None,
    };

    let touches_user =
        request.first_name.is_some() || request.last_name.is_some() || password_hash.is_some();
    let touches_profile = request.bio.is_some() || request.picture_image_id.is_some();

    let (updated_user, updated_profile) = conn.transaction::<_, ApiError, _>(|conn| {
        if touches_user {
            diesel::update(users::table.find(user.id))
                .set(&UserChanges {
                    first_name: request.first_name.as_deref().map(str::trim),
                    last_name: request.last_name.as_deref().map(str::trim),
                    password_hash,
                    updated_at: Utc::now(),
                })
                .execute(conn)?;
        }
        if touches_profile {
            diesel::update(profiles::table.find(profile.id))
                .set(&ProfileChanges {
                    bio: request.bio.as_deref().map(str::trim),
                    picture_image_id: request.picture_image_id,
                    updated_at: Utc::now(),
                })
                .execute(conn)?;
        }
        let updated_user: User = users::table
            .find(user.id)
            .select(User::as_select())
            .first(conn)?;
        let updated_profile: Profile = profiles::table
            .find(profile.id)
            .select(Profile::as_select())
            .first(conn)?;
        Ok((updated_user, updated_profile))
    })?;

    Ok(Json(UpdateAccountResponse {
        user: updated_user.into(),
        bio: updated_profile.bio,
        picture_image_id: updated_profile.picture_image_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_an_empty_update() {
        assert!(validate(&UpdateAccountRequest::default()).is_empty());
    }

    #[test]
    fn rejects_short_replacement_password() {
        let request = UpdateAccountRequest {
            password: Some("short".to_string()),
            ..Default::default()
        };
        let errors = validate(&request);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn rejects_overlong_names() {
        let request = UpdateAccountRequest {
            last_name: Some("x".repeat(MAX_NAME_LEN + 1)),
            ..Default::default()
        };
        let errors = validate(&request);
        assert_eq!(errors[0].field, "last_name");
    }

    #[test]
    fn absent_fields_do_not_validate() {
        let request = UpdateAccountRequest {
            bio: Some("I like to cook!".to_string()),
            ..Default::default()
        };
        assert!(validate(&request).is_empty());
    }
}
