use crate::api::error::{ApiError, FieldError, ValidationErrorResponse};
use crate::api::ErrorResponse;
use crate::auth;
use crate::db::DbPool;
use crate::models::{NewProfile, NewUser};
use crate::schema::{profiles, users};
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Profile bio, stored alongside the new account.
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub token: String,
}

fn validate(request: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let username = request.username.trim();
    if username.is_empty() {
        errors.push(FieldError {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    } else if username.len() > MAX_NAME_LEN {
        errors.push(FieldError {
            field: "username".to_string(),
            message: format!("Username cannot exceed {} characters", MAX_NAME_LEN),
        });
    } else if username.chars().any(char::is_whitespace) {
        errors.push(FieldError {
            field: "username".to_string(),
            message: "Username cannot contain whitespace".to_string(),
        });
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password".to_string(),
            message: format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        });
    }
    for (field, value) in [
        ("first_name", &request.first_name),
        ("last_name", &request.last_name),
    ] {
        if value.trim().len() > MAX_NAME_LEN {
            errors.push(FieldError {
                field: field.to_string(),
                message: format!("Name cannot exceed {} characters", MAX_NAME_LEN),
            });
        }
    }
    errors
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session opened", body = SignupResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let field_errors = validate(&request);
    if !field_errors.is_empty() {
        return Err(ApiError::Validation(field_errors));
    }

    let password_hash = auth::hash_password(&request.password)
        .map_err(|_| ApiError::validation("password", "Password could not be hashed"))?;

    let mut conn = pool.get()?;

    // User, profile, and first session land together or not at all.
    let (user_id, token) = conn.transaction::<_, ApiError, _>(|conn| {
        let new_user = NewUser {
            username: request.username.trim(),
            password_hash: &password_hash,
            first_name: request.first_name.trim(),
            last_name: request.last_name.trim(),
        };

        let user_id: Uuid = match diesel::insert_into(users::table)
            .values(&new_user)
            .returning(users::id)
            .get_result(conn)
        {
            Ok(id) => id,
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                return Err(ApiError::conflict("Username already exists"))
            }
            Err(e) => return Err(e.into()),
        };

        diesel::insert_into(profiles::table)
            .values(&NewProfile {
                user_id,
                bio: request.bio.trim(),
                picture_image_id: None,
            })
            .execute(conn)?;

        let token = auth::create_session(conn, user_id)?;
        Ok((user_id, token))
    })?;

    Ok((StatusCode::CREATED, Json(SignupResponse { user_id, token })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
        }
    }

    #[test]
    fn accepts_a_reasonable_signup() {
        assert!(validate(&request("paul", "bakery-secrets")).is_empty());
    }

    #[test]
    fn rejects_blank_username() {
        let errors = validate(&request("   ", "bakery-secrets"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn rejects_username_with_whitespace() {
        let errors = validate(&request("paul smith", "bakery-secrets"));
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn rejects_short_password() {
        let errors = validate(&request("paul", "short"));
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn collects_multiple_field_errors() {
        let errors = validate(&request("", ""));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn rejects_overlong_names() {
        let mut req = request("paul", "bakery-secrets");
        req.first_name = "x".repeat(MAX_NAME_LEN + 1);
        let errors = validate(&req);
        assert_eq!(errors[0].field, "first_name");
    }
}
