pub mod login;
pub mod logout;
pub mod signup;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Unauthenticated entry points: account creation and login.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup::signup))
        .route("/api/auth/login", post(login::login))
}

/// Logout revokes the credential that authenticated it, so it lives behind
/// the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(signup::signup, login::login, logout::logout),
    components(schemas(
        signup::SignupRequest,
        signup::SignupResponse,
        login::LoginRequest,
        login::LoginResponse,
    ))
)]
pub struct ApiDoc;
