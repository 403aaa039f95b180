pub mod ping;
pub mod unauthed_ping;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/test/unauthed-ping", get(unauthed_ping::unauthed_ping))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/test/ping", get(ping::ping))
}

#[derive(OpenApi)]
#[openapi(
    paths(ping::ping, unauthed_ping::unauthed_ping),
    components(schemas(ping::PingResponse, unauthed_ping::UnauthedPingResponse))
)]
pub struct ApiDoc;
