pub mod api;
pub mod auth;
pub mod db;
pub mod images;
pub mod models;
pub mod policy;
pub mod raw_sql;
pub mod recipe_query;
pub mod schema;
pub mod slug;
pub mod telemetry;
pub mod types;

use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<db::DbPool>;
