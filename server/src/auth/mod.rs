mod crypto;
mod db;
mod extractor;
mod middleware;

pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_session, delete_sessions_for_user};
pub use extractor::{AuthUser, OptionalAuthUser};
pub use middleware::require_auth;
