pub mod account;
pub mod auth;
pub mod categories;
pub mod error;
pub mod home;
pub mod images;
pub mod lookup;
pub mod recipes;
pub mod reviews;
pub mod search;
pub mod testing;
pub mod users;

use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

pub use error::ApiError;

use crate::recipe_query::SortBy;
use crate::types::{
    CategorySummary, FragmentUpdate, RecipeSummary, ReviewSummary, ReviewWithAuthor,
    ReviewWithRecipe, UserSummary,
};
use error::{FieldError, ValidationErrorResponse};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(components(schemas(
        ErrorResponse,
        FieldError,
        ValidationErrorResponse,
        RecipeSummary,
        CategorySummary,
        ReviewSummary,
        ReviewWithRecipe,
        ReviewWithAuthor,
        UserSummary,
        FragmentUpdate,
        SortBy,
    )))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Add security scheme
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        home::ApiDoc::openapi(),
        categories::ApiDoc::openapi(),
        search::ApiDoc::openapi(),
        lookup::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        account::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        reviews::ApiDoc::openapi(),
        images::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
