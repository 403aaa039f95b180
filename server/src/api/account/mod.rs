pub mod delete;
pub mod get;
pub mod recipes;
pub mod reviews;
pub mod saved;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// How many of each listing the account page shows before the caller must
/// ask for the dedicated endpoint.
const ACCOUNT_ITEM_COUNT: i64 = 4;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/account",
            get(get::get_account)
                .put(update::update_account)
                .delete(delete::delete_account),
        )
        .route("/api/account/recipes", get(recipes::list_recipes))
        .route("/api/account/reviews", get(reviews::list_reviews))
        .route("/api/account/saved", get(saved::list_saved))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get::get_account,
        update::update_account,
        delete::delete_account,
        recipes::list_recipes,
        reviews::list_reviews,
        saved::list_saved,
    ),
    components(schemas(
        get::AccountResponse,
        update::UpdateAccountRequest,
        update::UpdateAccountResponse,
        recipes::AccountRecipesResponse,
        reviews::AccountReviewsResponse,
        saved::AccountSavedResponse,
    ))
)]
pub struct ApiDoc;
