pub mod create;
pub mod delete;
pub mod toggle_save;
pub mod update;

use crate::api::error::ApiError;
use crate::models::NewRecipeCategory;
use crate::schema::{categories, recipe_categories};
use crate::AppState;
use axum::routing::{post, put};
use axum::Router;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::ExecuteDsl;
use utoipa::OpenApi;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", post(create::create_recipe))
        .route(
            "/api/recipes/{id}",
            put(update::update_recipe).delete(delete::delete_recipe),
        )
        .route("/api/recipes/{id}/save", post(toggle_save::toggle_save))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        toggle_save::toggle_save,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        update::UpdateRecipeRequest,
        update::UpdateRecipeResponse,
    ))
)]
pub struct ApiDoc;

/// Category ids arrive from the client in arbitrary order, possibly with
/// repeats. One canonical form keeps the link rows unique.
fn dedup_ids(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn ensure_categories_exist(conn: &mut PgConnection, ids: &[Uuid]) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: i64 = categories::table
        .filter(categories::id.eq_any(ids))
        .count()
        .get_result(conn)?;
    if found != ids.len() as i64 {
        return Err(ApiError::validation("category_ids", "Unknown category"));
    }
    Ok(())
}

/// Delete statement dropping every category link a recipe has. Edits replace
/// the category set wholesale: the old links go unconditionally, then the
/// new set is inserted.
fn clear_category_links(
    recipe_id: Uuid,
) -> impl QueryFragment<Pg> + ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> {
    diesel::delete(recipe_categories::table.filter(recipe_categories::recipe_id.eq(recipe_id)))
}

fn link_categories(conn: &mut PgConnection, recipe_id: Uuid, ids: &[Uuid]) -> QueryResult<usize> {
    let links: Vec<NewRecipeCategory> = ids
        .iter()
        .map(|&category_id| NewRecipeCategory {
            recipe_id,
            category_id,
        })
        .collect();
    diesel::insert_into(recipe_categories::table)
        .values(&links)
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_ids_sorts_and_removes_repeats() {
        let a = Uuid::from_u128(3);
        let b = Uuid::from_u128(1);
        let ids = dedup_ids(vec![a, b, a, b, a]);
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn dedup_ids_keeps_an_empty_list_empty() {
        assert!(dedup_ids(Vec::new()).is_empty());
    }

    #[test]
    fn clearing_links_drops_the_whole_set_for_the_recipe() {
        let recipe_id = Uuid::from_u128(7);
        let sql = diesel::debug_query::<Pg, _>(&clear_category_links(recipe_id)).to_string();
        assert!(sql.starts_with(r#"DELETE FROM "recipe_categories""#));
        assert!(sql.contains(r#""recipe_categories"."recipe_id" ="#));
        // No category_id condition: replacement is a full clear, not a diff.
        assert!(!sql.contains("category_id"));
    }
}
