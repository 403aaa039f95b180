use crate::api::error::ApiError;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewSavedRecipe, Recipe};
use crate::policy::{self, Action, Entity};
use crate::schema::{profiles, recipes, saved_recipes};
use crate::types::{save_button_fragment, FragmentUpdate};
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// The write a toggle performs, decided purely from current membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveOp {
    Save,
    Unsave,
}

impl SaveOp {
    /// Membership after the write.
    fn membership(self) -> bool {
        matches!(self, SaveOp::Save)
    }
}

fn toggle_op(already_saved: bool) -> SaveOp {
    if already_saved {
        SaveOp::Unsave
    } else {
        SaveOp::Save
    }
}

/// Flips the caller's saved mark on a recipe. Saving an already-saved recipe
/// unsaves it, so the client can wire one button to one endpoint.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/save",
    tag = "recipes",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Recipe id")
    ),
    responses(
        (status = 200, description = "New saved state plus the button fragment to refresh", body = FragmentUpdate),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Recipe or profile not found", body = ErrorResponse)
    )
)]
pub async fn toggle_save(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FragmentUpdate>, ApiError> {
    let mut conn = pool.get()?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if !policy::can(&user, Action::ToggleSave, Entity::Recipe(&recipe)) {
        return Err(ApiError::Forbidden);
    }

    let profile_id: Uuid = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .select(profiles::id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Profile"))?;

    // Concurrent toggles race on the same link row; the transaction keeps
    // check and write together.
    let saved = conn.transaction::<_, ApiError, _>(|conn| {
        let already_saved: bool = diesel::select(diesel::dsl::exists(
            saved_recipes::table.find((profile_id, recipe.id)),
        ))
        .get_result(conn)?;

        let op = toggle_op(already_saved);
        match op {
            SaveOp::Unsave => {
                diesel::delete(saved_recipes::table.find((profile_id, recipe.id))).execute(conn)?;
            }
            SaveOp::Save => {
                diesel::insert_into(saved_recipes::table)
                    .values(&NewSavedRecipe {
                        profile_id,
                        recipe_id: recipe.id,
                    })
                    .execute(conn)?;
            }
        }
        Ok(op.membership())
    })?;

    Ok(Json(FragmentUpdate::saved(
        saved,
        save_button_fragment(recipe.id),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_saves_when_absent_and_unsaves_when_present() {
        assert_eq!(toggle_op(false), SaveOp::Save);
        assert_eq!(toggle_op(true), SaveOp::Unsave);
    }

    #[test]
    fn one_toggle_flips_and_two_restore_the_original_state() {
        for initial in [false, true] {
            let once = toggle_op(initial).membership();
            let twice = toggle_op(once).membership();
            assert_ne!(once, initial);
            assert_eq!(twice, initial);
        }
    }
}
