//! Ownership and permission rules.
//!
//! Every mutating handler asks this module whether the authenticated actor
//! may perform an action on an entity it has already loaded. The rules are
//! pure functions of the actor and the entity, so they can be tested without
//! a database and audited in one place.

use crate::models::{Profile, Recipe, Review, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Modify the entity in place.
    Edit,
    /// Remove the entity.
    Delete,
    /// Write a review of a recipe.
    Review,
    /// Toggle the actor's saved/favorite mark on a recipe.
    ToggleSave,
}

#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Recipe(&'a Recipe),
    Review(&'a Review),
    Profile(&'a Profile),
}

/// Returns whether `actor` may perform `action` on `entity`.
///
/// Edit and delete require ownership. Reviewing is open to everyone except
/// the recipe's own author. Saving is intentionally permissive: any
/// authenticated user may toggle any recipe, including their own.
pub fn can(actor: &User, action: Action, entity: Entity<'_>) -> bool {
    match (action, entity) {
        (Action::Edit | Action::Delete, Entity::Recipe(recipe)) => recipe.author_id == actor.id,
        (Action::Edit | Action::Delete, Entity::Review(review)) => review.author_id == actor.id,
        (Action::Edit | Action::Delete, Entity::Profile(profile)) => profile.user_id == actor.id,
        (Action::Review, Entity::Recipe(recipe)) => recipe.author_id != actor.id,
        (Action::Review, _) => false,
        (Action::ToggleSave, Entity::Recipe(_)) => true,
        (Action::ToggleSave, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(id: Uuid) -> User {
        User {
            id,
            username: format!("user-{id}"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn recipe(author_id: Uuid) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            author_id,
            title: "Bread".into(),
            slug: "bread".into(),
            content: "Put dough in oven.".into(),
            ingredients: "flour, water".into(),
            tags: String::new(),
            cooking_time_secs: 600,
            servings: "1".into(),
            image_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(author_id: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            author_id,
            recipe_id: Uuid::new_v4(),
            content: "cool".into(),
            rating: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn profile(user_id: Uuid) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id,
            bio: String::new(),
            picture_image_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_may_edit_and_delete_own_recipe() {
        let author = user(Uuid::new_v4());
        let r = recipe(author.id);
        assert!(can(&author, Action::Edit, Entity::Recipe(&r)));
        assert!(can(&author, Action::Delete, Entity::Recipe(&r)));
    }

    #[test]
    fn stranger_may_not_edit_or_delete_recipe() {
        let stranger = user(Uuid::new_v4());
        let r = recipe(Uuid::new_v4());
        assert!(!can(&stranger, Action::Edit, Entity::Recipe(&r)));
        assert!(!can(&stranger, Action::Delete, Entity::Recipe(&r)));
    }

    #[test]
    fn review_ownership_mirrors_recipe_ownership() {
        let author = user(Uuid::new_v4());
        let own = review(author.id);
        let other = review(Uuid::new_v4());
        assert!(can(&author, Action::Edit, Entity::Review(&own)));
        assert!(!can(&author, Action::Delete, Entity::Review(&other)));
    }

    #[test]
    fn author_may_not_review_own_recipe() {
        let author = user(Uuid::new_v4());
        let r = recipe(author.id);
        assert!(!can(&author, Action::Review, Entity::Recipe(&r)));
    }

    #[test]
    fn stranger_may_review_recipe() {
        let stranger = user(Uuid::new_v4());
        let r = recipe(Uuid::new_v4());
        assert!(can(&stranger, Action::Review, Entity::Recipe(&r)));
    }

    #[test]
    fn anyone_may_toggle_save_including_author() {
        let author = user(Uuid::new_v4());
        let stranger = user(Uuid::new_v4());
        let r = recipe(author.id);
        assert!(can(&author, Action::ToggleSave, Entity::Recipe(&r)));
        assert!(can(&stranger, Action::ToggleSave, Entity::Recipe(&r)));
    }

    #[test]
    fn profile_edits_require_the_owning_user() {
        let owner = user(Uuid::new_v4());
        let p = profile(owner.id);
        assert!(can(&owner, Action::Edit, Entity::Profile(&p)));
        assert!(!can(&user(Uuid::new_v4()), Action::Edit, Entity::Profile(&p)));
    }

    #[test]
    fn review_and_save_only_apply_to_recipes() {
        let actor = user(Uuid::new_v4());
        let p = profile(Uuid::new_v4());
        let rv = review(Uuid::new_v4());
        assert!(!can(&actor, Action::Review, Entity::Profile(&p)));
        assert!(!can(&actor, Action::ToggleSave, Entity::Review(&rv)));
    }
}
