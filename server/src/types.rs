use crate::models::{Category, Recipe, Review, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Recipe as it appears in listings: search results, category pages, the
/// home page's top-rated strip, and account views. Carries the aggregated
/// average rating so clients never recompute it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub cooking_time_secs: i64,
    pub servings: String,
    pub image_id: Option<Uuid>,
    /// Mean of all review ratings, `null` when the recipe has no reviews.
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl RecipeSummary {
    pub fn from_row((recipe, average_rating): (Recipe, Option<f64>)) -> Self {
        Self {
            id: recipe.id,
            author_id: recipe.author_id,
            title: recipe.title,
            slug: recipe.slug,
            cooking_time_secs: recipe.cooking_time_secs,
            servings: recipe.servings,
            image_id: recipe.image_id,
            average_rating,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_id: Option<Uuid>,
    pub recipe_count: i64,
}

impl CategorySummary {
    pub fn from_row((category, recipe_count): (Category, i64)) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            image_id: category.image_id,
            recipe_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub recipe_id: Uuid,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewSummary {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            author_id: review.author_id,
            recipe_id: review.recipe_id,
            content: review.content,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

/// A review joined with the recipe it is about, for "reviews I have
/// written" listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewWithRecipe {
    pub review: ReviewSummary,
    pub recipe_title: String,
    pub recipe_slug: String,
    pub recipe_author_id: Uuid,
}

impl ReviewWithRecipe {
    pub fn from_row((review, recipe): (Review, Recipe)) -> Self {
        Self {
            review: review.into(),
            recipe_title: recipe.title,
            recipe_slug: recipe.slug,
            recipe_author_id: recipe.author_id,
        }
    }
}

/// A review joined with its author, for rendering under a recipe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewWithAuthor {
    pub review: ReviewSummary,
    pub author_username: String,
}

impl ReviewWithAuthor {
    pub fn from_row((review, author): (Review, User)) -> Self {
        Self {
            review: review.into(),
            author_username: author.username,
        }
    }
}

/// Public-safe projection of a user row. Never exposes the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Tells the client what a mutation changed and which rendered fragment to
/// refresh, e.g. `{"deleted": true, "target": "#recipe-<id>"}` after a
/// recipe delete. Targets are stable fragment anchors derived from entity
/// ids.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FragmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    /// CSS selector of the fragment the client should refresh.
    pub target: String,
}

impl FragmentUpdate {
    pub fn deleted(target: String) -> Self {
        Self {
            deleted: Some(true),
            saved: None,
            target,
        }
    }

    pub fn saved(saved: bool, target: String) -> Self {
        Self {
            deleted: None,
            saved: Some(saved),
            target,
        }
    }
}

pub fn recipe_fragment(id: Uuid) -> String {
    format!("#recipe-{id}")
}

pub fn review_fragment(id: Uuid) -> String {
    format!("#review-{id}")
}

pub fn save_button_fragment(recipe_id: Uuid) -> String {
    format!("#save-recipe-button-{recipe_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_update_omits_unused_fields() {
        let id = Uuid::new_v4();
        let update = FragmentUpdate::deleted(recipe_fragment(id));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["deleted"], true);
        assert!(json.get("saved").is_none());
        assert_eq!(json["target"], format!("#recipe-{id}"));
    }

    #[test]
    fn save_fragment_targets_the_toggle_button() {
        let id = Uuid::new_v4();
        let update = FragmentUpdate::saved(false, save_button_fragment(id));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["saved"], false);
        assert!(json.get("deleted").is_none());
        assert_eq!(json["target"], format!("#save-recipe-button-{id}"));
    }
}
