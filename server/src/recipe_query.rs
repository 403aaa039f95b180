//! Read-side queries over recipes, categories, and reviews.
//!
//! Builders here are pure: they assemble a query from a filter description
//! and never touch the connection until the caller loads the result, so a
//! filter can be built once and run repeatedly. Every listing carries the
//! aggregated average rating alongside the recipe row, and every ordering
//! ends with `created_at, id` tiebreakers so results are stable across
//! requests.

use diesel::dsl::{count, exists};
use diesel::expression::SqlLiteral;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Double, Nullable};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Category, Recipe, Review, User};
use crate::raw_sql;
use crate::schema::{categories, recipe_categories, recipes, reviews, saved_recipes, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Best-rated first; unrated recipes sink to the end.
    RatingDesc,
    /// Worst-rated first; unrated recipes still sink to the end.
    RatingAsc,
    TitleAsc,
    TitleDesc,
}

/// Conjunctive recipe filter. Empty fields do not constrain the result, so
/// the zero value selects every recipe in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Search terms, each matched against title, ingredients, and tags.
    /// A recipe matches if ANY term matches ANY of the three fields.
    pub terms: Vec<String>,
    /// Recipes must belong to at least one of these categories.
    pub category_ids: Vec<Uuid>,
    /// Upper bound on cooking time, inclusive.
    pub max_cooking_time_secs: Option<i64>,
    /// Restrict to recipes authored by this user.
    pub author_id: Option<Uuid>,
    pub sort: Option<SortBy>,
}

/// Splits a free-text query into its set of search terms. Terms are
/// whitespace-delimited, deduplicated, and sorted so the same query text
/// always produces the same filter.
pub fn parse_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = query.split_whitespace().map(str::to_owned).collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Builds a `%term%` pattern for ILIKE, escaping the pattern metacharacters
/// in the term itself so user input only ever matches literally.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub type RecipeWithRating = (Recipe, Option<f64>);

type WithRating = (
    diesel::dsl::AsSelect<Recipe, Pg>,
    SqlLiteral<Nullable<Double>>,
);

type RatedQuery = diesel::dsl::IntoBoxed<'static, diesel::dsl::Select<recipes::table, WithRating>, Pg>;

type RecipePredicate = Box<dyn BoxableExpression<recipes::table, Pg, SqlType = Bool>>;

fn with_rating() -> WithRating {
    (Recipe::as_select(), raw_sql::average_rating())
}

/// One term ORed across the three searchable text fields.
fn term_predicate(term: &str) -> RecipePredicate {
    let pattern = like_pattern(term);
    Box::new(
        recipes::title
            .ilike(pattern.clone())
            .or(recipes::ingredients.ilike(pattern.clone()))
            .or(recipes::tags.ilike(pattern)),
    )
}

fn filtered(filter: &RecipeFilter) -> RatedQuery {
    let mut query = recipes::table.select(with_rating()).into_boxed();

    let mut terms = filter.terms.iter();
    if let Some(first) = terms.next() {
        let predicate = terms.fold(term_predicate(first), |acc, term| {
            Box::new(acc.or(term_predicate(term)))
        });
        query = query.filter(predicate);
    }

    if !filter.category_ids.is_empty() {
        // EXISTS instead of a join: a recipe in several requested categories
        // still yields a single row.
        let ids = filter.category_ids.clone();
        query = query.filter(exists(
            recipe_categories::table
                .filter(recipe_categories::recipe_id.eq(recipes::id))
                .filter(recipe_categories::category_id.eq_any(ids)),
        ));
    }

    if let Some(max) = filter.max_cooking_time_secs {
        query = query.filter(recipes::cooking_time_secs.le(max));
    }

    if let Some(author_id) = filter.author_id {
        query = query.filter(recipes::author_id.eq(author_id));
    }

    sorted(query, filter.sort)
}

fn sorted(query: RatedQuery, sort: Option<SortBy>) -> RatedQuery {
    match sort {
        Some(SortBy::RatingDesc) => query
            .order(raw_sql::average_rating().desc().nulls_last())
            .then_order_by(recipes::created_at.asc())
            .then_order_by(recipes::id.asc()),
        Some(SortBy::RatingAsc) => query
            .order(raw_sql::average_rating().asc().nulls_last())
            .then_order_by(recipes::created_at.asc())
            .then_order_by(recipes::id.asc()),
        Some(SortBy::TitleAsc) => query
            .order(recipes::title.asc())
            .then_order_by(recipes::created_at.asc())
            .then_order_by(recipes::id.asc()),
        Some(SortBy::TitleDesc) => query
            .order(recipes::title.desc())
            .then_order_by(recipes::created_at.asc())
            .then_order_by(recipes::id.asc()),
        None => query
            .order(recipes::created_at.asc())
            .then_order_by(recipes::id.asc()),
    }
}

/// Runs a filter against the store.
pub fn search(conn: &mut PgConnection, filter: &RecipeFilter) -> QueryResult<Vec<RecipeWithRating>> {
    filtered(filter).load(conn)
}

/// Best-rated recipes for the home page.
pub fn top_rated(conn: &mut PgConnection, limit: i64) -> QueryResult<Vec<RecipeWithRating>> {
    recipes::table
        .order(raw_sql::average_rating().desc().nulls_last())
        .then_order_by(recipes::created_at.asc())
        .then_order_by(recipes::id.asc())
        .limit(limit)
        .select(with_rating())
        .load(conn)
}

/// All recipes belonging to a category, in insertion order.
pub fn in_category(conn: &mut PgConnection, category_id: Uuid) -> QueryResult<Vec<RecipeWithRating>> {
    recipes::table
        .filter(exists(
            recipe_categories::table
                .filter(recipe_categories::recipe_id.eq(recipes::id))
                .filter(recipe_categories::category_id.eq(category_id)),
        ))
        .order((recipes::created_at.asc(), recipes::id.asc()))
        .select(with_rating())
        .load(conn)
}

/// Recipes written by a user, best-rated first.
pub fn by_author(
    conn: &mut PgConnection,
    author_id: Uuid,
    limit: Option<i64>,
) -> QueryResult<Vec<RecipeWithRating>> {
    let mut query = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .order(raw_sql::average_rating().desc().nulls_last())
        .then_order_by(recipes::created_at.asc())
        .then_order_by(recipes::id.asc())
        .select(with_rating())
        .into_boxed();
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.load(conn)
}

/// Recipes a profile has saved, best-rated first.
pub fn saved_by_profile(
    conn: &mut PgConnection,
    profile_id: Uuid,
    limit: Option<i64>,
) -> QueryResult<Vec<RecipeWithRating>> {
    let mut query = recipes::table
        .inner_join(saved_recipes::table)
        .filter(saved_recipes::profile_id.eq(profile_id))
        .order(raw_sql::average_rating().desc().nulls_last())
        .then_order_by(recipes::created_at.asc())
        .then_order_by(recipes::id.asc())
        .select(with_rating())
        .into_boxed();
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.load(conn)
}

/// Looks up one recipe by its author and slug, the canonical public address.
pub fn find_by_author_slug(
    conn: &mut PgConnection,
    author_id: Uuid,
    slug: &str,
) -> QueryResult<Option<RecipeWithRating>> {
    recipes::table
        .filter(recipes::author_id.eq(author_id))
        .filter(recipes::slug.eq(slug))
        .select(with_rating())
        .first(conn)
        .optional()
}

/// Every category with its recipe count, most-populated first, name as the
/// tiebreaker. Categories with no recipes count zero rather than vanishing.
pub fn categories_with_counts(conn: &mut PgConnection) -> QueryResult<Vec<(Category, i64)>> {
    let mut rows: Vec<(Category, i64)> = categories::table
        .left_join(recipe_categories::table)
        .group_by(categories::id)
        .select((
            Category::as_select(),
            count(recipe_categories::recipe_id.nullable()),
        ))
        .load(conn)?;
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name)));
    Ok(rows)
}

/// The categories a recipe belongs to, alphabetical.
pub fn categories_of(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<Vec<Category>> {
    categories::table
        .inner_join(recipe_categories::table)
        .filter(recipe_categories::recipe_id.eq(recipe_id))
        .order(categories::name.asc())
        .select(Category::as_select())
        .load(conn)
}

/// Reviews of a recipe with their authors, oldest first.
pub fn reviews_for_recipe(
    conn: &mut PgConnection,
    recipe_id: Uuid,
) -> QueryResult<Vec<(Review, User)>> {
    reviews::table
        .inner_join(users::table)
        .filter(reviews::recipe_id.eq(recipe_id))
        .order((reviews::created_at.asc(), reviews::id.asc()))
        .select((Review::as_select(), User::as_select()))
        .load(conn)
}

/// Reviews a user has written, with the recipe each one is about.
pub fn reviews_by_author(
    conn: &mut PgConnection,
    author_id: Uuid,
    limit: Option<i64>,
) -> QueryResult<Vec<(Review, Recipe)>> {
    let mut query = reviews::table
        .inner_join(recipes::table)
        .filter(reviews::author_id.eq(author_id))
        .order((reviews::created_at.asc(), reviews::id.asc()))
        .select((Review::as_select(), Recipe::as_select()))
        .into_boxed();
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.load(conn)
}

pub fn has_reviewed(conn: &mut PgConnection, author_id: Uuid, recipe_id: Uuid) -> QueryResult<bool> {
    diesel::select(exists(
        reviews::table
            .filter(reviews::author_id.eq(author_id))
            .filter(reviews::recipe_id.eq(recipe_id)),
    ))
    .get_result(conn)
}

/// Whether a profile currently has a recipe saved.
pub fn is_saved(conn: &mut PgConnection, profile_id: Uuid, recipe_id: Uuid) -> QueryResult<bool> {
    diesel::select(exists(
        saved_recipes::table
            .filter(saved_recipes::profile_id.eq(profile_id))
            .filter(saved_recipes::recipe_id.eq(recipe_id)),
    ))
    .get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &RecipeFilter) -> String {
        diesel::debug_query::<Pg, _>(&filtered(filter)).to_string()
    }

    #[test]
    fn parse_terms_splits_on_whitespace() {
        assert_eq!(parse_terms("quick  bread"), vec!["bread", "quick"]);
    }

    #[test]
    fn parse_terms_deduplicates() {
        assert_eq!(parse_terms("rice rice rice"), vec!["rice"]);
    }

    #[test]
    fn parse_terms_of_blank_query_is_empty() {
        assert!(parse_terms("").is_empty());
        assert!(parse_terms("   ").is_empty());
    }

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("bread"), "%bread%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }

    #[test]
    fn empty_filter_selects_everything_in_insertion_order() {
        let sql = sql_for(&RecipeFilter::default());
        // The only WHERE belongs to the rating subquery in the select clause.
        assert_eq!(sql.matches("WHERE").count(), 1);
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains(r#""recipes"."created_at""#));
    }

    #[test]
    fn each_term_matches_title_ingredients_and_tags() {
        let filter = RecipeFilter {
            terms: vec!["bread".into()],
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert_eq!(sql.matches("ILIKE").count(), 3);
        assert!(sql.contains("%bread%"));
    }

    #[test]
    fn multiple_terms_are_disjunctive() {
        let filter = RecipeFilter {
            terms: parse_terms("quick bread"),
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert_eq!(sql.matches("ILIKE").count(), 6);
        assert!(sql.contains(" OR "));
        assert!(sql.contains("%quick%"));
        assert!(sql.contains("%bread%"));
    }

    #[test]
    fn category_filter_uses_exists_subquery() {
        let filter = RecipeFilter {
            category_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("recipe_categories"));
    }

    #[test]
    fn cooking_time_bound_is_inclusive() {
        let filter = RecipeFilter {
            max_cooking_time_secs: Some(600),
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("cooking_time_secs"));
        assert!(sql.contains("<="));
    }

    #[test]
    fn author_filter_constrains_author_column() {
        let filter = RecipeFilter {
            author_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(sql_for(&filter).contains("author_id"));
    }

    #[test]
    fn filters_combine_conjunctively() {
        let filter = RecipeFilter {
            terms: vec!["bread".into()],
            category_ids: vec![Uuid::new_v4()],
            max_cooking_time_secs: Some(600),
            author_id: Some(Uuid::new_v4()),
            sort: None,
        };
        let sql = sql_for(&filter);
        assert!(sql.matches(" AND ").count() >= 3);
        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("ILIKE"));
    }

    #[test]
    fn rating_sorts_put_unrated_last_in_both_directions() {
        for sort in [SortBy::RatingDesc, SortBy::RatingAsc] {
            let filter = RecipeFilter {
                sort: Some(sort),
                ..Default::default()
            };
            let sql = sql_for(&filter);
            assert!(sql.contains("AVG(reviews.rating)"));
            assert!(sql.contains("NULLS LAST"));
        }
    }

    #[test]
    fn every_sort_carries_deterministic_tiebreakers() {
        for sort in [
            Some(SortBy::RatingDesc),
            Some(SortBy::RatingAsc),
            Some(SortBy::TitleAsc),
            Some(SortBy::TitleDesc),
            None,
        ] {
            let filter = RecipeFilter {
                sort,
                ..Default::default()
            };
            let sql = sql_for(&filter);
            assert!(sql.contains(r#""recipes"."created_at""#));
            assert!(sql.contains(r#""recipes"."id""#));
        }
    }

    #[test]
    fn title_sorts_order_by_title_column() {
        let asc = RecipeFilter {
            sort: Some(SortBy::TitleAsc),
            ..Default::default()
        };
        let desc = RecipeFilter {
            sort: Some(SortBy::TitleDesc),
            ..Default::default()
        };
        assert!(sql_for(&asc).contains(r#""recipes"."title" ASC"#));
        assert!(sql_for(&desc).contains(r#""recipes"."title" DESC"#));
    }

    #[test]
    fn listings_select_the_average_rating_aggregate() {
        let sql = sql_for(&RecipeFilter::default());
        assert!(sql.contains("SELECT AVG(reviews.rating)"));
    }

    #[test]
    fn sort_names_deserialize_from_snake_case() {
        let sort: SortBy = serde_json::from_str("\"rating_desc\"").unwrap();
        assert_eq!(sort, SortBy::RatingDesc);
        let sort: SortBy = serde_json::from_str("\"title_asc\"").unwrap();
        assert_eq!(sort, SortBy::TitleAsc);
    }
}
