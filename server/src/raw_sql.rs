//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - No string concatenation or interpolation with user data

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::{Double, Nullable};

/// Correlated subquery computing the mean review rating for the current row
/// of `recipes`.
///
/// Yields SQL NULL (`None` after loading) for recipes with no reviews, which
/// keeps "unrated" distinct from any numeric score. Callers that order by
/// this expression pair it with `.nulls_last()` so unrated recipes sink to
/// the end in both directions.
///
/// # Safety
/// Static SQL string with no user input.
///
/// # Why raw SQL?
/// Diesel's DSL can't express a correlated scalar subquery in a select or
/// order clause, and `avg()` on an integer column would otherwise load as
/// `Numeric` rather than `f64`.
pub fn average_rating() -> SqlLiteral<Nullable<Double>> {
    sql::<Nullable<Double>>(
        "(SELECT AVG(reviews.rating)::float8 FROM reviews WHERE reviews.recipe_id = recipes.id)",
    )
}
