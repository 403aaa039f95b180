use anyhow::{anyhow, Context, Result};
use diesel::prelude::*;
use trivet_server::auth;
use trivet_server::models::{NewCategory, NewProfile, NewRecipe, NewReview, NewUser};
use trivet_server::schema::{categories, profiles, recipes, reviews, users};
use trivet_server::slug::slugify;
use uuid::Uuid;

struct SeedCategory {
    name: &'static str,
    description: &'static str,
}

struct SeedRecipe {
    title: &'static str,
    content: &'static str,
    ingredients: &'static str,
    tags: &'static str,
    cooking_time_secs: i64,
    servings: &'static str,
}

struct SeedUser {
    username: &'static str,
    bio: &'static str,
    recipes: &'static [SeedRecipe],
}

struct SeedReview {
    reviewer: &'static str,
    recipe_author: &'static str,
    recipe_title: &'static str,
    content: &'static str,
    rating: i32,
}

const TEN_DAYS_SECS: i64 = 10 * 24 * 60 * 60;

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Baked",
        description: "Here find some amazing baked goods for all occasions that will have you \
                      and your guests wanting seconds!",
    },
    SeedCategory {
        name: "Fried",
        description: "Sometimes all you want is a traditional fry up. Find all your fried \
                      desires here!",
    },
    SeedCategory {
        name: "Breakfast",
        description: "From Croissants to Overnight oats, you'll find your morning craving in \
                      this category!",
    },
    SeedCategory {
        name: "Lunch",
        description: "How about some pasta? Oh or a salad! Or maybe even a toastie! Or maybe \
                      you're just looking for ways to spice up your packed lunch box. You can \
                      find all that and more here.",
    },
    SeedCategory {
        name: "Dinner",
        description: "Simple bolognese to steak or maybe even a Sunday roast. Find the \
                      tastiest meals for even the fusiest eaters below.",
    },
    SeedCategory {
        name: "Dessert",
        description: "Cake? Muffins? Pie? Fruit salad? Something delicious but healthy? Yes \
                      to all of it, please!",
    },
];

const USERS: &[SeedUser] = &[
    SeedUser {
        username: "paul",
        bio: "I like to cook!",
        recipes: &[SeedRecipe {
            title: "Bread",
            content: "Put dough in oven.",
            ingredients: "Flour, water, salt, yeast",
            tags: "bread baking",
            cooking_time_secs: TEN_DAYS_SECS,
            servings: "1",
        }],
    },
    SeedUser {
        username: "mrbean62",
        bio: "havin fun",
        recipes: &[],
    },
    SeedUser {
        username: "coolboy4572",
        bio: "havin more fun",
        recipes: &[SeedRecipe {
            title: "Rice",
            content: "Put rice in oil.",
            ingredients: "Rice, oil",
            tags: "rice",
            cooking_time_secs: TEN_DAYS_SECS,
            servings: "1",
        }],
    },
];

const REVIEWS: &[SeedReview] = &[SeedReview {
    reviewer: "coolboy4572",
    recipe_author: "paul",
    recipe_title: "Bread",
    content: "cool",
    rating: 10,
}];

/// Insert-or-refresh keyed on the unique name, so rerunning the seed picks
/// up description edits without duplicating rows.
fn upsert_category(conn: &mut PgConnection, seed: &SeedCategory) -> Result<Uuid> {
    let id = diesel::insert_into(categories::table)
        .values(&NewCategory {
            name: seed.name,
            slug: &slugify(seed.name),
            description: seed.description,
            image_id: None,
        })
        .on_conflict(categories::name)
        .do_update()
        .set(categories::description.eq(seed.description))
        .returning(categories::id)
        .get_result(conn)?;
    Ok(id)
}

fn get_or_create_user(conn: &mut PgConnection, seed: &SeedUser, password_hash: &str) -> Result<Uuid> {
    if let Some(id) = users::table
        .filter(users::username.eq(seed.username))
        .select(users::id)
        .first::<Uuid>(conn)
        .optional()?
    {
        println!("User '{}' already exists", seed.username);
        return Ok(id);
    }

    let id = diesel::insert_into(users::table)
        .values(&NewUser {
            username: seed.username,
            password_hash,
            first_name: "",
            last_name: "",
        })
        .returning(users::id)
        .get_result(conn)?;
    println!("Created user: {}", seed.username);
    Ok(id)
}

fn ensure_profile(conn: &mut PgConnection, user_id: Uuid, bio: &str) -> Result<()> {
    let exists: Option<Uuid> = profiles::table
        .filter(profiles::user_id.eq(user_id))
        .select(profiles::id)
        .first(conn)
        .optional()?;
    if exists.is_none() {
        diesel::insert_into(profiles::table)
            .values(&NewProfile {
                user_id,
                bio,
                picture_image_id: None,
            })
            .execute(conn)?;
    }
    Ok(())
}

fn get_or_create_recipe(conn: &mut PgConnection, author_id: Uuid, seed: &SeedRecipe) -> Result<Uuid> {
    let slug = slugify(seed.title);

    if let Some(id) = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .filter(recipes::slug.eq(&slug))
        .select(recipes::id)
        .first::<Uuid>(conn)
        .optional()?
    {
        return Ok(id);
    }

    let id = diesel::insert_into(recipes::table)
        .values(&NewRecipe {
            author_id,
            title: seed.title,
            slug: &slug,
            content: seed.content,
            ingredients: seed.ingredients,
            tags: seed.tags,
            cooking_time_secs: seed.cooking_time_secs,
            servings: seed.servings,
            image_id: None,
        })
        .returning(recipes::id)
        .get_result(conn)?;
    println!("  Created recipe: {}", seed.title);
    Ok(id)
}

fn user_id_by_username(conn: &mut PgConnection, username: &str) -> Result<Uuid> {
    users::table
        .filter(users::username.eq(username))
        .select(users::id)
        .first(conn)
        .with_context(|| format!("Seed user '{}' missing", username))
}

fn get_or_create_review(conn: &mut PgConnection, seed: &SeedReview) -> Result<()> {
    let reviewer_id = user_id_by_username(conn, seed.reviewer)?;
    let author_id = user_id_by_username(conn, seed.recipe_author)?;

    let recipe_id: Uuid = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .filter(recipes::slug.eq(slugify(seed.recipe_title)))
        .select(recipes::id)
        .first(conn)
        .with_context(|| format!("Seed recipe '{}' missing", seed.recipe_title))?;

    let exists: Option<Uuid> = reviews::table
        .filter(reviews::author_id.eq(reviewer_id))
        .filter(reviews::recipe_id.eq(recipe_id))
        .select(reviews::id)
        .first(conn)
        .optional()?;
    if exists.is_none() {
        diesel::insert_into(reviews::table)
            .values(&NewReview {
                author_id: reviewer_id,
                recipe_id,
                content: seed.content,
                rating: seed.rating,
            })
            .execute(conn)?;
        println!(
            "  Created review: {} on {} ({}/10)",
            seed.reviewer, seed.recipe_title, seed.rating
        );
    }
    Ok(())
}

pub fn seed(database_url: &str, password: &str) -> Result<()> {
    let mut conn =
        PgConnection::establish(database_url).context("Failed to connect to database")?;

    let password_hash =
        auth::hash_password(password).map_err(|e| anyhow!("Failed to hash seed password: {e}"))?;

    println!("Seeding {} categories...", CATEGORIES.len());
    for category in CATEGORIES {
        upsert_category(&mut conn, category)?;
    }

    println!("Seeding {} users...", USERS.len());
    for user in USERS {
        let user_id = get_or_create_user(&mut conn, user, &password_hash)?;
        ensure_profile(&mut conn, user_id, user.bio)?;
        for recipe in user.recipes {
            get_or_create_recipe(&mut conn, user_id, recipe)?;
        }
    }

    for review in REVIEWS {
        get_or_create_review(&mut conn, review)?;
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE");
    println!("{}", "=".repeat(50));
    let usernames: Vec<&str> = USERS.iter().map(|u| u.username).collect();
    println!("Users: {}", usernames.join(", "));
    println!("Password: {}", password);
    println!("{}", "=".repeat(50));

    Ok(())
}
