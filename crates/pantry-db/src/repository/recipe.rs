//! # Recipe Repository
//!
//! Database operations for recipes with their ingredient lines and steps.
//!
//! ## Update Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_partial(id, patch)                                             │
//! │    scalar fields present in the patch are written, children untouched  │
//! │                                                                         │
//! │  update_full(id, update)                                               │
//! │    scalars as above, then independently:                              │
//! │      ingredients: None     → rows kept                                 │
//! │      ingredients: Some([]) → rows deleted                              │
//! │      ingredients: Some(v)  → rows replaced by v                        │
//! │    (steps likewise)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recipes list newest first. Ingredients keep insertion order, steps are
//! ordered by `step_number`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pantry_core::validation::{validate_new_recipe, validate_recipe_patch};
use pantry_core::{
    NewIngredient, NewRecipe, NewStep, Recipe, RecipeIngredient, RecipePatch, RecipeStep,
    RecipeUpdate,
};

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    description: Option<String>,
    servings: i64,
    prep_time_minutes: Option<i64>,
    cook_time_minutes: Option<i64>,
    is_favorite: bool,
    created_at: DateTime<Utc>,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<RecipeIngredient>, steps: Vec<RecipeStep>) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            description: self.description,
            servings: self.servings,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            is_favorite: self.is_favorite,
            created_at: self.created_at,
            ingredients,
            steps,
        }
    }

    /// Overlays the fields present in `patch`.
    fn apply(&mut self, patch: &RecipePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(servings) = patch.servings {
            self.servings = servings;
        }
        if let Some(prep) = patch.prep_time_minutes {
            self.prep_time_minutes = prep;
        }
        if let Some(cook) = patch.cook_time_minutes {
            self.cook_time_minutes = cook;
        }
        if let Some(favorite) = patch.is_favorite {
            self.is_favorite = favorite;
        }
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

async fn find_row(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<RecipeRow>> {
    let row = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, name, description, servings, prep_time_minutes,
               cook_time_minutes, is_favorite, created_at
        FROM recipes
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

/// Loads ingredients and steps for all rows with one query each.
async fn with_children(conn: &mut SqliteConnection, rows: Vec<RecipeRow>) -> DbResult<Vec<Recipe>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let ids_json = serde_json::to_string(&ids)?;

    let ingredients = sqlx::query_as::<_, RecipeIngredient>(
        r#"
        SELECT id, recipe_id, name, amount, unit, notes, item_id
        FROM recipe_ingredients
        WHERE recipe_id IN (SELECT value FROM json_each(?1))
        ORDER BY id
        "#,
    )
    .bind(&ids_json)
    .fetch_all(&mut *conn)
    .await?;

    let steps = sqlx::query_as::<_, RecipeStep>(
        r#"
        SELECT id, recipe_id, step_number, instruction
        FROM recipe_steps
        WHERE recipe_id IN (SELECT value FROM json_each(?1))
        ORDER BY step_number, id
        "#,
    )
    .bind(&ids_json)
    .fetch_all(&mut *conn)
    .await?;

    let mut ingredients_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for ingredient in ingredients {
        ingredients_by_recipe
            .entry(ingredient.recipe_id)
            .or_default()
            .push(ingredient);
    }

    let mut steps_by_recipe: HashMap<i64, Vec<RecipeStep>> = HashMap::new();
    for step in steps {
        steps_by_recipe.entry(step.recipe_id).or_default().push(step);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let ingredients = ingredients_by_recipe.remove(&row.id).unwrap_or_default();
            let steps = steps_by_recipe.remove(&row.id).unwrap_or_default();
            row.into_recipe(ingredients, steps)
        })
        .collect())
}

async fn fetch_recipe(conn: &mut SqliteConnection, id: i64) -> DbResult<Recipe> {
    let row = find_row(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Recipe", id))?;

    let mut recipes = with_children(conn, vec![row]).await?;
    recipes
        .pop()
        .ok_or_else(|| DbError::Internal("recipe vanished while loading".to_string()))
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[NewIngredient],
) -> DbResult<()> {
    for ingredient in ingredients {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, name, amount, unit, notes, item_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(recipe_id)
        .bind(&ingredient.name)
        .bind(&ingredient.amount)
        .bind(&ingredient.unit)
        .bind(&ingredient.notes)
        .bind(ingredient.item_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_steps(conn: &mut SqliteConnection, recipe_id: i64, steps: &[NewStep]) -> DbResult<()> {
    for step in steps {
        sqlx::query(
            "INSERT INTO recipe_steps (recipe_id, step_number, instruction) VALUES (?1, ?2, ?3)",
        )
        .bind(recipe_id)
        .bind(step.step_number)
        .bind(&step.instruction)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Writes the patched scalar fields of an existing recipe.
async fn write_patch(conn: &mut SqliteConnection, id: i64, patch: &RecipePatch) -> DbResult<()> {
    let mut row = find_row(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Recipe", id))?;

    if patch.is_empty() {
        return Ok(());
    }
    row.apply(patch);

    sqlx::query(
        r#"
        UPDATE recipes SET
            name = ?2,
            description = ?3,
            servings = ?4,
            prep_time_minutes = ?5,
            cook_time_minutes = ?6,
            is_favorite = ?7
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(&row.name)
    .bind(&row.description)
    .bind(row.servings)
    .bind(row.prep_time_minutes)
    .bind(row.cook_time_minutes)
    .bind(row.is_favorite)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for recipe database operations.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    /// Creates a new RecipeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecipeRepository { pool }
    }

    /// Creates a recipe with its ingredients and steps in one transaction.
    pub async fn create(&self, new: &NewRecipe) -> DbResult<Recipe> {
        validate_new_recipe(new)?;

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO recipes (
                name, description, servings, prep_time_minutes,
                cook_time_minutes, is_favorite, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.servings)
        .bind(new.prep_time_minutes)
        .bind(new.cook_time_minutes)
        .bind(new.is_favorite)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_ingredients(&mut tx, id, &new.ingredients).await?;
        insert_steps(&mut tx, id, &new.steps).await?;

        let recipe = fetch_recipe(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = recipe.id,
            name = %recipe.name,
            ingredients = recipe.ingredients.len(),
            steps = recipe.steps.len(),
            "Recipe created"
        );
        Ok(recipe)
    }

    /// Gets a recipe with its children.
    pub async fn get(&self, id: i64) -> DbResult<Recipe> {
        let mut conn = self.pool.acquire().await?;
        fetch_recipe(&mut conn, id).await
    }

    /// Lists recipes, newest first.
    pub async fn list(&self, favorites_only: bool) -> DbResult<Vec<Recipe>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, description, servings, prep_time_minutes,
                   cook_time_minutes, is_favorite, created_at
            FROM recipes
            WHERE (?1 = 0 OR is_favorite = 1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(favorites_only)
        .fetch_all(&mut *conn)
        .await?;

        debug!(count = rows.len(), favorites_only = favorites_only, "Listed recipes");
        with_children(&mut conn, rows).await
    }

    /// Favorite recipes, newest first.
    pub async fn list_favorites(&self) -> DbResult<Vec<Recipe>> {
        self.list(true).await
    }

    /// Writes only the scalar fields present in `patch`.
    pub async fn update_partial(&self, id: i64, patch: &RecipePatch) -> DbResult<Recipe> {
        validate_recipe_patch(patch)?;

        let mut tx = self.pool.begin().await?;
        write_patch(&mut tx, id, patch).await?;

        let recipe = fetch_recipe(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = id, "Recipe patched");
        Ok(recipe)
    }

    /// Scalar update plus optional replace-all of ingredients and/or steps.
    pub async fn update_full(&self, id: i64, update: RecipeUpdate) -> DbResult<Recipe> {
        let (patch, ingredients, steps) = update.into_parts();
        validate_recipe_patch(&patch)?;

        let mut tx = self.pool.begin().await?;
        write_patch(&mut tx, id, &patch).await?;

        if let Some(ingredients) = &ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_ingredients(&mut tx, id, ingredients).await?;
        }

        if let Some(steps) = &steps {
            sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_steps(&mut tx, id, steps).await?;
        }

        let recipe = fetch_recipe(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = id,
            replaced_ingredients = ingredients.is_some(),
            replaced_steps = steps.is_some(),
            "Recipe updated"
        );
        Ok(recipe)
    }

    /// Deletes a recipe; ingredients and steps cascade.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        info!(id = id, "Recipe deleted");
        Ok(())
    }

    /// Flips `is_favorite` and returns the recipe in its new state.
    pub async fn toggle_favorite(&self, id: i64) -> DbResult<Recipe> {
        let result = sqlx::query(
            "UPDATE recipes SET is_favorite = CASE is_favorite WHEN 0 THEN 1 ELSE 0 END WHERE id = ?1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        let recipe = self.get(id).await?;
        debug!(id = id, is_favorite = recipe.is_favorite, "Favorite toggled");
        Ok(recipe)
    }

    /// Total number of recipes.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
