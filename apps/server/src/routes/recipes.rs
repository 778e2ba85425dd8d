use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use pantry_core::{Availability, InventoryIndex, ItemLocation, NewRecipe, Recipe, RecipePatch, RecipeUpdate};

use crate::error::ApiResult;
use crate::routes::items::Deleted;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub favorites_only: bool,
}

#[derive(Debug, Serialize)]
pub struct RecipeList {
    pub count: usize,
    pub recipes: Vec<Recipe>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<RecipeList>> {
    let recipes = state.db.recipes().list(query.favorites_only).await?;
    Ok(Json(RecipeList {
        count: recipes.len(),
        recipes,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewRecipe>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state.db.recipes().create(&new).await?;
    info!(id = recipe.id, ingredients = recipe.ingredients.len(), "Recipe created");
    Ok(Json(recipe))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Recipe>> {
    Ok(Json(state.db.recipes().get(id).await?))
}

/// `PATCH`: scalar fields only; ingredients and steps are untouched.
pub async fn update_partial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<RecipePatch>,
) -> ApiResult<Json<Recipe>> {
    Ok(Json(state.db.recipes().update_partial(id, &patch).await?))
}

/// `PUT`: scalar fields plus optional replacement of children.
pub async fn update_full(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<RecipeUpdate>,
) -> ApiResult<Json<Recipe>> {
    Ok(Json(state.db.recipes().update_full(id, update).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Deleted>> {
    state.db.recipes().delete(id).await?;
    info!(id = id, "Recipe deleted");
    Ok(Json(Deleted::new(id)))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Recipe>> {
    Ok(Json(state.db.recipes().toggle_favorite(id).await?))
}

pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Availability>> {
    let recipe = state.db.recipes().get(id).await?;
    let index = inventory_index(&state).await?;
    Ok(Json(Availability::of(&recipe.ingredients, &index)))
}

pub(crate) async fn inventory_index(state: &AppState) -> ApiResult<InventoryIndex> {
    let items = state.db.items().list(Some(ItemLocation::Inventory)).await?;
    Ok(InventoryIndex::from_items(&items))
}
