//! AI suggestions and recipe database endpoints.
//!
//! Each handler checks that its collaborator is configured before it
//! touches the database, so a missing key is always a 503.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use pantry_assist::{convert_to_local_recipe, AssistError, GrocerySuggestions, RecipeSuggestions};
use pantry_core::{ItemLocation, Recipe};

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_DISCOVER_COUNT: u32 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroceryQuery {
    pub preferences: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverRequest {
    #[serde(default)]
    pub number: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub recipes: Value,
    pub ingredients_used: Vec<String>,
    pub ingredients_english: Vec<String>,
}

async fn inventory_names(state: &AppState) -> ApiResult<Vec<String>> {
    let items = state.db.items().list(Some(ItemLocation::Inventory)).await?;
    Ok(items.into_iter().map(|i| i.name).collect())
}

/// `POST /api/ai/recipe-suggestions {query?}`
pub async fn recipe_suggestions(
    State(state): State<AppState>,
    body: Option<Json<SuggestRequest>>,
) -> ApiResult<Json<RecipeSuggestions>> {
    let assistant = state.require_assistant()?;
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let inventory = inventory_names(&state).await?;
    let suggestions = assistant
        .suggest_recipes(&inventory, request.query.as_deref())
        .await?;

    info!(count = suggestions.suggestions.len(), "Recipe suggestions generated");
    Ok(Json(suggestions))
}

/// `POST /api/ai/grocery-suggestions?preferences=`
pub async fn grocery_suggestions(
    State(state): State<AppState>,
    Query(query): Query<GroceryQuery>,
) -> ApiResult<Json<GrocerySuggestions>> {
    let assistant = state.require_assistant()?;

    let inventory = inventory_names(&state).await?;
    let favorites = state.db.recipes().list_favorites().await?;
    let suggestions = assistant
        .suggest_groceries(&inventory, &favorites, query.preferences.as_deref())
        .await?;

    info!(count = suggestions.suggestions.len(), "Grocery suggestions generated");
    Ok(Json(suggestions))
}

/// `GET /api/spoonacular/recipe/{id}`: passes the document through.
pub async fn spoonacular_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let source = state.require_recipe_source()?;
    Ok(Json(source.recipe_information(id).await?))
}

/// `POST /api/spoonacular/discover {number?}`
pub async fn discover(
    State(state): State<AppState>,
    body: Option<Json<DiscoverRequest>>,
) -> ApiResult<Json<DiscoverResponse>> {
    let source = state.require_recipe_source()?;
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let ingredients = inventory_names(&state).await?;
    if ingredients.is_empty() {
        return Err(AssistError::EmptyInventory.into());
    }

    let english = match &state.assistant {
        Some(assistant) => assistant.translate_ingredients(&ingredients).await,
        None => ingredients.clone(),
    };

    let number = request.number.unwrap_or(DEFAULT_DISCOVER_COUNT);
    let recipes = source.find_by_ingredients(&english, number).await?;

    Ok(Json(DiscoverResponse {
        recipes,
        ingredients_used: ingredients,
        ingredients_english: english,
    }))
}

/// `POST /api/spoonacular/import/{id}`: saves a catalogue recipe locally.
pub async fn import(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Recipe>> {
    let source = state.require_recipe_source()?;
    let document = source.recipe_information(id).await?;

    let mut local = match &state.assistant {
        Some(assistant) => match assistant.parse_recipe(&document).await {
            Ok(recipe) => recipe,
            Err(e) => {
                warn!(error = %e, spoonacular_id = id, "Model conversion failed, using built-in converter");
                convert_to_local_recipe(&document)
            }
        },
        None => convert_to_local_recipe(&document),
    };
    local.is_favorite = false;

    let recipe = state.db.recipes().create(&local).await?;
    info!(id = recipe.id, spoonacular_id = id, "Recipe imported");
    Ok(Json(recipe))
}
