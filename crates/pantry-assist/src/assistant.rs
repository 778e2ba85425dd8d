//! # Recipe Assistant
//!
//! Prompt-and-parse workflows on top of any [`LanguageModel`].
//!
//! ## Workflows
//! ```text
//! ┌────────────────────┬──────────────────────────┬──────────────────────────┐
//! │ Operation          │ Input                    │ Output                   │
//! ├────────────────────┼──────────────────────────┼──────────────────────────┤
//! │ suggest_recipes    │ inventory names, query?  │ RecipeSuggestions        │
//! │ suggest_groceries  │ inventory, favorites     │ GrocerySuggestions       │
//! │ translate          │ item names               │ English ingredient names │
//! │ parse_recipe       │ recipe database JSON     │ NewRecipe                │
//! └────────────────────┴──────────────────────────┴──────────────────────────┘
//! ```
//!
//! The assistant never touches the database. Callers load inventory and
//! favorites and decide what to persist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use pantry_core::{NewRecipe, Recipe};

use crate::error::{AssistError, AssistResult};
use crate::gemini::LanguageModel;
use crate::prompts;

const SERVICE: &str = "Gemini";

/// Recipes proposed from the current inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSuggestions {
    #[serde(default)]
    pub suggestions: Vec<NewRecipe>,
    #[serde(default)]
    pub inventory_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrocerySuggestion {
    pub item_name: String,
    #[serde(default)]
    pub reason: String,
}

/// Items to buy, with the context they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrocerySuggestions {
    #[serde(default)]
    pub suggestions: Vec<GrocerySuggestion>,
    #[serde(default)]
    pub based_on_recipes: Vec<String>,
    #[serde(default)]
    pub current_inventory: Vec<String>,
}

#[derive(Deserialize)]
struct RawGrocerySuggestions {
    #[serde(default)]
    suggestions: Vec<GrocerySuggestion>,
    based_on_recipes: Option<Vec<String>>,
    current_inventory: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct RecipeAssistant {
    model: Arc<dyn LanguageModel>,
}

impl RecipeAssistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        RecipeAssistant { model }
    }

    /// Proposes three recipes built around what is in stock.
    pub async fn suggest_recipes(
        &self,
        inventory: &[String],
        query: Option<&str>,
    ) -> AssistResult<RecipeSuggestions> {
        if inventory.is_empty() {
            return Err(AssistError::EmptyInventory);
        }

        let prompt = prompts::recipe_suggestions_prompt(inventory, query);
        let answer = self.model.generate(&prompt).await?;
        let mut parsed: RecipeSuggestions = prompts::parse_json(SERVICE, &answer)?;

        // Suggestions are proposals, never favorites until saved as such.
        for recipe in &mut parsed.suggestions {
            recipe.is_favorite = false;
        }

        debug!(count = parsed.suggestions.len(), "Parsed recipe suggestions");
        Ok(parsed)
    }

    /// Suggests grocery items from stock and favorite recipes.
    pub async fn suggest_groceries(
        &self,
        inventory: &[String],
        favorites: &[Recipe],
        preferences: Option<&str>,
    ) -> AssistResult<GrocerySuggestions> {
        let prompt = prompts::grocery_suggestions_prompt(inventory, favorites, preferences);
        let answer = self.model.generate(&prompt).await?;
        let raw: RawGrocerySuggestions = prompts::parse_json(SERVICE, &answer)?;

        let suggestions = GrocerySuggestions {
            suggestions: raw.suggestions,
            based_on_recipes: raw
                .based_on_recipes
                .unwrap_or_else(|| favorites.iter().map(|r| r.name.clone()).collect()),
            current_inventory: raw.current_inventory.unwrap_or_else(|| inventory.to_vec()),
        };

        debug!(count = suggestions.suggestions.len(), "Parsed grocery suggestions");
        Ok(suggestions)
    }

    /// Translates item names into English ingredient names.
    ///
    /// Returns the input unchanged when the model fails or answers with a
    /// list of the wrong length.
    pub async fn translate_ingredients(&self, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            return Vec::new();
        }

        let prompt = prompts::translate_prompt(names);
        let translated = match self.model.generate(&prompt).await {
            Ok(answer) => prompts::parse_json::<Vec<String>>(SERVICE, &answer),
            Err(e) => Err(e),
        };

        match translated {
            Ok(list) if list.len() == names.len() => list,
            Ok(list) => {
                warn!(
                    expected = names.len(),
                    got = list.len(),
                    "Translation length mismatch, using original names"
                );
                names.to_vec()
            }
            Err(e) => {
                warn!(error = %e, "Ingredient translation failed, using original names");
                names.to_vec()
            }
        }
    }

    /// Turns a recipe database document into a local recipe.
    pub async fn parse_recipe(&self, source: &Value) -> AssistResult<NewRecipe> {
        let prompt = prompts::import_prompt(source);
        let answer = self.model.generate(&prompt).await?;
        let mut recipe: NewRecipe = prompts::parse_json(SERVICE, &answer)?;
        recipe.is_favorite = false;
        Ok(recipe)
    }
}

impl std::fmt::Debug for RecipeAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeAssistant")
            .field("model", &self.model.name())
            .finish()
    }
}
