//! Prompt templates and model-output parsing.
//!
//! Every template asks the model for a bare JSON document. Models still
//! like to wrap answers in markdown fences, so [`parse_json`] strips them
//! before decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;

use pantry_core::Recipe;

use crate::error::{AssistError, AssistResult};

const EMPTY_INVENTORY: &str = "No items in inventory";
const NO_FAVORITES: &str = "No favorite recipes saved";

fn inventory_line(inventory: &[String]) -> String {
    if inventory.is_empty() {
        EMPTY_INVENTORY.to_string()
    } else {
        inventory.join(", ")
    }
}

pub fn recipe_suggestions_prompt(inventory: &[String], query: Option<&str>) -> String {
    let request = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => format!(
            "\nSPECIFIC REQUEST: {q}\n\
             Focus on recipes that match this request. For example:\n\
             - If the request mentions a cuisine (Italian, Asian, etc.), suggest dishes from that cuisine\n\
             - If it mentions a dish type (soup, salad, pasta, etc.), suggest that type of dish\n\
             - If it mentions dietary needs (vegetarian, low-carb, etc.), respect those constraints\n\
             - If it mentions time (quick, 30 minutes, etc.), suggest faster recipes\n"
        ),
        None => String::new(),
    };

    format!(
        r#"You are a helpful cooking assistant. Based on the following inventory items, suggest 3 recipes that can be made.

INVENTORY ITEMS:
{inventory}
{request}
For each recipe, provide:
1. A creative but descriptive name
2. A brief description (1-2 sentences)
3. Number of servings
4. Prep time in minutes
5. Cook time in minutes
6. List of ingredients with amounts and units
7. Step-by-step cooking instructions

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "suggestions": [
    {{
      "name": "Recipe Name",
      "description": "Brief description of the dish",
      "servings": 4,
      "prep_time_minutes": 15,
      "cook_time_minutes": 30,
      "ingredients": [
        {{"name": "ingredient name", "amount": "2", "unit": "cups", "notes": "diced"}}
      ],
      "steps": [
        {{"step_number": 1, "instruction": "First step..."}}
      ]
    }}
  ],
  "inventory_used": ["item1", "item2"]
}}

Provide exactly 3 recipe suggestions. Use ingredients from the inventory when possible, but you can suggest additional common pantry items if needed."#,
        inventory = inventory_line(inventory),
    )
}

pub fn grocery_suggestions_prompt(
    inventory: &[String],
    favorites: &[Recipe],
    preferences: Option<&str>,
) -> String {
    let recipes = if favorites.is_empty() {
        NO_FAVORITES.to_string()
    } else {
        favorites
            .iter()
            .map(|r| {
                let names: Vec<&str> = r.ingredients.iter().map(|i| i.name.as_str()).collect();
                format!("- {}: {}\n", r.name, names.join(", "))
            })
            .collect()
    };

    let preferences = match preferences.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("\n\nDietary preferences: {p}"),
        None => String::new(),
    };

    format!(
        r#"You are a helpful grocery shopping assistant. Based on the current inventory and favorite recipes, suggest items to add to the grocery list.

CURRENT INVENTORY:
{inventory}

FAVORITE RECIPES:
{recipes}
{preferences}

Analyze what ingredients are missing to make the favorite recipes, and suggest common staples that might be running low.

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "suggestions": [
    {{
      "item_name": "item to buy",
      "reason": "needed for Recipe Name, or general reason"
    }}
  ],
  "based_on_recipes": ["Recipe 1", "Recipe 2"],
  "current_inventory": ["item1", "item2"]
}}

Suggest 5-10 practical grocery items. Prioritize ingredients needed for favorite recipes that aren't in inventory."#,
        inventory = inventory_line(inventory),
    )
}

pub fn translate_prompt(ingredients: &[String]) -> String {
    let list = serde_json::to_string(ingredients).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"Translate the following grocery item names to simple English ingredient names suitable for a recipe search.
Keep names that are already English as they are. Drop brand names and package sizes.

ITEMS:
{list}

IMPORTANT: Respond ONLY with a JSON array of strings, one per input item, in the same order:
["ingredient1", "ingredient2"]"#
    )
}

pub fn import_prompt(recipe: &Value) -> String {
    let source = serde_json::to_string_pretty(recipe).unwrap_or_default();
    format!(
        r#"You are a helpful cooking assistant. Convert the following recipe data into a clean recipe.

RECIPE DATA:
{source}

Rules:
- Use a short plain-text description (1-2 sentences, no HTML)
- Keep ingredient amounts as plain strings (e.g. "1.5"), units short (e.g. "cups", "g")
- Write clear, numbered steps starting at 1

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "name": "Recipe Name",
  "description": "Brief description of the dish",
  "servings": 4,
  "prep_time_minutes": 15,
  "cook_time_minutes": 30,
  "ingredients": [
    {{"name": "ingredient name", "amount": "2", "unit": "cups", "notes": "diced"}}
  ],
  "steps": [
    {{"step_number": 1, "instruction": "First step..."}}
  ]
}}"#
    )
}

/// Removes a surrounding ```` ```json ```` / ```` ``` ```` fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let rest = if let Some(i) = text.find("```json") {
        &text[i + "```json".len()..]
    } else if let Some(i) = text.find("```") {
        &text[i + "```".len()..]
    } else {
        return text;
    };
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

/// Decodes a model answer into `T` after stripping code fences.
pub fn parse_json<T: DeserializeOwned>(service: &'static str, text: &str) -> AssistResult<T> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| AssistError::malformed(service, format!("invalid JSON from model: {e}")))
}
