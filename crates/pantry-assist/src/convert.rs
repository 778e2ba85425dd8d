//! Built-in Spoonacular → local recipe converter.
//!
//! Used for imports when no language model is configured, and as the
//! fallback when the model's answer cannot be parsed.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use pantry_core::{NewIngredient, NewRecipe, NewStep, DEFAULT_SERVINGS};

const UNTITLED: &str = "Untitled Recipe";
const MAX_DESCRIPTION_CHARS: usize = 500;

// Every field is read on its own: a value of the wrong type becomes `None`
// instead of discarding the whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpoonacularRecipe {
    #[serde(deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    summary: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    servings: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    preparation_minutes: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    cooking_minutes: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    ready_in_minutes: Option<i64>,
    #[serde(deserialize_with = "lenient_list")]
    extended_ingredients: Vec<SpoonacularIngredient>,
    #[serde(deserialize_with = "lenient_list")]
    analyzed_instructions: Vec<InstructionBlock>,
    #[serde(deserialize_with = "lenient")]
    instructions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpoonacularIngredient {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    original: Option<String>,
    #[serde(deserialize_with = "lenient")]
    amount: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    unit: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    meta: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstructionBlock {
    #[serde(deserialize_with = "lenient_list")]
    steps: Vec<InstructionStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstructionStep {
    #[serde(deserialize_with = "lenient")]
    step: Option<String>,
}

/// The value as `T`, or `None` if it has another type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Integers as given, fractional numbers rounded.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64)))
}

/// The elements that have the expected shape; anything but an array is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

static SENTENCE_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[.!?]\s+").ok());

fn strip_html(text: &str) -> String {
    match HTML_TAG.as_ref() {
        Some(re) => re.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Splits after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    if let Some(re) = SENTENCE_BREAK.as_ref() {
        for m in re.find_iter(text) {
            // keep the punctuation, drop the whitespace
            sentences.push(&text[start..m.start() + 1]);
            start = m.end();
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

/// `2.0` → `"2"`, `1.5` → `"1.5"`.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

fn convert_ingredient(ing: SpoonacularIngredient) -> Option<NewIngredient> {
    let name = non_empty(ing.name).or_else(|| non_empty(ing.original))?;
    Some(NewIngredient {
        amount: ing.amount.filter(|a| *a != 0.0).map(format_amount),
        unit: non_empty(ing.unit),
        notes: non_empty(ing.meta.into_iter().next()),
        ..NewIngredient::named(name)
    })
}

fn convert_steps(blocks: Vec<InstructionBlock>, instructions: Option<String>) -> Vec<String> {
    let analyzed: Vec<String> = blocks
        .into_iter()
        .flat_map(|b| b.steps)
        .filter_map(|s| non_empty(s.step))
        .collect();

    if !analyzed.is_empty() {
        return analyzed;
    }

    instructions
        .map(|text| split_sentences(&strip_html(&text)))
        .unwrap_or_default()
}

/// Converts a recipe information document into a local, non-favorite recipe.
pub fn convert_to_local_recipe(source: &Value) -> NewRecipe {
    let recipe: SpoonacularRecipe = match serde_json::from_value(source.clone()) {
        Ok(recipe) => recipe,
        Err(e) => {
            warn!(error = %e, "Recipe document is not an object, importing defaults");
            SpoonacularRecipe::default()
        }
    };

    let description = non_empty(recipe.summary.map(|s| strip_html(&s)))
        .map(|s| s.chars().take(MAX_DESCRIPTION_CHARS).collect());

    let ingredients = recipe
        .extended_ingredients
        .into_iter()
        .filter_map(convert_ingredient)
        .collect();

    let steps = convert_steps(recipe.analyzed_instructions, recipe.instructions)
        .into_iter()
        .enumerate()
        .map(|(i, text)| NewStep::new(i as i64 + 1, text))
        .collect();

    NewRecipe {
        description,
        servings: positive(recipe.servings).unwrap_or(DEFAULT_SERVINGS),
        prep_time_minutes: positive(recipe.preparation_minutes),
        cook_time_minutes: positive(recipe.cooking_minutes)
            .or_else(|| positive(recipe.ready_in_minutes)),
        is_favorite: false,
        ingredients,
        steps,
        ..NewRecipe::named(non_empty(recipe.title).unwrap_or_else(|| UNTITLED.to_string()))
    }
}
