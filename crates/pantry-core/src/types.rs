//! # Domain Types
//!
//! Core domain types used throughout Pantry.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │1 N│     Barcode     │   │  ItemLocation   │       │
//! │  │  ─────────────  │──►│  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  Inventory      │       │
//! │  │  name (unique)  │   │  code (unique)  │   │  GroceryList    │       │
//! │  │  location       │   │  item_id (FK)   │   │  Neither        │       │
//! │  └────────▲────────┘   └─────────────────┘   └─────────────────┘       │
//! │           ┆ weak link (nullable, no FK)                                 │
//! │  ┌────────┴─────────┐  ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ RecipeIngredient │N │     Recipe      │ N │   RecipeStep    │       │
//! │  │  ─────────────   │◄─│  ─────────────  │──►│  ─────────────  │       │
//! │  │  name, amount    │ 1│  name, servings │1  │  step_number    │       │
//! │  │  unit, notes     │  │  is_favorite    │   │  instruction    │       │
//! │  │  item_id?        │  │  created_at     │   │                 │       │
//! │  └──────────────────┘  └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Items are identified by an integer `id`, but their `name` is also unique
//! and is what users see. A barcode resolves to exactly one item.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::DEFAULT_SERVINGS;

// =============================================================================
// Item Location
// =============================================================================

/// Where an item currently is.
///
/// ## Transitions
/// Every state may move to every other state in one step; there is no
/// guarded workflow and no history.
/// ```text
///        ┌────────────┐
///   ┌───►│ Inventory  │◄───┐
///   │    └─────┬──────┘    │
///   │          ▼           │
/// ┌─┴───────┐     ┌────────┴─────┐
/// │ Neither │◄───►│ GroceryList  │
/// └─────────┘     └──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemLocation {
    /// The item is at home.
    Inventory,
    /// The item needs to be bought.
    GroceryList,
    /// The item is known but tracked in neither list.
    #[default]
    Neither,
}

impl ItemLocation {
    /// All locations, in display order.
    pub const ALL: [ItemLocation; 3] = [
        ItemLocation::Inventory,
        ItemLocation::GroceryList,
        ItemLocation::Neither,
    ];

    /// The wire/database name of the location.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemLocation::Inventory => "inventory",
            ItemLocation::GroceryList => "grocery_list",
            ItemLocation::Neither => "neither",
        }
    }
}

impl fmt::Display for ItemLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemLocation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemLocation::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "location".to_string(),
                reason: format!("expected inventory, grocery_list or neither, got '{}'", s),
            })
    }
}

// =============================================================================
// Item & Barcode
// =============================================================================

/// A scanned code that resolves to exactly one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Barcode {
    pub id: i64,
    /// The scanned string (UPC, EAN, anything). Not validated.
    pub code: String,
    /// Owning item.
    pub item_id: i64,
}

/// A trackable household item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: i64,
    /// Unique, case-sensitive.
    pub name: String,
    pub location: ItemLocation,
    /// Barcodes owned by this item, in association order.
    pub barcodes: Vec<Barcode>,
}

impl Item {
    /// Returns true if the item owns the given barcode.
    pub fn has_barcode(&self, code: &str) -> bool {
        self.barcodes.iter().any(|b| b.code == code)
    }
}

/// Payload for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub location: ItemLocation,
    /// Optional barcode to associate on creation.
    #[serde(default)]
    pub barcode: Option<String>,
}

impl NewItem {
    /// Creates a payload with the default location and no barcode.
    pub fn named(name: impl Into<String>) -> Self {
        NewItem {
            name: name.into(),
            location: ItemLocation::default(),
            barcode: None,
        }
    }

    /// Sets the initial location.
    pub fn at(mut self, location: ItemLocation) -> Self {
        self.location = location;
        self
    }

    /// Sets the barcode to associate on creation.
    pub fn with_barcode(mut self, code: impl Into<String>) -> Self {
        self.barcode = Some(code.into());
        self
    }
}

/// Partial item update (rename and/or move).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<ItemLocation>,
}

// =============================================================================
// Recipe
// =============================================================================

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    /// Free text; may or may not match an item name.
    pub name: String,
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    /// Weak link to an item, used only for availability matching.
    pub item_id: Option<i64>,
}

/// One instruction of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeStep {
    pub id: i64,
    pub recipe_id: i64,
    /// Caller-assigned; gaps and duplicates are kept as given.
    pub step_number: i64,
    pub instruction: String,
}

/// A saved recipe with its ingredients and steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub servings: i64,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub is_favorite: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Prep plus cook time, treating missing values as zero.
    pub fn total_time_minutes(&self) -> i64 {
        self.prep_time_minutes.unwrap_or(0) + self.cook_time_minutes.unwrap_or(0)
    }

    /// Steps ordered by step number (stable for duplicates).
    pub fn ordered_steps(&self) -> Vec<&RecipeStep> {
        let mut steps: Vec<&RecipeStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.step_number);
        steps
    }
}

/// Ingredient line as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub item_id: Option<i64>,
}

impl NewIngredient {
    pub fn named(name: impl Into<String>) -> Self {
        NewIngredient {
            name: name.into(),
            amount: None,
            unit: None,
            notes: None,
            item_id: None,
        }
    }
}

/// Step as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStep {
    pub step_number: i64,
    pub instruction: String,
}

impl NewStep {
    pub fn new(step_number: i64, instruction: impl Into<String>) -> Self {
        NewStep {
            step_number,
            instruction: instruction.into(),
        }
    }
}

fn default_servings() -> i64 {
    DEFAULT_SERVINGS
}

/// Payload for creating a recipe with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i64,
    #[serde(default)]
    pub prep_time_minutes: Option<i64>,
    #[serde(default)]
    pub cook_time_minutes: Option<i64>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
    #[serde(default)]
    pub steps: Vec<NewStep>,
}

impl NewRecipe {
    pub fn named(name: impl Into<String>) -> Self {
        NewRecipe {
            name: name.into(),
            description: None,
            servings: DEFAULT_SERVINGS,
            prep_time_minutes: None,
            cook_time_minutes: None,
            is_favorite: false,
            ingredients: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Accepts `"2"`, `2`, `1.5` or `null` for free-text quantities.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Amount>::deserialize(deserializer)?.map(|a| match a {
        Amount::Text(s) => s,
        Amount::Number(n) => n.to_string(),
    }))
}

/// Distinguishes `"field": null` (Some(None)) from an absent field (None).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Scalar recipe fields to change. Absent fields are left untouched.
///
/// Nullable columns use `Option<Option<T>>`: `None` keeps the stored value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub servings: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub prep_time_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub cook_time_minutes: Option<Option<i64>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl RecipePatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &RecipePatch::default()
    }
}

/// Full recipe update: scalar fields plus optional replacement children.
///
/// `ingredients: None` (field omitted) keeps the stored rows,
/// `Some(vec![])` deletes them all. Same for `steps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub servings: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub prep_time_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub cook_time_minutes: Option<Option<i64>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub ingredients: Option<Vec<NewIngredient>>,
    #[serde(default)]
    pub steps: Option<Vec<NewStep>>,
}

impl RecipeUpdate {
    /// Splits the update into its scalar part and its children.
    pub fn into_parts(self) -> (RecipePatch, Option<Vec<NewIngredient>>, Option<Vec<NewStep>>) {
        let patch = RecipePatch {
            name: self.name,
            description: self.description,
            servings: self.servings,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            is_favorite: self.is_favorite,
        };
        (patch, self.ingredients, self.steps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
