//! # Ingredient Availability
//!
//! Decides which recipe ingredients are currently in stock.
//!
//! An ingredient is available when its `item_id` points at an item in
//! INVENTORY. Ingredients without a usable link fall back to a
//! case-insensitive name match against inventory item names.
//!
//! ```text
//!   RecipeIngredient ──item_id──► Item (location == Inventory)?  ──yes──► available
//!          │                                   │ no / unset
//!          └──── lower(name) ∈ inventory names? ───────────────────yes──► available
//!                                                                  no ──► missing
//! ```

use std::collections::HashSet;

use serde::Serialize;
use ts_rs::TS;

use crate::types::{Item, ItemLocation, RecipeIngredient};

/// Snapshot of what is at home, built once per request.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex {
    ids: HashSet<i64>,
    names: HashSet<String>,
}

impl InventoryIndex {
    /// Indexes the items whose location is INVENTORY; others are ignored.
    pub fn from_items(items: &[Item]) -> Self {
        let mut index = InventoryIndex::default();
        for item in items.iter().filter(|i| i.location == ItemLocation::Inventory) {
            index.ids.insert(item.id);
            index.names.insert(item.name.to_lowercase());
        }
        index
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True if the ingredient is covered by the inventory.
    pub fn contains(&self, ingredient: &RecipeIngredient) -> bool {
        if let Some(item_id) = ingredient.item_id {
            if self.ids.contains(&item_id) {
                return true;
            }
        }
        self.names.contains(&ingredient.name.to_lowercase())
    }
}

/// Result of checking a recipe's ingredients against the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Availability {
    pub total: usize,
    /// Ingredient names in stock, in recipe order.
    pub available: Vec<String>,
    /// Ingredient names to buy, in recipe order.
    pub missing: Vec<String>,
}

impl Availability {
    pub fn of(ingredients: &[RecipeIngredient], index: &InventoryIndex) -> Self {
        let (available, missing): (Vec<&RecipeIngredient>, Vec<&RecipeIngredient>) =
            ingredients.iter().partition(|i| index.contains(i));

        Availability {
            total: ingredients.len(),
            available: available.into_iter().map(|i| i.name.clone()).collect(),
            missing: missing.into_iter().map(|i| i.name.clone()).collect(),
        }
    }

    /// True when nothing needs to be bought.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
