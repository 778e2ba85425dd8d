//! # Validation Module
//!
//! Input rules checked before any row is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (serde)                                       │
//! │  └── Type validation (unknown location, wrong JSON types)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names non-empty and bounded                                       │
//! │  ├── Recipe numbers non-negative                                       │
//! │  └── Merge arguments meaningful                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(items.name), UNIQUE(barcodes.code)                         │
//! │  └── ON DELETE CASCADE for barcodes, ingredients, steps                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Barcodes are intentionally absent here: any string is a valid code.

use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{NewRecipe, RecipePatch};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 1000 characters
///
/// The name is stored exactly as given; uniqueness is case-sensitive.
///
/// ## Example
/// ```rust
/// use pantry_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Milk").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a recipe name. Same rules as item names.
pub fn validate_recipe_name(name: &str) -> ValidationResult<()> {
    validate_name("recipe name", name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn validate_non_negative(field: &str, value: Option<i64>) -> ValidationResult<()> {
    match value {
        Some(v) if v < 0 => Err(ValidationError::Negative {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates a recipe about to be created.
pub fn validate_new_recipe(recipe: &NewRecipe) -> ValidationResult<()> {
    validate_recipe_name(&recipe.name)?;
    validate_non_negative("servings", Some(recipe.servings))?;
    validate_non_negative("prep_time_minutes", recipe.prep_time_minutes)?;
    validate_non_negative("cook_time_minutes", recipe.cook_time_minutes)?;
    Ok(())
}

/// Validates the fields a patch would set.
pub fn validate_recipe_patch(patch: &RecipePatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_recipe_name(name)?;
    }
    validate_non_negative("servings", patch.servings)?;
    validate_non_negative("prep_time_minutes", patch.prep_time_minutes.flatten())?;
    validate_non_negative("cook_time_minutes", patch.cook_time_minutes.flatten())?;
    Ok(())
}

// =============================================================================
// Merge Arguments
// =============================================================================

/// Checks merge arguments and returns the distinct source ids, ascending.
///
/// ## Rules
/// - At least one source
/// - The target must not be one of the sources
///
/// Existence of the ids is checked by the store, inside the merge transaction.
///
/// ## Example
/// ```rust
/// use pantry_core::validation::validate_merge;
///
/// assert_eq!(validate_merge(1, &[3, 2, 3]).unwrap(), vec![2, 3]);
/// assert!(validate_merge(1, &[1, 2]).is_err());
/// ```
pub fn validate_merge(target_id: i64, source_ids: &[i64]) -> CoreResult<Vec<i64>> {
    if source_ids.is_empty() {
        return Err(CoreError::InvalidArgument(
            "source_ids must contain at least one item".to_string(),
        ));
    }

    if source_ids.contains(&target_id) {
        return Err(CoreError::InvalidArgument(format!(
            "target item {} cannot also be a source",
            target_id
        )));
    }

    let distinct: BTreeSet<i64> = source_ids.iter().copied().collect();
    Ok(distinct.into_iter().collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Milk").is_ok());
        assert!(validate_item_name("Crème fraîche").is_ok());

        assert!(matches!(
            validate_item_name(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_item_name(&"x".repeat(1001)),
            Err(ValidationError::TooLong { max: 1000, .. })
        ));
        assert!(validate_item_name(&"é".repeat(1000)).is_ok());
    }

    #[test]
    fn test_validate_new_recipe() {
        let mut recipe = NewRecipe::named("Soup");
        assert!(validate_new_recipe(&recipe).is_ok());

        recipe.cook_time_minutes = Some(-5);
        assert!(matches!(
            validate_new_recipe(&recipe),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_recipe_patch() {
        let patch = RecipePatch {
            servings: Some(6),
            prep_time_minutes: Some(None),
            ..Default::default()
        };
        assert!(validate_recipe_patch(&patch).is_ok());

        let patch = RecipePatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(validate_recipe_patch(&patch).is_err());
    }

    #[test]
    fn test_validate_merge() {
        assert_eq!(validate_merge(1, &[2]).unwrap(), vec![2]);
        assert_eq!(validate_merge(1, &[5, 2, 5]).unwrap(), vec![2, 5]);

        assert!(matches!(
            validate_merge(1, &[2, 1]),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_merge(1, &[]),
            Err(CoreError::InvalidArgument(_))
        ));
    }
}
