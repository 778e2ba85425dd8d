//! # pantry-core: Pure Domain Logic for Pantry
//!
//! This crate holds the domain model of the home inventory: items and their
//! barcodes, the three item locations, recipes with ingredients and steps,
//! and the rules that do not need a database to be checked.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Pantry Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   HTTP API (apps/server)                        │   │
//! │  │   /api/items  /api/barcode  /api/recipes  /api/ai  /recipe/{id} │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pantry-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐  ┌────────────┐              │   │
//! │  │   │   types   │  │ availability │  │ validation │              │   │
//! │  │   │   Item    │  │ InventoryIdx │  │   names    │              │   │
//! │  │   │  Recipe   │  │ Availability │  │   merge    │              │   │
//! │  │   └───────────┘  └──────────────┘  └────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pantry-db (Database Layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Barcode, Recipe, ...) and input payloads
//! - [`availability`] - Which recipe ingredients are currently in stock
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules checked before touching the store
//!
//! ## Example Usage
//!
//! ```rust
//! use pantry_core::ItemLocation;
//!
//! let location: ItemLocation = "grocery_list".parse().unwrap();
//! assert_eq!(location, ItemLocation::GroceryList);
//! assert_eq!(ItemLocation::default(), ItemLocation::Neither);
//! ```

pub mod availability;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{Availability, InventoryIndex};
pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Servings assigned to a recipe when the caller does not provide any.
pub const DEFAULT_SERVINGS: i64 = 4;

/// Maximum length of an item or recipe name, in characters.
pub const MAX_NAME_LENGTH: usize = 1000;
