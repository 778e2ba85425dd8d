//! # Repository Module
//!
//! Database repository implementations for Pantry.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  db.items().merge(1, &[2, 3])                                  │
//! │       ▼                                                                 │
//! │  ItemRepository (item.rs + merge.rs)                                   │
//! │  ├── create / get / list / search                                      │
//! │  ├── rename / update / set_location / delete                           │
//! │  └── merge                                                             │
//! │  BarcodeRepository (barcode.rs)                                        │
//! │  ├── lookup                                                            │
//! │  └── associate                                                         │
//! │  RecipeRepository (recipe.rs)                                          │
//! │  ├── create / get / list / delete                                      │
//! │  ├── update_partial / update_full                                      │
//! │  └── toggle_favorite                                                   │
//! │       │                                                                 │
//! │       ▼  SQL                                                            │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Multi-statement operations open one transaction and pass
//! `&mut SqliteConnection` to the shared helpers in [`item`], so reads made
//! while checking a request see the same snapshot as the writes.

pub mod barcode;
pub mod item;
pub mod merge;
pub mod recipe;
