//! # pantry-db: Database Layer for Pantry
//!
//! This crate provides database access for Pantry.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pantry Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /api/items/merge)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pantry-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo       │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BarcodeRepo    │   │ 001_init.sql │  │   │
//! │  │   │               │    │ RecipeRepo     │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (pantry.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (items, barcodes, recipes)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_db::{Database, DbConfig};
//! use pantry_core::NewItem;
//!
//! let db = Database::new(DbConfig::new("pantry.db")).await?;
//!
//! let milk = db.items().create(&NewItem::named("Milk").with_barcode("111")).await?;
//! let found = db.barcodes().lookup("111").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::barcode::{BarcodeLookup, BarcodeRepository};
pub use repository::item::ItemRepository;
pub use repository::recipe::RecipeRepository;
