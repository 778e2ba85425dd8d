//! # HTTP Routes
//!
//! ```text
//! ┌───────────────────────────────────────┬──────────────┬────────────────┐
//! │ Path                                  │ Module       │ Backed by      │
//! ├───────────────────────────────────────┼──────────────┼────────────────┤
//! │ /api/health                           │ health       │ Database       │
//! │ /api/barcode/*                        │ barcodes     │ BarcodeRepo    │
//! │ /api/items*, /api/inventory, /grocery │ items        │ ItemRepo       │
//! │ /api/search                           │ items        │ ItemRepo       │
//! │ /api/recipes*                         │ recipes      │ RecipeRepo     │
//! │ /api/ai/*                             │ assist       │ RecipeAssistant│
//! │ /api/spoonacular/*                    │ assist       │ RecipeSource   │
//! │ /recipe/{id}                          │ pages        │ Renderer       │
//! └───────────────────────────────────────┴──────────────┴────────────────┘
//! ```

pub mod assist;
pub mod barcodes;
pub mod health;
pub mod items;
pub mod pages;
pub mod recipes;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/barcode/associate", post(barcodes::associate))
        .route("/api/barcode/{code}", get(barcodes::lookup))
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/merge", post(items::merge))
        .route(
            "/api/items/{id}",
            get(items::get).patch(items::update).delete(items::delete),
        )
        .route("/api/items/{id}/to-inventory", post(items::to_inventory))
        .route("/api/items/{id}/to-grocery", post(items::to_grocery))
        .route("/api/items/{id}/remove", post(items::remove))
        .route("/api/inventory", get(items::inventory))
        .route("/api/grocery", get(items::grocery))
        .route("/api/search", get(items::search))
        .route("/api/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/{id}",
            get(recipes::get)
                .patch(recipes::update_partial)
                .put(recipes::update_full)
                .delete(recipes::delete),
        )
        .route("/api/recipes/{id}/favorite", post(recipes::toggle_favorite))
        .route("/api/recipes/{id}/availability", get(recipes::availability))
        .route("/api/ai/recipe-suggestions", post(assist::recipe_suggestions))
        .route("/api/ai/grocery-suggestions", post(assist::grocery_suggestions))
        .route("/api/spoonacular/recipe/{id}", get(assist::spoonacular_recipe))
        .route("/api/spoonacular/discover", post(assist::discover))
        .route("/api/spoonacular/import/{id}", post(assist::import))
        .route("/recipe/{id}", get(pages::recipe_page))
}
