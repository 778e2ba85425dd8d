//! # pantry-assist
//!
//! External collaborators: a language model for suggestions and parsing,
//! and a recipe database for discovery and import.
//!
//! Both sit behind traits ([`LanguageModel`], [`RecipeSource`]) so the
//! server can run with either, both or neither configured, and tests can
//! substitute in-process fakes.

pub mod assistant;
pub mod convert;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod spoonacular;

pub use assistant::{GrocerySuggestion, GrocerySuggestions, RecipeAssistant, RecipeSuggestions};
pub use convert::convert_to_local_recipe;
pub use error::{AssistError, AssistResult};
pub use gemini::{GeminiClient, LanguageModel};
pub use spoonacular::{RecipeSource, SpoonacularClient};
