//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use pantry_assist::{GeminiClient, LanguageModel, RecipeAssistant, RecipeSource, SpoonacularClient};
use pantry_db::Database;

use crate::config::PantryConfig;
use crate::error::{not_configured, ApiResult};
use crate::render::{HtmlRecipePage, RecipePageRenderer};

/// Cloned into every handler. Collaborators are `None` when their API key
/// is not configured.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub assistant: Option<RecipeAssistant>,
    pub recipe_source: Option<Arc<dyn RecipeSource>>,
    pub renderer: Arc<dyn RecipePageRenderer>,
}

impl AppState {
    /// State with no external services and the HTML renderer.
    pub fn new(db: Database) -> Self {
        AppState {
            db,
            assistant: None,
            recipe_source: None,
            renderer: Arc::new(HtmlRecipePage),
        }
    }

    /// Builds the clients the configuration has keys for.
    pub fn from_config(db: Database, config: &PantryConfig) -> Self {
        let mut state = AppState::new(db);

        if let Some(key) = config.gemini.key() {
            let mut client = GeminiClient::new(key).with_model(&config.gemini.model);
            if let Some(url) = &config.gemini.base_url {
                client = client.with_base_url(url);
            }
            info!(model = %client.model(), "Gemini configured");
            state = state.with_language_model(Arc::new(client));
        }

        if let Some(key) = config.spoonacular.key() {
            let timeout = Duration::from_secs(config.spoonacular.timeout_secs);
            let mut client = SpoonacularClient::with_timeout(key, timeout);
            if let Some(url) = &config.spoonacular.base_url {
                client = client.with_base_url(url);
            }
            info!("Spoonacular configured");
            state = state.with_recipe_source(Arc::new(client));
        }

        state
    }

    pub fn with_language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.assistant = Some(RecipeAssistant::new(model));
        self
    }

    pub fn with_recipe_source(mut self, source: Arc<dyn RecipeSource>) -> Self {
        self.recipe_source = Some(source);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn RecipePageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub(crate) fn require_assistant(&self) -> ApiResult<&RecipeAssistant> {
        self.assistant
            .as_ref()
            .ok_or_else(|| not_configured("Gemini", "GEMINI_API_KEY"))
    }

    pub(crate) fn require_recipe_source(&self) -> ApiResult<&dyn RecipeSource> {
        self.recipe_source
            .as_deref()
            .ok_or_else(|| not_configured("Spoonacular", "SPOONACULAR_API_KEY"))
    }
}
