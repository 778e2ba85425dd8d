//! Spoonacular recipe database client.
//!
//! Responses are passed through as [`serde_json::Value`]: the server
//! forwards them unchanged and only the importer looks inside.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{AssistError, AssistResult};

const SERVICE: &str = "Spoonacular";
const API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound Spoonacular accepts for `number`.
pub const MAX_RESULTS: u32 = 100;

/// A searchable recipe catalogue.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Recipes that use the given ingredients, fewest missing first.
    async fn find_by_ingredients(&self, ingredients: &[String], number: u32) -> AssistResult<Value>;

    /// Full details of one catalogue recipe.
    async fn recipe_information(&self, id: i64) -> AssistResult<Value>;
}

pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SpoonacularClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        SpoonacularClient {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn read_json(response: Response) -> AssistResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Spoonacular API error");
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(AssistError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AssistError::malformed(SERVICE, e.without_url().to_string()))
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn find_by_ingredients(&self, ingredients: &[String], number: u32) -> AssistResult<Value> {
        let number = number.clamp(1, MAX_RESULTS).to_string();
        let joined = ingredients.join(",");
        debug!(ingredients = ingredients.len(), number = %number, "Searching Spoonacular by ingredients");

        let response = self
            .client
            .get(format!("{}/recipes/findByIngredients", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("ingredients", joined.as_str()),
                ("number", number.as_str()),
                ("ranking", "2"),
                ("ignorePantry", "true"),
            ])
            .send()
            .await
            .map_err(|e| AssistError::http(SERVICE, e))?;

        Self::read_json(response).await
    }

    async fn recipe_information(&self, id: i64) -> AssistResult<Value> {
        debug!(id = %id, "Fetching Spoonacular recipe");

        let response = self
            .client
            .get(format!("{}/recipes/{}/information", self.base_url, id))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("includeNutrition", "false")])
            .send()
            .await
            .map_err(|e| AssistError::http(SERVICE, e))?;

        Self::read_json(response).await
    }
}

impl fmt::Debug for SpoonacularClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpoonacularClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
