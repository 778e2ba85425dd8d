//! Helpers for driving the router without binding a socket.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use pantry_assist::{AssistError, AssistResult, LanguageModel, RecipeSource};
use pantry_db::{Database, DbConfig};
use pantry_server::{router, AppState};

pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub async fn test_state() -> AppState {
    AppState::new(test_db().await)
}

pub async fn test_app() -> Router {
    router(test_state().await)
}

/// Builds and executes one request against a router.
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    body: Option<String>,
}

impl AxumTestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn patch(uri: &str) -> Self {
        Self::new(Method::PATCH, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_string(data).expect("serialize request body"));
        self
    }

    pub async fn send(self, app: &Router) -> AxumTestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if self.body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }

        let request = builder
            .body(Body::from(self.body.unwrap_or_default()))
            .expect("build request");

        let response = app.clone().oneshot(request).await.expect("execute request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body")
            .to_vec();

        AxumTestResponse {
            status,
            content_type,
            body,
        }
    }
}

pub struct AxumTestResponse {
    pub status: StatusCode,
    pub content_type: String,
    body: Vec<u8>,
}

impl AxumTestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "invalid JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn value(&self) -> Value {
        self.json()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `message` of an error response.
    pub fn message(&self) -> String {
        self.value()["message"].as_str().unwrap_or_default().to_string()
    }

    pub fn code(&self) -> String {
        self.value()["code"].as_str().unwrap_or_default().to_string()
    }
}

// =============================================================================
// Fake collaborators
// =============================================================================

/// Answers every prompt with the next queued reply.
pub struct ScriptedModel {
    replies: Mutex<Vec<AssistResult<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<AssistResult<String>>) -> Arc<Self> {
        Arc::new(ScriptedModel {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing() -> Arc<Self> {
        Self::new(vec![Err(AssistError::Api {
            service: "fake",
            status: 500,
            message: "model unavailable".to_string(),
        })])
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> AssistResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| {
                Err(AssistError::MalformedResponse {
                    service: "fake",
                    message: "no reply queued".to_string(),
                })
            })
    }
}

/// In-process recipe catalogue.
pub struct FakeCatalogue {
    pub recipe: Value,
    pub searches: Mutex<Vec<(Vec<String>, u32)>>,
}

impl FakeCatalogue {
    pub fn with_recipe(recipe: Value) -> Arc<Self> {
        Arc::new(FakeCatalogue {
            recipe,
            searches: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RecipeSource for FakeCatalogue {
    async fn find_by_ingredients(&self, ingredients: &[String], number: u32) -> AssistResult<Value> {
        self.searches
            .lock()
            .unwrap()
            .push((ingredients.to_vec(), number));
        Ok(serde_json::json!([{"id": 1, "title": "Found", "usedIngredientCount": ingredients.len()}]))
    }

    async fn recipe_information(&self, id: i64) -> AssistResult<Value> {
        if self.recipe["id"].as_i64() == Some(id) {
            Ok(self.recipe.clone())
        } else {
            Err(AssistError::Api {
                service: "Spoonacular",
                status: 404,
                message: "recipe not found".to_string(),
            })
        }
    }
}
