//! Recipe CRUD, favorites, availability and the recipe page.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::{test_app, AxumTestRequest};
use pantry_core::{Item, Recipe};

fn soup() -> Value {
    json!({
        "name": "Soup",
        "description": "Warm tomato soup",
        "servings": 4,
        "prep_time_minutes": 10,
        "cook_time_minutes": 20,
        "ingredients": [
            {"name": "Tomato", "amount": 2},
            {"name": "Onion", "amount": "1", "unit": "whole"}
        ],
        "steps": [
            {"step_number": 1, "instruction": "Chop"},
            {"step_number": 2, "instruction": "Simmer"}
        ]
    })
}

async fn create_recipe(app: &axum::Router, body: Value) -> Recipe {
    let response = AxumTestRequest::post("/api/recipes").json(&body).send(app).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_create_recipe_with_children() {
    let app = test_app().await;

    let recipe = create_recipe(&app, soup()).await;

    assert_eq!(recipe.name, "Soup");
    assert!(!recipe.is_favorite);
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].amount.as_deref(), Some("2"));
    assert_eq!(recipe.steps.len(), 2);
    assert_eq!(recipe.total_time_minutes(), 30);
}

#[tokio::test]
async fn test_create_recipe_defaults_servings() {
    let app = test_app().await;

    let recipe = create_recipe(&app, json!({"name": "Toast"})).await;

    assert_eq!(recipe.servings, 4);
    assert!(recipe.ingredients.is_empty());
}

#[tokio::test]
async fn test_create_recipe_rejects_blank_name() {
    let app = test_app().await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({"name": "  "}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_keeps_ingredients_and_steps() {
    let app = test_app().await;
    let recipe = create_recipe(&app, soup()).await;

    let response = AxumTestRequest::patch(&format!("/api/recipes/{}", recipe.id))
        .json(&json!({"servings": 6}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let updated: Recipe = response.json();
    assert_eq!(updated.servings, 6);
    assert_eq!(updated.description.as_deref(), Some("Warm tomato soup"));
    assert_eq!(updated.ingredients, recipe.ingredients);
    assert_eq!(updated.steps, recipe.steps);
}

#[tokio::test]
async fn test_patch_null_clears_description() {
    let app = test_app().await;
    let recipe = create_recipe(&app, soup()).await;

    let updated: Recipe = AxumTestRequest::patch(&format!("/api/recipes/{}", recipe.id))
        .json(&json!({"description": null}))
        .send(&app)
        .await
        .json();

    assert_eq!(updated.description, None);
    assert_eq!(updated.prep_time_minutes, Some(10));
}

#[tokio::test]
async fn test_put_replaces_only_supplied_children() {
    let app = test_app().await;
    let recipe = create_recipe(&app, soup()).await;

    let updated: Recipe = AxumTestRequest::put(&format!("/api/recipes/{}", recipe.id))
        .json(&json!({"name": "Tomato Soup", "ingredients": []}))
        .send(&app)
        .await
        .json();

    assert_eq!(updated.name, "Tomato Soup");
    assert!(updated.ingredients.is_empty());
    assert_eq!(updated.steps.len(), 2);

    let replaced: Recipe = AxumTestRequest::put(&format!("/api/recipes/{}", recipe.id))
        .json(&json!({"steps": [{"step_number": 1, "instruction": "Heat a can"}]}))
        .send(&app)
        .await
        .json();

    assert_eq!(replaced.steps.len(), 1);
    assert_eq!(replaced.steps[0].instruction, "Heat a can");
    assert!(replaced.ingredients.is_empty());
}

#[tokio::test]
async fn test_update_missing_recipe_is_404() {
    let app = test_app().await;

    let response = AxumTestRequest::patch("/api/recipes/77")
        .json(&json!({"servings": 2}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.message().contains("Recipe not found"));
}

#[tokio::test]
async fn test_favorite_toggle_and_filter() {
    let app = test_app().await;
    let soup = create_recipe(&app, soup()).await;
    create_recipe(&app, json!({"name": "Salad"})).await;

    let toggled: Recipe = AxumTestRequest::post(&format!("/api/recipes/{}/favorite", soup.id))
        .send(&app)
        .await
        .json();
    assert!(toggled.is_favorite);

    let favorites = AxumTestRequest::get("/api/recipes?favorites_only=true")
        .send(&app)
        .await
        .value();
    assert_eq!(favorites["count"], 1);
    assert_eq!(favorites["recipes"][0]["name"], "Soup");

    let all = AxumTestRequest::get("/api/recipes").send(&app).await.value();
    assert_eq!(all["count"], 2);

    let untoggled: Recipe = AxumTestRequest::post(&format!("/api/recipes/{}/favorite", soup.id))
        .send(&app)
        .await
        .json();
    assert!(!untoggled.is_favorite);
}

#[tokio::test]
async fn test_delete_recipe() {
    let app = test_app().await;
    let recipe = create_recipe(&app, soup()).await;

    let response = AxumTestRequest::delete(&format!("/api/recipes/{}", recipe.id))
        .send(&app)
        .await;
    assert_eq!(response.value(), json!({"deleted": true, "id": recipe.id}));

    let gone = AxumTestRequest::get(&format!("/api/recipes/{}", recipe.id))
        .send(&app)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_availability_matches_names_case_insensitively() {
    let app = test_app().await;
    AxumTestRequest::post("/api/items")
        .json(&json!({"name": "tomato", "location": "inventory"}))
        .send(&app)
        .await;
    AxumTestRequest::post("/api/items")
        .json(&json!({"name": "Onion", "location": "grocery_list"}))
        .send(&app)
        .await;
    let recipe = create_recipe(&app, soup()).await;

    let availability = AxumTestRequest::get(&format!("/api/recipes/{}/availability", recipe.id))
        .send(&app)
        .await
        .value();

    assert_eq!(availability["total"], 2);
    assert_eq!(availability["available"], json!(["Tomato"]));
    assert_eq!(availability["missing"], json!(["Onion"]));
}

#[tokio::test]
async fn test_availability_follows_item_link() {
    let app = test_app().await;
    let item: Item = AxumTestRequest::post("/api/items")
        .json(&json!({"name": "San Marzano", "location": "inventory"}))
        .send(&app)
        .await
        .json();
    let recipe = create_recipe(
        &app,
        json!({"name": "Sauce", "ingredients": [{"name": "Tomatoes", "item_id": item.id}]}),
    )
    .await;

    let availability = AxumTestRequest::get(&format!("/api/recipes/{}/availability", recipe.id))
        .send(&app)
        .await
        .value();

    assert_eq!(availability["available"], json!(["Tomatoes"]));
    assert_eq!(availability["missing"], json!([]));
}

#[tokio::test]
async fn test_recipe_page_renders_html() {
    let app = test_app().await;
    let recipe = create_recipe(&app, soup()).await;

    let response = AxumTestRequest::get(&format!("/recipe/{}", recipe.id))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/html"));
    let html = response.text();
    assert!(html.contains("<h1>Soup</h1>"));
    assert!(html.contains("Simmer"));
    assert!(html.contains("0/2 ingredients in stock"));
}

#[tokio::test]
async fn test_recipe_page_missing_is_404() {
    let app = test_app().await;

    let response = AxumTestRequest::get("/recipe/5").send(&app).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
