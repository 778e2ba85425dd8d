//! Item, barcode and list endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::{test_app, AxumTestRequest};
use pantry_core::Item;

async fn create_item(app: &axum::Router, body: Value) -> Item {
    let response = AxumTestRequest::post("/api/items").json(&body).send(app).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_health_reports_healthy_without_services() {
    let app = test_app().await;

    let response = AxumTestRequest::get("/api/health").send(&app).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.value();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
    assert_eq!(body["gemini_configured"], false);
    assert_eq!(body["spoonacular_configured"], false);
}

#[tokio::test]
async fn test_create_item_defaults_to_neither() {
    let app = test_app().await;

    let item = create_item(&app, json!({"name": "Salt"})).await;

    assert_eq!(item.name, "Salt");
    assert_eq!(item.location.as_str(), "neither");
    assert!(item.barcodes.is_empty());
}

#[tokio::test]
async fn test_create_duplicate_name_is_rejected() {
    let app = test_app().await;
    create_item(&app, json!({"name": "Milk"})).await;

    let response = AxumTestRequest::post("/api/items")
        .json(&json!({"name": "Milk"}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "DUPLICATE_NAME");
    assert!(response.message().contains("already exists"));
}

#[tokio::test]
async fn test_create_with_taken_barcode_creates_nothing() {
    let app = test_app().await;
    create_item(&app, json!({"name": "Milk", "barcode": "111"})).await;

    let response = AxumTestRequest::post("/api/items")
        .json(&json!({"name": "Oat milk", "barcode": "111"}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "DUPLICATE_BARCODE");
    assert!(response.message().contains("Barcode already associated"));

    let all: Vec<Item> = AxumTestRequest::get("/api/items").send(&app).await.json();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_get_missing_item_is_404() {
    let app = test_app().await;

    let response = AxumTestRequest::get("/api/items/42").send(&app).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.code(), "NOT_FOUND");
    assert!(response.message().contains("Item not found"));
}

#[tokio::test]
async fn test_scanned_item_moves_between_lists() {
    let app = test_app().await;
    let milk = create_item(
        &app,
        json!({"name": "Milk", "location": "inventory", "barcode": "111"}),
    )
    .await;

    let lookup = AxumTestRequest::get("/api/barcode/111").send(&app).await.value();
    assert_eq!(lookup["found"], true);
    assert_eq!(lookup["item"]["id"], milk.id);

    let moved: Item = AxumTestRequest::post(&format!("/api/items/{}/to-grocery", milk.id))
        .send(&app)
        .await
        .json();
    assert_eq!(moved.location.as_str(), "grocery_list");

    let inventory = AxumTestRequest::get("/api/inventory").send(&app).await.value();
    assert_eq!(inventory["count"], 0);

    let grocery = AxumTestRequest::get("/api/grocery").send(&app).await.value();
    assert_eq!(grocery["count"], 1);
    assert_eq!(grocery["items"][0]["name"], "Milk");

    let removed: Item = AxumTestRequest::post(&format!("/api/items/{}/remove", milk.id))
        .send(&app)
        .await
        .json();
    assert_eq!(removed.location.as_str(), "neither");

    let back: Item = AxumTestRequest::post(&format!("/api/items/{}/to-inventory", milk.id))
        .send(&app)
        .await
        .json();
    assert_eq!(back.location.as_str(), "inventory");
}

#[tokio::test]
async fn test_unknown_barcode_is_not_an_error() {
    let app = test_app().await;

    let response = AxumTestRequest::get("/api/barcode/000").send(&app).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.value();
    assert_eq!(body["found"], false);
    assert_eq!(body["barcode"], "000");
    assert!(body["item"].is_null());
}

#[tokio::test]
async fn test_associate_barcode() {
    let app = test_app().await;
    let item = create_item(&app, json!({"name": "Rice"})).await;

    let response = AxumTestRequest::post("/api/barcode/associate")
        .json(&json!({"barcode": "222", "item_id": item.id}))
        .send(&app)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let updated: Item = response.json();
    assert!(updated.has_barcode("222"));

    let again = AxumTestRequest::post("/api/barcode/associate")
        .json(&json!({"barcode": "222", "item_id": item.id}))
        .send(&app)
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.code(), "DUPLICATE_BARCODE");

    let missing = AxumTestRequest::post("/api/barcode/associate")
        .json(&json!({"barcode": "333", "item_id": 999}))
        .send(&app)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_item_releases_its_barcodes() {
    let app = test_app().await;
    let item = create_item(&app, json!({"name": "Eggs", "barcode": "444"})).await;

    let response = AxumTestRequest::delete(&format!("/api/items/{}", item.id))
        .send(&app)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.value(), json!({"deleted": true, "id": item.id}));

    let lookup = AxumTestRequest::get("/api/barcode/444").send(&app).await.value();
    assert_eq!(lookup["found"], false);

    let again = AxumTestRequest::delete(&format!("/api/items/{}", item.id))
        .send(&app)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_renames_and_moves() {
    let app = test_app().await;
    let item = create_item(&app, json!({"name": "Tomatos"})).await;
    create_item(&app, json!({"name": "Basil"})).await;

    let response = AxumTestRequest::patch(&format!("/api/items/{}", item.id))
        .json(&json!({"name": "Tomatoes", "location": "grocery_list"}))
        .send(&app)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let updated: Item = response.json();
    assert_eq!(updated.name, "Tomatoes");
    assert_eq!(updated.location.as_str(), "grocery_list");

    let clash = AxumTestRequest::patch(&format!("/api/items/{}", item.id))
        .json(&json!({"name": "Basil"}))
        .send(&app)
        .await;
    assert_eq!(clash.status, StatusCode::BAD_REQUEST);
    assert_eq!(clash.code(), "DUPLICATE_NAME");
}

#[tokio::test]
async fn test_list_filters_by_location() {
    let app = test_app().await;
    create_item(&app, json!({"name": "Flour", "location": "inventory"})).await;
    create_item(&app, json!({"name": "Sugar", "location": "grocery_list"})).await;

    let inventory: Vec<Item> = AxumTestRequest::get("/api/items?location=inventory")
        .send(&app)
        .await
        .json();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].name, "Flour");

    let everything: Vec<Item> = AxumTestRequest::get("/api/items").send(&app).await.json();
    assert_eq!(everything.len(), 2);

    let bogus = AxumTestRequest::get("/api/items?location=fridge").send(&app).await;
    assert_eq!(bogus.status, StatusCode::BAD_REQUEST);
    assert_eq!(bogus.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let app = test_app().await;
    create_item(&app, json!({"name": "Whole Milk"})).await;
    create_item(&app, json!({"name": "Buttermilk"})).await;
    create_item(&app, json!({"name": "Bread"})).await;

    let hits: Vec<Item> = AxumTestRequest::get("/api/search?q=MILK").send(&app).await.json();

    let mut names: Vec<String> = hits.into_iter().map(|i| i.name).collect();
    names.sort();
    assert_eq!(names, vec!["Buttermilk", "Whole Milk"]);
}

#[tokio::test]
async fn test_search_requires_a_query() {
    let app = test_app().await;
    create_item(&app, json!({"name": "Bread"})).await;

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let response = AxumTestRequest::get(uri).send(&app).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.code(), "INVALID_ARGUMENT");
        assert!(response.message().contains("'q'"));
    }
}

#[tokio::test]
async fn test_merge_moves_barcodes_to_target() {
    let app = test_app().await;
    let a = create_item(&app, json!({"name": "Cola", "barcode": "b1"})).await;
    let b = create_item(&app, json!({"name": "Coca-Cola", "barcode": "b2"})).await;

    let response = AxumTestRequest::post("/api/items/merge")
        .json(&json!({"target_id": a.id, "source_ids": [b.id]}))
        .send(&app)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    let merged: Item = response.json();
    assert_eq!(merged.id, a.id);
    assert!(merged.has_barcode("b1"));
    assert!(merged.has_barcode("b2"));

    let gone = AxumTestRequest::get(&format!("/api/items/{}", b.id)).send(&app).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let lookup = AxumTestRequest::get("/api/barcode/b2").send(&app).await.value();
    assert_eq!(lookup["item"]["id"], a.id);
}

#[tokio::test]
async fn test_merge_rejects_target_in_sources() {
    let app = test_app().await;
    let a = create_item(&app, json!({"name": "Cola"})).await;
    let b = create_item(&app, json!({"name": "Coke"})).await;

    let response = AxumTestRequest::post("/api/items/merge")
        .json(&json!({"target_id": a.id, "source_ids": [a.id, b.id]}))
        .send(&app)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), "INVALID_ARGUMENT");

    let all: Vec<Item> = AxumTestRequest::get("/api/items").send(&app).await.json();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_merge_with_missing_source_changes_nothing() {
    let app = test_app().await;
    let a = create_item(&app, json!({"name": "Cola"})).await;
    let b = create_item(&app, json!({"name": "Coke", "barcode": "b9"})).await;

    let response = AxumTestRequest::post("/api/items/merge")
        .json(&json!({"target_id": a.id, "source_ids": [b.id, 999]}))
        .send(&app)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let lookup = AxumTestRequest::get("/api/barcode/b9").send(&app).await.value();
    assert_eq!(lookup["item"]["id"], b.id);
}
