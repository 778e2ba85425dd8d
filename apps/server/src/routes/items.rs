//! Item CRUD, location moves, list views, search and merge.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use pantry_core::{Item, ItemLocation, ItemPatch, NewItem};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub target_id: i64,
    pub source_ids: Vec<i64>,
}

/// Response of the inventory and grocery views.
#[derive(Debug, Serialize)]
pub struct ItemList {
    pub count: usize,
    pub items: Vec<Item>,
}

impl From<Vec<Item>> for ItemList {
    fn from(items: Vec<Item>) -> Self {
        ItemList {
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
    pub id: i64,
}

impl Deleted {
    pub fn new(id: i64) -> Self {
        Deleted { deleted: true, id }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    let location = match query.location.as_deref().filter(|l| !l.is_empty()) {
        Some(l) => Some(l.parse::<ItemLocation>()?),
        None => None,
    };
    Ok(Json(state.db.items().list(location).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewItem>,
) -> ApiResult<Json<Item>> {
    let item = state.db.items().create(&new).await?;
    Ok(Json(item))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ItemPatch>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().update(id, &patch).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Deleted>> {
    state.db.items().delete(id).await?;
    Ok(Json(Deleted::new(id)))
}

pub async fn to_inventory(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().to_inventory(id).await?))
}

pub async fn to_grocery(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().to_grocery(id).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().to_neither(id).await?))
}

pub async fn inventory(State(state): State<AppState>) -> ApiResult<Json<ItemList>> {
    let items = state.db.items().list(Some(ItemLocation::Inventory)).await?;
    Ok(Json(ItemList::from(items)))
}

pub async fn grocery(State(state): State<AppState>) -> ApiResult<Json<ItemList>> {
    let items = state.db.items().list(Some(ItemLocation::GroceryList)).await?;
    Ok(Json(ItemList::from(items)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    if query.q.trim().is_empty() {
        return Err(ApiError::invalid("Search query 'q' is required"));
    }
    Ok(Json(state.db.items().search(&query.q).await?))
}

pub async fn merge(
    State(state): State<AppState>,
    Json(req): Json<MergeRequest>,
) -> ApiResult<Json<Item>> {
    let item = state.db.items().merge(req.target_id, &req.source_ids).await?;
    Ok(Json(item))
}
