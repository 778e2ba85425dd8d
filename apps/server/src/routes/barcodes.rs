use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use pantry_core::Item;
use pantry_db::BarcodeLookup;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssociateRequest {
    pub barcode: String,
    pub item_id: i64,
}

/// `GET /api/barcode/{code}`: unknown codes are `found: false`, not 404.
pub async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<BarcodeLookup>> {
    Ok(Json(state.db.barcodes().lookup(&code).await?))
}

/// `POST /api/barcode/associate`
pub async fn associate(
    State(state): State<AppState>,
    Json(req): Json<AssociateRequest>,
) -> ApiResult<Json<Item>> {
    let item = state.db.barcodes().associate(&req.barcode, req.item_id).await?;
    Ok(Json(item))
}
