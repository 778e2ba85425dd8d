//! # Barcode Repository
//!
//! Resolves scanned codes to items and attaches new codes to existing items.
//! A code belongs to exactly one item; the `UNIQUE(code)` column backs that up.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::item::{barcode_owner, fetch_item, find_row};
use pantry_core::Item;

/// Outcome of resolving a scanned code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarcodeLookup {
    pub found: bool,
    /// The code as scanned.
    pub barcode: String,
    /// Owning item, with all of its barcodes.
    pub item: Option<Item>,
}

/// Repository for barcode database operations.
#[derive(Debug, Clone)]
pub struct BarcodeRepository {
    pool: SqlitePool,
}

impl BarcodeRepository {
    /// Creates a new BarcodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BarcodeRepository { pool }
    }

    /// Resolves a code. Never fails for an unknown code; `found` is false.
    pub async fn lookup(&self, code: &str) -> DbResult<BarcodeLookup> {
        let mut conn = self.pool.acquire().await?;

        let item_id = sqlx::query_scalar::<_, i64>("SELECT item_id FROM barcodes WHERE code = ?1")
            .bind(code)
            .fetch_optional(&mut *conn)
            .await?;

        let item = match item_id {
            Some(id) => Some(fetch_item(&mut conn, id).await?),
            None => None,
        };

        debug!(code = %code, found = item.is_some(), "Barcode lookup");

        Ok(BarcodeLookup {
            found: item.is_some(),
            barcode: code.to_string(),
            item,
        })
    }

    /// Gives `item_id` another barcode and returns the item.
    ///
    /// ## Errors
    /// - `DuplicateBarcode` if any item, including `item_id`, owns the code
    /// - `NotFound` if the item does not exist
    pub async fn associate(&self, code: &str, item_id: i64) -> DbResult<Item> {
        let mut tx = self.pool.begin().await?;

        if let Some(owner) = barcode_owner(&mut tx, code).await? {
            return Err(DbError::duplicate_barcode(code, owner));
        }

        if find_row(&mut tx, item_id).await?.is_none() {
            return Err(DbError::not_found("Item", item_id));
        }

        sqlx::query("INSERT INTO barcodes (code, item_id) VALUES (?1, ?2)")
            .bind(code)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let item = fetch_item(&mut tx, item_id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(code = %code, item_id = item_id, "Barcode associated");
        Ok(item)
    }
}
