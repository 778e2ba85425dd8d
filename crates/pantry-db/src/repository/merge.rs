//! # Item Merge
//!
//! Folds duplicate items into one surviving item.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  merge(target = 1, sources = [2, 3])                                   │
//! │                                                                         │
//! │  1. validate_merge      target ∉ sources, sources non-empty            │
//! │  2. BEGIN                                                              │
//! │  3. target, 2, 3 exist?            no ──► NotFound (rollback)          │
//! │  4. for each source:                                                   │
//! │       UPDATE barcodes           SET item_id = 1 WHERE item_id = src    │
//! │       UPDATE recipe_ingredients SET item_id = 1 WHERE item_id = src    │
//! │       DELETE FROM items WHERE id = src                                 │
//! │  5. COMMIT ──► target with all barcodes                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The target keeps its own name and location. Every step is a set-style
//! update keyed on the source id, so the order of sources does not change
//! the final state.

use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::item::{fetch_item, find_row, ItemRepository};
use pantry_core::validation::validate_merge;
use pantry_core::Item;

impl ItemRepository {
    /// Merges `source_ids` into `target_id` and returns the target.
    ///
    /// ## Errors
    /// - `InvalidArgument` if the target is among the sources, or no sources
    /// - `NotFound` if the target or any source does not exist
    ///
    /// Nothing is changed when an error is returned.
    pub async fn merge(&self, target_id: i64, source_ids: &[i64]) -> DbResult<Item> {
        let sources = validate_merge(target_id, source_ids)?;

        debug!(target_id = target_id, sources = ?sources, "Merging items");

        let mut tx = self.pool.begin().await?;

        if find_row(&mut tx, target_id).await?.is_none() {
            return Err(DbError::not_found("Item", target_id));
        }
        for &source in &sources {
            if find_row(&mut tx, source).await?.is_none() {
                return Err(DbError::not_found("Item", source));
            }
        }

        for &source in &sources {
            let moved = sqlx::query("UPDATE barcodes SET item_id = ?1 WHERE item_id = ?2")
                .bind(target_id)
                .bind(source)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            let relinked =
                sqlx::query("UPDATE recipe_ingredients SET item_id = ?1 WHERE item_id = ?2")
                    .bind(target_id)
                    .bind(source)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();

            sqlx::query("DELETE FROM items WHERE id = ?1")
                .bind(source)
                .execute(&mut *tx)
                .await?;

            debug!(
                source = source,
                barcodes = moved,
                ingredients = relinked,
                "Source folded into target"
            );
        }

        let item = fetch_item(&mut tx, target_id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            target_id = target_id,
            merged = sources.len(),
            barcodes = item.barcodes.len(),
            "Items merged"
        );
        Ok(item)
    }
}
