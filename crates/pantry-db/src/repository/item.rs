//! # Item Repository
//!
//! Database operations for items and their location.
//!
//! ## Key Operations
//! - Create (with an optional first barcode, atomically)
//! - List / filter by location / substring search
//! - Rename, move between locations, delete
//!
//! ## Location State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  to_inventory(id)  ──►  location = 'inventory'                         │
//! │  to_grocery(id)    ──►  location = 'grocery_list'                      │
//! │  to_neither(id)    ──►  location = 'neither'                           │
//! │                                                                         │
//! │  Unconditional from any state. The only failure is NotFound.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pantry_core::validation::validate_item_name;
use pantry_core::{Barcode, Item, ItemLocation, ItemPatch, NewItem};

// =============================================================================
// Shared Helpers
// =============================================================================

/// Row shape of the `items` table. Barcodes are attached separately.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub location: ItemLocation,
}

impl ItemRow {
    fn into_item(self, barcodes: Vec<Barcode>) -> Item {
        Item {
            id: self.id,
            name: self.name,
            location: self.location,
            barcodes,
        }
    }
}

pub(crate) async fn find_row(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<ItemRow>> {
    let row = sqlx::query_as::<_, ItemRow>("SELECT id, name, location FROM items WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// Loads one item with its barcodes, or `NotFound`.
pub(crate) async fn fetch_item(conn: &mut SqliteConnection, id: i64) -> DbResult<Item> {
    let row = find_row(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Item", id))?;

    let mut items = with_barcodes(conn, vec![row]).await?;
    items.pop().ok_or_else(|| DbError::Internal("item vanished while loading".to_string()))
}

/// Attaches barcodes to item rows with a single query.
pub(crate) async fn with_barcodes(
    conn: &mut SqliteConnection,
    rows: Vec<ItemRow>,
) -> DbResult<Vec<Item>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let ids_json = serde_json::to_string(&ids)?;

    let barcodes = sqlx::query_as::<_, Barcode>(
        r#"
        SELECT id, code, item_id
        FROM barcodes
        WHERE item_id IN (SELECT value FROM json_each(?1))
        ORDER BY id
        "#,
    )
    .bind(ids_json)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_item: HashMap<i64, Vec<Barcode>> = HashMap::new();
    for barcode in barcodes {
        by_item.entry(barcode.item_id).or_default().push(barcode);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let codes = by_item.remove(&row.id).unwrap_or_default();
            row.into_item(codes)
        })
        .collect())
}

/// Id of the item with exactly this name (case-sensitive).
pub(crate) async fn id_for_name(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM items WHERE name = ?1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

/// Name of the item owning `code`, if any.
pub(crate) async fn barcode_owner(
    conn: &mut SqliteConnection,
    code: &str,
) -> DbResult<Option<String>> {
    let owner = sqlx::query_scalar::<_, String>(
        r#"
        SELECT i.name
        FROM barcodes b
        INNER JOIN items i ON i.id = b.item_id
        WHERE b.code = ?1
        "#,
    )
    .bind(code)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(owner)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let milk = repo.create(&NewItem::named("Milk").with_barcode("111")).await?;
/// let milk = repo.to_grocery(milk.id).await?;
/// let groceries = repo.list(Some(ItemLocation::GroceryList)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pub(crate) pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Creates an item, and its first barcode if one is given.
    ///
    /// ## Errors
    /// - `DuplicateName` if another item has this name
    /// - `DuplicateBarcode` if the barcode is already owned
    ///
    /// Both checks run before any insert; on failure nothing is written.
    pub async fn create(&self, new: &NewItem) -> DbResult<Item> {
        validate_item_name(&new.name)?;

        debug!(name = %new.name, location = %new.location, "Creating item");

        let mut tx = self.pool.begin().await?;

        if id_for_name(&mut tx, &new.name).await?.is_some() {
            return Err(DbError::duplicate_name(&new.name));
        }

        if let Some(code) = &new.barcode {
            if let Some(owner) = barcode_owner(&mut tx, code).await? {
                return Err(DbError::duplicate_barcode(code, owner));
            }
        }

        let id = sqlx::query("INSERT INTO items (name, location) VALUES (?1, ?2)")
            .bind(&new.name)
            .bind(new.location)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        if let Some(code) = &new.barcode {
            sqlx::query("INSERT INTO barcodes (code, item_id) VALUES (?1, ?2)")
                .bind(code)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let item = fetch_item(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = item.id, name = %item.name, "Item created");
        Ok(item)
    }

    /// Gets an item with its barcodes.
    ///
    /// ## Returns
    /// * `Ok(Item)` - Item found
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn get(&self, id: i64) -> DbResult<Item> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Lists items sorted by name, optionally only those at `location`.
    pub async fn list(&self, location: Option<ItemLocation>) -> DbResult<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, location
            FROM items
            WHERE (?1 IS NULL OR location = ?1)
            ORDER BY name
            "#,
        )
        .bind(location)
        .fetch_all(&mut *conn)
        .await?;

        debug!(count = rows.len(), location = ?location, "Listed items");
        with_barcodes(&mut conn, rows).await
    }

    /// Case-insensitive substring search on the name, sorted by name.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, location
            FROM items
            WHERE instr(lower(name), lower(?1)) > 0
            ORDER BY name
            "#,
        )
        .bind(query)
        .fetch_all(&mut *conn)
        .await?;

        debug!(query = %query, count = rows.len(), "Searched items");
        with_barcodes(&mut conn, rows).await
    }

    /// Renames an item. Renaming to the current name is a no-op success.
    pub async fn rename(&self, id: i64, name: &str) -> DbResult<Item> {
        self.update(
            id,
            &ItemPatch {
                name: Some(name.to_string()),
                location: None,
            },
        )
        .await
    }

    /// Applies a rename and/or move in one transaction.
    ///
    /// ## Errors
    /// - `NotFound` if the item does not exist
    /// - `DuplicateName` if a different item already has the new name
    pub async fn update(&self, id: i64, patch: &ItemPatch) -> DbResult<Item> {
        if let Some(name) = &patch.name {
            validate_item_name(name)?;
        }

        let mut tx = self.pool.begin().await?;

        if find_row(&mut tx, id).await?.is_none() {
            return Err(DbError::not_found("Item", id));
        }

        if let Some(name) = &patch.name {
            match id_for_name(&mut tx, name).await? {
                Some(owner) if owner != id => return Err(DbError::duplicate_name(name)),
                _ => {}
            }

            sqlx::query("UPDATE items SET name = ?2 WHERE id = ?1")
                .bind(id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(location) = patch.location {
            sqlx::query("UPDATE items SET location = ?2 WHERE id = ?1")
                .bind(id)
                .bind(location)
                .execute(&mut *tx)
                .await?;
        }

        let item = fetch_item(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = id, name = %item.name, location = %item.location, "Item updated");
        Ok(item)
    }

    /// Moves an item to `location`, whatever its current one.
    pub async fn set_location(&self, id: i64, location: ItemLocation) -> DbResult<Item> {
        let result = sqlx::query("UPDATE items SET location = ?2 WHERE id = ?1")
            .bind(id)
            .bind(location)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        debug!(id = id, location = %location, "Item moved");
        self.get(id).await
    }

    pub async fn to_inventory(&self, id: i64) -> DbResult<Item> {
        self.set_location(id, ItemLocation::Inventory).await
    }

    pub async fn to_grocery(&self, id: i64) -> DbResult<Item> {
        self.set_location(id, ItemLocation::GroceryList).await
    }

    pub async fn to_neither(&self, id: i64) -> DbResult<Item> {
        self.set_location(id, ItemLocation::Neither).await
    }

    /// Deletes an item. Its barcodes go with it (ON DELETE CASCADE);
    /// recipe ingredients that point at it keep the stale id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        info!(id = id, "Item deleted");
        Ok(())
    }

    /// Total number of items.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = db.items();

        let created = repo
            .create(&NewItem::named("Milk").at(ItemLocation::Inventory).with_barcode("111"))
            .await
            .unwrap();

        assert_eq!(created.name, "Milk");
        assert_eq!(created.location, ItemLocation::Inventory);
        assert!(created.has_barcode("111"));

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_defaults_to_neither() {
        let db = setup().await;
        let item = db.items().create(&NewItem::named("Salt")).await.unwrap();

        assert_eq!(item.location, ItemLocation::Neither);
        assert!(item.barcodes.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_leaves_store_unchanged() {
        let db = setup().await;
        let repo = db.items();
        repo.create(&NewItem::named("Milk")).await.unwrap();

        let err = repo
            .create(&NewItem::named("Milk").with_barcode("222"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::DuplicateName { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(!db.barcodes().lookup("222").await.unwrap().found);
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let db = setup().await;
        let repo = db.items();
        repo.create(&NewItem::named("Milk")).await.unwrap();
        repo.create(&NewItem::named("milk")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_on_create() {
        let db = setup().await;
        let repo = db.items();
        repo.create(&NewItem::named("Item 1").with_barcode("SAME_CODE"))
            .await
            .unwrap();

        let err = repo
            .create(&NewItem::named("Item 2").with_barcode("SAME_CODE"))
            .await
            .unwrap_err();

        match err {
            DbError::DuplicateBarcode { code, owner } => {
                assert_eq!(code, "SAME_CODE");
                assert_eq!(owner, "Item 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let db = setup().await;
        let err = db.items().get(99_999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_sorted_and_filtered() {
        let db = setup().await;
        let repo = db.items();
        for (name, location) in [
            ("Eggs", ItemLocation::Inventory),
            ("Bread", ItemLocation::GroceryList),
            ("Apples", ItemLocation::Inventory),
            ("Candles", ItemLocation::Neither),
        ] {
            repo.create(&NewItem::named(name).at(location)).await.unwrap();
        }

        let all: Vec<String> = repo.list(None).await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(all, vec!["Apples", "Bread", "Candles", "Eggs"]);

        let inventory = repo.list(Some(ItemLocation::Inventory)).await.unwrap();
        let names: Vec<&str> = inventory.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "Eggs"]);
        assert!(inventory.iter().all(|i| i.location == ItemLocation::Inventory));
    }

    #[tokio::test]
    async fn test_list_attaches_barcodes_to_the_right_items() {
        let db = setup().await;
        let repo = db.items();
        let a = repo.create(&NewItem::named("A").with_barcode("a1")).await.unwrap();
        let b = repo.create(&NewItem::named("B").with_barcode("b1")).await.unwrap();
        db.barcodes().associate("a2", a.id).await.unwrap();

        let items = repo.list(None).await.unwrap();
        let codes = |item: &Item| item.barcodes.iter().map(|c| c.code.clone()).collect::<Vec<_>>();

        assert_eq!(codes(&items[0]), vec!["a1", "a2"]);
        assert_eq!(items[1].id, b.id);
        assert_eq!(codes(&items[1]), vec!["b1"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = setup().await;
        let repo = db.items();
        for name in ["Zebra Cookies", "Apple Cookies", "Milk", "Mango Cookies"] {
            repo.create(&NewItem::named(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .search("COOKIES")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Apple Cookies", "Mango Cookies", "Zebra Cookies"]);

        assert_eq!(repo.search("il").await.unwrap().len(), 1);
        assert!(repo.search("nonexistent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename() {
        let db = setup().await;
        let repo = db.items();
        let milk = repo.create(&NewItem::named("Milk")).await.unwrap();
        repo.create(&NewItem::named("Eggs")).await.unwrap();

        let renamed = repo.rename(milk.id, "Whole Milk").await.unwrap();
        assert_eq!(renamed.name, "Whole Milk");

        // Own name is fine
        repo.rename(milk.id, "Whole Milk").await.unwrap();

        let err = repo.rename(milk.id, "Eggs").await.unwrap_err();
        assert!(matches!(err, DbError::DuplicateName { .. }));

        let err = repo.rename(99_999, "Anything").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_is_atomic() {
        let db = setup().await;
        let repo = db.items();
        let milk = repo.create(&NewItem::named("Milk")).await.unwrap();
        repo.create(&NewItem::named("Eggs")).await.unwrap();

        let patch = ItemPatch {
            name: Some("Eggs".to_string()),
            location: Some(ItemLocation::Inventory),
        };
        assert!(repo.update(milk.id, &patch).await.is_err());

        let unchanged = repo.get(milk.id).await.unwrap();
        assert_eq!(unchanged.name, "Milk");
        assert_eq!(unchanged.location, ItemLocation::Neither);

        let patch = ItemPatch {
            name: Some("Oat Milk".to_string()),
            location: Some(ItemLocation::GroceryList),
        };
        let updated = repo.update(milk.id, &patch).await.unwrap();
        assert_eq!(updated.name, "Oat Milk");
        assert_eq!(updated.location, ItemLocation::GroceryList);
    }

    #[tokio::test]
    async fn test_transitions_are_total() {
        let db = setup().await;
        let repo = db.items();
        let item = repo.create(&NewItem::named("Milk")).await.unwrap();

        for from in ItemLocation::ALL {
            for to in ItemLocation::ALL {
                repo.set_location(item.id, from).await.unwrap();
                let moved = match to {
                    ItemLocation::Inventory => repo.to_inventory(item.id).await,
                    ItemLocation::GroceryList => repo.to_grocery(item.id).await,
                    ItemLocation::Neither => repo.to_neither(item.id).await,
                }
                .unwrap();
                assert_eq!(moved.location, to, "{from} -> {to}");
            }
        }
    }

    #[tokio::test]
    async fn test_move_missing_item() {
        let db = setup().await;
        let repo = db.items();

        assert!(matches!(repo.to_inventory(99_999).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.to_grocery(99_999).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.to_neither(99_999).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_barcodes() {
        let db = setup().await;
        let repo = db.items();
        let milk = repo.create(&NewItem::named("Milk").with_barcode("111")).await.unwrap();
        db.barcodes().associate("SECOND", milk.id).await.unwrap();

        repo.delete(milk.id).await.unwrap();

        assert!(matches!(repo.get(milk.id).await, Err(DbError::NotFound { .. })));
        assert!(!db.barcodes().lookup("111").await.unwrap().found);
        assert!(!db.barcodes().lookup("SECOND").await.unwrap().found);

        let err = repo.delete(milk.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let db = setup().await;
        let err = db.items().create(&NewItem::named("  ")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
