//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      CoreError (validation, merge args)    │
//! │       │                               │                                 │
//! │       └──────────────┬────────────────┘                                 │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/server) ← Serialized as JSON with a status code        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pantry_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// The first five variants are domain outcomes a caller is expected to
/// handle. The rest are infrastructure failures.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Another item already has this name.
    #[error("An item named '{name}' already exists")]
    DuplicateName { name: String },

    /// The barcode is already owned by an item.
    #[error("Barcode already associated with item: {owner}")]
    DuplicateBarcode { code: String, owner: String },

    /// Arguments that make no sense together.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input failed validation before reaching SQL.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unique constraint violation on a column without a dedicated variant.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        DbError::DuplicateName { name: name.into() }
    }

    pub fn duplicate_barcode(code: impl Into<String>, owner: impl Into<String>) -> Self {
        DbError::DuplicateBarcode {
            code: code.into(),
            owner: owner.into(),
        }
    }

    /// True for the outcomes a client caused (bad input, missing rows).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. }
                | DbError::DuplicateName { .. }
                | DbError::DuplicateBarcode { .. }
                | DbError::InvalidArgument(_)
                | DbError::Validation(_)
        )
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(msg) => DbError::InvalidArgument(msg),
            CoreError::Validation(v) => DbError::Validation(v),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
///     items.name              → DbError::DuplicateName
///     barcodes.code           → DbError::DuplicateBarcode
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
///
/// Repositories check names and codes before writing, so the constraint
/// branches only fire if that check is bypassed.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    match field {
                        "items.name" => DbError::duplicate_name("unknown"),
                        "barcodes.code" => DbError::duplicate_barcode("unknown", "unknown"),
                        _ => DbError::UniqueViolation {
                            field: field.to_string(),
                            value: "unknown".to_string(),
                        },
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Internal(format!("json encoding: {}", err))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: DbError = CoreError::InvalidArgument("target in sources".to_string()).into();
        assert!(matches!(err, DbError::InvalidArgument(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(
            DbError::duplicate_name("Milk").to_string(),
            "An item named 'Milk' already exists"
        );
        assert_eq!(
            DbError::duplicate_barcode("111", "Milk").to_string(),
            "Barcode already associated with item: Milk"
        );
        assert!(!DbError::PoolExhausted.is_client_error());
    }
}
