//! # Catalog Error Types
//!
//! The failure kinds every catalog operation can return, and their
//! serialisable form for the transport layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Menu Catalog                       │
//! │                                                                         │
//! │  ValidationError (menu-core) ──────────────┐                            │
//! │                                            ▼                            │
//! │  DbError (menu-db) ─────────────────► CatalogError ───► ApiError        │
//! │   UniqueViolation(name)  → DuplicateName        │        { code,        │
//! │   TransactionFailed      → TransactionFailure   │          message }    │
//! │   NotFound               → NotFound             │                       │
//! │   anything else          → Store                ▼                       │
//! │                                           status_code()                 │
//! │                                           400 / 404 / 500               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use menu_core::ValidationError;
use menu_db::DbError;

/// Failure of a catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or constraint-violating input. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A category with this name already exists.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Missing entity, missing parent, or a search with no matches.
    #[error("{0}")]
    NotFound(String),

    /// A multi-write unit was aborted and rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(DbError),
}

impl CatalogError {
    /// `"{entity} not found: {key}"`
    pub fn not_found(entity: &str, key: &str) -> Self {
        CatalogError::NotFound(format!("{entity} not found: {key}"))
    }

    /// `"Parent category not found"` / `"Parent subcategory not found"`
    pub fn parent_not_found(kind: &str) -> Self {
        CatalogError::NotFound(format!("Parent {} not found", kind.to_lowercase()))
    }

    /// Transport status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) | CatalogError::DuplicateName(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::TransactionFailure(_) | CatalogError::Store(_) => 500,
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { field, value } if field == "name" => {
                CatalogError::DuplicateName(value)
            }
            DbError::TransactionFailed(cause) => CatalogError::TransactionFailure(cause),
            DbError::NotFound { entity, id } => CatalogError::not_found(&entity, &id),
            other => CatalogError::Store(other),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Transport Error
// =============================================================================

/// Error body handed to the transport layer.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Category not found: Desserts"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Category name collision (400)
    DuplicateName,

    /// Resource not found (404)
    NotFound,

    /// Multi-write unit rolled back (500)
    TransactionFailed,

    /// Store failure (500)
    StoreError,
}

impl ErrorCode {
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorCode::ValidationError | ErrorCode::DuplicateName => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::TransactionFailed | ErrorCode::StoreError => 500,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

/// Store and transaction details are logged, not returned to the caller.
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
            CatalogError::DuplicateName(name) => ApiError::new(
                ErrorCode::DuplicateName,
                format!("Category '{}' already exists", name),
            ),
            CatalogError::NotFound(message) => ApiError::new(ErrorCode::NotFound, message),
            CatalogError::TransactionFailure(cause) => {
                error!("Transaction failed: {}", cause);
                ApiError::new(ErrorCode::TransactionFailed, "Database transaction failed")
            }
            CatalogError::Store(e) => {
                error!("Store operation failed: {}", e);
                ApiError::new(ErrorCode::StoreError, "Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
