//! # Error Types
//!
//! Validation errors raised by menu-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  menu-core errors (this file)                                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  menu-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  menu-service errors                                                   │
//! │  ├── CatalogError     - Failure kind returned by every operation       │
//! │  └── ApiError         - What the transport serialises                  │
//! │                                                                         │
//! │  Flow: ValidationError → CatalogError → ApiError → status code         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validation runs before the first store call, so a `ValidationError`
//! always means nothing was written.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is below zero.
    #[error("{field} must be greater than or equal to 0")]
    Negative { field: String },

    /// Numeric value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Item create request named no parent.
    #[error("Item must belong to either a Category or a Subcategory.")]
    MissingParent,

    /// Item create request named both parents.
    #[error("Item cannot belong to both a Category and a Subcategory.")]
    ConflictingParents,

    /// Update payload tried to change a field fixed at creation.
    ///
    /// ## When This Occurs
    /// - Subcategory patch carrying `category`
    /// - Item patch carrying `categoryId` or `subcategoryId`
    #[error("{field} cannot be changed after creation")]
    Immutable { field: String },
}

impl ValidationError {
    /// Creates a Required error for the named field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an Immutable error for the named field.
    pub fn immutable(field: impl Into<String>) -> Self {
        ValidationError::Immutable {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
