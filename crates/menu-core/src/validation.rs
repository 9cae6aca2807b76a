//! # Validation Module
//!
//! Field rules for catalog input. These run before any store call; a failure
//! here guarantees nothing was written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (out of scope)                                     │
//! │  └── JSON deserialisation into input records                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── names: trimmed, non-empty                                         │
//! │  ├── tax / baseAmount / discount: finite, >= 0                         │
//! │  ├── taxType: Percentage | Fixed | None                                │
//! │  └── item parent: exactly one of category / subcategory                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(categories.name)                                           │
//! │  ├── CHECK exactly one item parent                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{ItemParent, TaxType};

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use menu_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Latte ").unwrap(), "Latte");
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(name.to_string())
}

/// Validates a search term.
///
/// ## Rules
/// - Must be present and non-empty
/// - Matched as given: surrounding whitespace is part of the term
pub fn validate_search_term(term: Option<&str>) -> ValidationResult<String> {
    match term {
        Some(term) if !term.is_empty() => Ok(term.to_string()),
        _ => Err(ValidationError::required("name query parameter")),
    }
}

/// Parses a tax type from its wire spelling.
pub fn parse_tax_type(raw: &str) -> ValidationResult<TaxType> {
    raw.parse()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a non-negative, finite amount.
///
/// ## Example
/// ```rust
/// use menu_core::validation::validate_amount;
///
/// assert!(validate_amount("baseAmount", 0.0).is_ok());
/// assert!(validate_amount("discount", -1.0).is_err());
/// assert!(validate_amount("discount", f64::NAN).is_err());
/// ```
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Validates a tax value.
pub fn validate_tax(tax: f64) -> ValidationResult<f64> {
    validate_amount("tax", tax)
}

// =============================================================================
// Placement Validators
// =============================================================================

/// Checks that an item names exactly one parent.
///
/// ## Rules
/// ```text
/// categoryId  subcategoryId   result
/// ──────────  ─────────────   ──────────────────────
///    set          set         ConflictingParents
///    -            -           MissingParent
///    set          -           ItemParent::Category
///    -            set         ItemParent::Subcategory
/// ```
/// Blank ids count as absent.
pub fn validate_item_parent(
    category_id: Option<String>,
    subcategory_id: Option<String>,
) -> ValidationResult<ItemParent> {
    let present = |id: Option<String>| id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match (present(category_id), present(subcategory_id)) {
        (Some(_), Some(_)) => Err(ValidationError::ConflictingParents),
        (None, None) => Err(ValidationError::MissingParent),
        (Some(id), None) => Ok(ItemParent::Category(id)),
        (None, Some(id)) => Ok(ItemParent::Subcategory(id)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
