//! # menu-core: Pure Domain Logic for the Menu Catalog
//!
//! This crate holds the catalog's rules as pure functions: entity shapes,
//! validation of incoming attribute records, the one-time tax inheritance
//! from a Category to a new Subcategory, and the derived `totalAmount` of an
//! Item. Nothing here touches a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Menu Catalog Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Transport (HTTP routes, out of scope)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ input records / path ids               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 menu-service (managers)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ menu-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   input   │  │ validation│  │   views   │  │   │
//! │  │   │ Category  │  │ NewItem   │  │   rules   │  │ ItemView  │  │   │
//! │  │   │ Item      │  │ ItemPatch │  │  checks   │  │ total     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    menu-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Category, Subcategory, Item, TaxType, ItemParent
//! - [`input`] - Create and patch records as received from the transport
//! - [`changes`] - Validated edits, one optional column per field
//! - [`validation`] - Field rules, run before any write
//! - [`lookup`] - Identity-or-name token classification
//! - [`pricing`] - The derived `totalAmount`
//! - [`views`] - Read models with children resolved
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use menu_core::{Category, NewCategory, NewSubcategory, Subcategory};
//!
//! let beverages = Category::create(
//!     NewCategory {
//!         name: "Beverages".to_string(),
//!         tax_applicability: Some(true),
//!         tax: Some(5.0),
//!         ..Default::default()
//!     },
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! // Tax fields omitted: copied from the parent at creation time
//! let hot = Subcategory::create(
//!     NewSubcategory { name: "Hot Drinks".to_string(), ..Default::default() },
//!     &beverages,
//!     Utc::now(),
//! )
//! .unwrap();
//! assert!(hot.tax_applicability);
//! assert_eq!(hot.tax, 5.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod changes;
pub mod error;
pub mod input;
pub mod lookup;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod views;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use changes::{CategoryChanges, ItemChanges, SubcategoryChanges};
pub use error::ValidationError;
pub use input::{CategoryPatch, ItemPatch, NewCategory, NewItem, NewSubcategory, SubcategoryPatch};
pub use lookup::LookupKey;
pub use types::*;
pub use views::{CategoryView, ItemView, SubcategoryView};
