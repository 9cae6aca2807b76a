//! # Domain Types
//!
//! The three catalog entities and their small value types.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Hierarchy                               │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Category     │ 1    N │   Subcategory   │                        │
//! │  │  ─────────────  │───────►│  ─────────────  │                        │
//! │  │  name (unique)  │        │  category (FK)  │                        │
//! │  │  tax, taxType   │        │  tax (snapshot) │                        │
//! │  │  subcategories[]│        │  items[]        │                        │
//! │  │  items[]        │        └────────┬────────┘                        │
//! │  └────────┬────────┘                 │ 1                               │
//! │           │ 1                        │                                 │
//! │           │          N ┌─────────────▼───┐ N                           │
//! │           └───────────►│      Item       │◄──                          │
//! │                        │  ─────────────  │                             │
//! │                        │  parent: ONE OF │                             │
//! │                        │  baseAmount     │                             │
//! │                        │  discount       │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parent Pointer vs Child List
//! The parent pointer stored on a child is the source of truth. The id lists
//! on Category and Subcategory are an index over those pointers and are only
//! ever appended to inside the same transaction that creates the child.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{ValidationError, ValidationResult};
use crate::input::{NewCategory, NewItem, NewSubcategory};
use crate::pricing;
use crate::validation::{
    parse_tax_type, validate_amount, validate_item_parent, validate_name, validate_tax,
};

/// Generates a fresh identity for a new record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tax Type
// =============================================================================

/// How a category's `tax` value is meant to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum TaxType {
    Percentage,
    Fixed,
    #[default]
    None,
}

impl TaxType {
    /// Every accepted value, in wire spelling.
    pub const ALL: [TaxType; 3] = [TaxType::Percentage, TaxType::Fixed, TaxType::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxType::Percentage => "Percentage",
            TaxType::Fixed => "Fixed",
            TaxType::None => "None",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxType {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the wire spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "taxType".to_string(),
                allowed: TaxType::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Category
// =============================================================================

/// Top-level catalog grouping; root of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, trimmed. Unique across all categories.
    pub name: String,

    /// Image URL.
    pub image: Option<String>,

    pub description: Option<String>,

    pub tax_applicability: bool,

    /// Non-negative tax value; meaning depends on `tax_type`.
    pub tax: f64,

    pub tax_type: TaxType,

    /// Subcategory ids, in creation order.
    pub subcategories: Vec<String>,

    /// Ids of items placed directly under this category, in creation order.
    pub items: Vec<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Validates a create request and builds a category with empty child lists.
    pub fn create(input: NewCategory, now: DateTime<Utc>) -> ValidationResult<Self> {
        let name = validate_name(&input.name)?;
        let tax = validate_tax(input.tax.unwrap_or(0.0))?;
        let tax_type = input
            .tax_type
            .as_deref()
            .map(parse_tax_type)
            .transpose()?
            .unwrap_or_default();

        Ok(Category {
            id: new_id(),
            name,
            image: input.image,
            description: input.description,
            tax_applicability: input.tax_applicability.unwrap_or(false),
            tax,
            tax_type,
            subcategories: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

// =============================================================================
// Subcategory
// =============================================================================

/// Second-level grouping, always owned by exactly one Category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Subcategory {
    pub id: String,

    /// Display name, trimmed. Not unique.
    pub name: String,

    pub image: Option<String>,

    pub description: Option<String>,

    pub tax_applicability: bool,

    pub tax: f64,

    /// Owning category id. Fixed at creation.
    pub category: String,

    /// Item ids, in creation order.
    pub items: Vec<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Subcategory {
    /// Validates a create request under `parent`.
    ///
    /// ## Attribute Inheritance
    /// ```text
    /// request.taxApplicability omitted ──► parent.taxApplicability
    /// request.tax omitted              ──► parent.tax
    /// ```
    /// The values are copied once. Later edits to the parent do not reach
    /// subcategories that already exist.
    pub fn create(
        input: NewSubcategory,
        parent: &Category,
        now: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        let draft = SubcategoryDraft::new(input, parent.id.clone(), now)?;
        Ok(draft.inherit(parent.tax_applicability, parent.tax))
    }
}

/// A validated subcategory create request whose omitted tax fields have not
/// been filled from the parent yet.
///
/// The store fills them with [`SubcategoryDraft::inherit`] inside the
/// transaction that inserts the row, so the copied values are the parent's
/// values at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryDraft {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl SubcategoryDraft {
    /// Validates `input` for a subcategory under `category_id`.
    pub fn new(
        input: NewSubcategory,
        category_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        Ok(SubcategoryDraft {
            id: new_id(),
            name: validate_name(&input.name)?,
            image: input.image,
            description: input.description,
            tax_applicability: input.tax_applicability,
            tax: input.tax.map(validate_tax).transpose()?,
            category: category_id.into(),
            created_at: now,
        })
    }

    /// Builds the subcategory, taking each omitted tax field from the parent.
    pub fn inherit(self, parent_tax_applicability: bool, parent_tax: f64) -> Subcategory {
        Subcategory {
            id: self.id,
            name: self.name,
            image: self.image,
            description: self.description,
            tax_applicability: self.tax_applicability.unwrap_or(parent_tax_applicability),
            tax: self.tax.unwrap_or(parent_tax),
            category: self.category,
            items: Vec::new(),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

// =============================================================================
// Item Parent
// =============================================================================

/// The single owner of an Item.
///
/// An enum rather than two optional ids: "both" and "neither" cannot be
/// represented once a request has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemParent {
    Category(String),
    Subcategory(String),
}

impl ItemParent {
    pub fn id(&self) -> &str {
        match self {
            ItemParent::Category(id) | ItemParent::Subcategory(id) => id,
        }
    }

    pub fn category_id(&self) -> Option<&str> {
        match self {
            ItemParent::Category(id) => Some(id),
            ItemParent::Subcategory(_) => None,
        }
    }

    pub fn subcategory_id(&self) -> Option<&str> {
        match self {
            ItemParent::Category(_) => None,
            ItemParent::Subcategory(id) => Some(id),
        }
    }

    /// Entity name of the parent, for messages and logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            ItemParent::Category(_) => "Category",
            ItemParent::Subcategory(_) => "Subcategory",
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// Leaf catalog entry.
///
/// `totalAmount` is deliberately absent: it is derived in [`Item::total_amount`]
/// and only appears on [`crate::views::ItemView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: bool,
    pub tax: f64,
    pub base_amount: f64,
    pub discount: f64,
    /// Owning category or subcategory. Fixed at creation.
    pub parent: ItemParent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Validates a create request.
    ///
    /// The parent check runs first, so a request naming both or neither
    /// parent is rejected before anything else is looked at.
    pub fn create(input: NewItem, now: DateTime<Utc>) -> ValidationResult<Self> {
        let parent = validate_item_parent(input.category_id, input.subcategory_id)?;
        let name = validate_name(&input.name)?;
        let tax = validate_tax(input.tax.unwrap_or(0.0))?;
        let base_amount = input
            .base_amount
            .ok_or_else(|| ValidationError::required("baseAmount"))
            .and_then(|v| validate_amount("baseAmount", v))?;
        let discount = validate_amount("discount", input.discount.unwrap_or(0.0))?;

        Ok(Item {
            id: new_id(),
            name,
            image: input.image,
            description: input.description,
            tax_applicability: input.tax_applicability.unwrap_or(false),
            tax,
            base_amount,
            discount,
            parent,
            created_at: now,
            updated_at: now,
        })
    }

    /// `baseAmount - discount`, computed on every call.
    #[inline]
    pub fn total_amount(&self) -> f64 {
        pricing::total_amount(self.base_amount, self.discount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn beverages() -> Category {
        Category::create(
            NewCategory {
                name: "  Beverages ".to_string(),
                tax_applicability: Some(true),
                tax: Some(5.0),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_tax_type_parse() {
        assert_eq!("Percentage".parse::<TaxType>().unwrap(), TaxType::Percentage);
        assert_eq!("Fixed".parse::<TaxType>().unwrap(), TaxType::Fixed);
        assert_eq!("None".parse::<TaxType>().unwrap(), TaxType::None);
        assert!("percentage".parse::<TaxType>().is_err());
        assert!("Flat".parse::<TaxType>().is_err());
        assert_eq!(TaxType::default(), TaxType::None);
    }

    #[test]
    fn test_category_defaults() {
        let category = Category::create(
            NewCategory {
                name: "Desserts".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        assert!(!category.tax_applicability);
        assert_eq!(category.tax, 0.0);
        assert_eq!(category.tax_type, TaxType::None);
        assert!(category.subcategories.is_empty());
        assert!(category.items.is_empty());
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn test_category_name_trimmed() {
        assert_eq!(beverages().name, "Beverages");
    }

    #[test]
    fn test_subcategory_inherits_tax_fields() {
        let parent = beverages();
        let sub = Subcategory::create(
            NewSubcategory {
                name: "Hot Drinks".to_string(),
                ..Default::default()
            },
            &parent,
            Utc::now(),
        )
        .unwrap();

        assert!(sub.tax_applicability);
        assert_eq!(sub.tax, 5.0);
        assert_eq!(sub.category, parent.id);
    }

    #[test]
    fn test_subcategory_explicit_tax_fields_win() {
        let parent = beverages();
        let sub = Subcategory::create(
            NewSubcategory {
                name: "Water".to_string(),
                tax_applicability: Some(false),
                tax: Some(0.0),
                ..Default::default()
            },
            &parent,
            Utc::now(),
        )
        .unwrap();

        assert!(!sub.tax_applicability);
        assert_eq!(sub.tax, 0.0);
    }

    #[test]
    fn test_item_requires_exactly_one_parent() {
        let both = NewItem {
            name: "Latte".to_string(),
            base_amount: Some(120.0),
            category_id: Some(new_id()),
            subcategory_id: Some(new_id()),
            ..Default::default()
        };
        assert_eq!(
            Item::create(both, Utc::now()).unwrap_err(),
            ValidationError::ConflictingParents
        );

        let neither = NewItem {
            name: "Latte".to_string(),
            base_amount: Some(120.0),
            ..Default::default()
        };
        assert_eq!(
            Item::create(neither, Utc::now()).unwrap_err(),
            ValidationError::MissingParent
        );
    }

    #[test]
    fn test_item_requires_base_amount() {
        let input = NewItem {
            name: "Latte".to_string(),
            subcategory_id: Some(new_id()),
            ..Default::default()
        };
        assert_eq!(
            Item::create(input, Utc::now()).unwrap_err(),
            ValidationError::required("baseAmount")
        );
    }

    #[test]
    fn test_draft_inherits_only_omitted_fields() {
        let draft = SubcategoryDraft::new(
            NewSubcategory {
                name: " Juices ".to_string(),
                tax: Some(0.0),
                ..Default::default()
            },
            "c",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(draft.name, "Juices");
        assert_eq!(draft.tax_applicability, None);

        let sub = draft.inherit(true, 18.0);
        assert!(sub.tax_applicability);
        assert_eq!(sub.tax, 0.0);
        assert_eq!(sub.category, "c");
        assert!(sub.items.is_empty());
        assert_eq!(sub.created_at, sub.updated_at);
    }

    #[test]
    fn test_draft_rejects_negative_tax() {
        let err = SubcategoryDraft::new(
            NewSubcategory {
                name: "Juices".to_string(),
                tax: Some(-2.0),
                ..Default::default()
            },
            "c",
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn test_item_total_amount() {
        let item = Item::create(
            NewItem {
                name: "Latte".to_string(),
                base_amount: Some(120.0),
                discount: Some(20.0),
                subcategory_id: Some(new_id()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(item.total_amount(), 100.0);
    }

    #[test]
    fn test_item_parent_accessors() {
        let parent = ItemParent::Subcategory("abc".to_string());
        assert_eq!(parent.id(), "abc");
        assert_eq!(parent.category_id(), None);
        assert_eq!(parent.subcategory_id(), Some("abc"));
        assert_eq!(parent.kind(), "Subcategory");
    }
}
