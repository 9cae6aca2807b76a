//! # Read Views
//!
//! What read operations return: entities with their child lists resolved to
//! full records and derived fields filled in.
//!
//! ```text
//! CategoryView
//! ├── category fields
//! ├── subcategories: [Subcategory]   (item ids, not resolved further)
//! └── items:         [ItemView]      (direct children only)
//!
//! SubcategoryView
//! ├── subcategory fields
//! └── items: [ItemView]
//!
//! ItemView
//! ├── item fields, parent as category / subcategory
//! └── totalAmount = baseAmount - discount   (computed here, never stored)
//! ```
//!
//! Children are returned in child-list order. An id in a list with no
//! matching record is skipped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::types::{Category, Item, Subcategory, TaxType};

// =============================================================================
// Item View
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: bool,
    pub tax: f64,
    pub base_amount: f64,
    pub discount: f64,
    /// Derived; see [`crate::pricing::total_amount`].
    pub total_amount: f64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let total_amount = item.total_amount();
        ItemView {
            category: item.parent.category_id().map(str::to_string),
            subcategory: item.parent.subcategory_id().map(str::to_string),
            id: item.id,
            name: item.name,
            image: item.image,
            description: item.description,
            tax_applicability: item.tax_applicability,
            tax: item.tax,
            base_amount: item.base_amount,
            discount: item.discount,
            total_amount,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// =============================================================================
// Subcategory View
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubcategoryView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: bool,
    pub tax: f64,
    pub category: String,
    pub items: Vec<ItemView>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SubcategoryView {
    /// Builds the view, ordering `items` by the subcategory's item list.
    pub fn resolve(subcategory: Subcategory, items: Vec<Item>) -> Self {
        let items = in_list_order(&subcategory.items, items, |i| &i.id)
            .into_iter()
            .map(ItemView::from)
            .collect();

        SubcategoryView {
            id: subcategory.id,
            name: subcategory.name,
            image: subcategory.image,
            description: subcategory.description,
            tax_applicability: subcategory.tax_applicability,
            tax: subcategory.tax,
            category: subcategory.category,
            items,
            created_at: subcategory.created_at,
            updated_at: subcategory.updated_at,
        }
    }
}

// =============================================================================
// Category View
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: bool,
    pub tax: f64,
    pub tax_type: TaxType,
    pub subcategories: Vec<Subcategory>,
    pub items: Vec<ItemView>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CategoryView {
    /// Builds the view, ordering both child collections by the category's lists.
    pub fn resolve(category: Category, subcategories: Vec<Subcategory>, items: Vec<Item>) -> Self {
        let subcategories = in_list_order(&category.subcategories, subcategories, |s| &s.id);
        let items = in_list_order(&category.items, items, |i| &i.id)
            .into_iter()
            .map(ItemView::from)
            .collect();

        CategoryView {
            id: category.id,
            name: category.name,
            image: category.image,
            description: category.description,
            tax_applicability: category.tax_applicability,
            tax: category.tax,
            tax_type: category.tax_type,
            subcategories,
            items,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Reorders `records` to follow `ids`, dropping records not in the list.
fn in_list_order<T>(ids: &[String], records: Vec<T>, id_of: impl Fn(&T) -> &String) -> Vec<T> {
    let mut by_id: HashMap<String, T> = records
        .into_iter()
        .map(|r| (id_of(&r).clone(), r))
        .collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
