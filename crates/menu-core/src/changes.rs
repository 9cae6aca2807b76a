//! # Validated Edits
//!
//! A patch as it arrives is a bag of optional raw values. Converting it with
//! `TryFrom` validates every present field and yields a change set the store
//! writes column by column.
//!
//! ## Edit Flow
//! ```text
//! CategoryPatch { description: "Drinks" }
//!      │ try_from: trim name, parse taxType, check amounts
//!      ▼
//! CategoryChanges { description: Some("Drinks"), everything else None }
//!      │
//!      ▼
//! UPDATE categories SET updated_at = ?, description = ? WHERE id = ?
//!      (tax, name, ... not in the statement, so a concurrent edit to them stands)
//! ```
//!
//! Parent linkage is never part of a change set. A patch naming a parent is
//! rejected during conversion.

use crate::error::{ValidationError, ValidationResult};
use crate::input::{CategoryPatch, ItemPatch, SubcategoryPatch};
use crate::types::TaxType;
use crate::validation::{parse_tax_type, validate_amount, validate_name, validate_tax};

/// Columns an edit to a Category may set. `None` leaves the column as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    pub tax_type: Option<TaxType>,
}

impl TryFrom<CategoryPatch> for CategoryChanges {
    type Error = ValidationError;

    fn try_from(patch: CategoryPatch) -> ValidationResult<Self> {
        Ok(CategoryChanges {
            name: patch.name.as_deref().map(validate_name).transpose()?,
            image: patch.image,
            description: patch.description,
            tax_applicability: patch.tax_applicability,
            tax: patch.tax.map(validate_tax).transpose()?,
            tax_type: patch.tax_type.as_deref().map(parse_tax_type).transpose()?,
        })
    }
}

/// Columns an edit to a Subcategory may set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubcategoryChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
}

impl TryFrom<SubcategoryPatch> for SubcategoryChanges {
    type Error = ValidationError;

    fn try_from(patch: SubcategoryPatch) -> ValidationResult<Self> {
        if patch.category.is_some() {
            return Err(ValidationError::immutable("category"));
        }

        Ok(SubcategoryChanges {
            name: patch.name.as_deref().map(validate_name).transpose()?,
            image: patch.image,
            description: patch.description,
            tax_applicability: patch.tax_applicability,
            tax: patch.tax.map(validate_tax).transpose()?,
        })
    }
}

/// Columns an edit to an Item may set. `totalAmount` has no column and
/// follows whatever `base_amount` and `discount` end up stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    pub base_amount: Option<f64>,
    pub discount: Option<f64>,
}

impl TryFrom<ItemPatch> for ItemChanges {
    type Error = ValidationError;

    fn try_from(patch: ItemPatch) -> ValidationResult<Self> {
        if patch.category_id.is_some() {
            return Err(ValidationError::immutable("categoryId"));
        }
        if patch.subcategory_id.is_some() {
            return Err(ValidationError::immutable("subcategoryId"));
        }

        Ok(ItemChanges {
            name: patch.name.as_deref().map(validate_name).transpose()?,
            image: patch.image,
            description: patch.description,
            tax_applicability: patch.tax_applicability,
            tax: patch.tax.map(validate_tax).transpose()?,
            base_amount: patch
                .base_amount
                .map(|v| validate_amount("baseAmount", v))
                .transpose()?,
            discount: patch
                .discount
                .map(|v| validate_amount("discount", v))
                .transpose()?,
        })
    }
}
