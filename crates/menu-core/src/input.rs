//! # Input Records
//!
//! Attribute records as the transport layer hands them over. Every field a
//! caller may omit is an `Option`, so "omitted" stays distinguishable from
//! "set to the default". Subcategory tax inheritance depends on that.
//!
//! Nothing here is validated yet; see [`crate::validation`], the `create`
//! constructors in [`crate::types`] and the change sets in [`crate::changes`].

use serde::Deserialize;

/// Create request for a Category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    /// Raw string; parsed into [`crate::TaxType`] during validation.
    pub tax_type: Option<String>,
}

/// Partial update for a Category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    pub tax_type: Option<String>,
}

/// Create request for a Subcategory. The owning category id comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSubcategory {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Omitted: copied from the parent category.
    pub tax_applicability: Option<bool>,
    /// Omitted: copied from the parent category.
    pub tax: Option<f64>,
}

/// Partial update for a Subcategory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubcategoryPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    /// Accepted only so it can be rejected.
    #[serde(alias = "categoryId")]
    pub category: Option<String>,
}

/// Create request for an Item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewItem {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    /// Required; kept optional here so a missing value is a validation error
    /// rather than a deserialisation failure.
    pub base_amount: Option<f64>,
    pub discount: Option<f64>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

/// Partial update for an Item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tax_applicability: Option<bool>,
    pub tax: Option<f64>,
    pub base_amount: Option<f64>,
    pub discount: Option<f64>,
    /// Accepted only so it can be rejected.
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    /// Accepted only so it can be rejected.
    #[serde(alias = "subcategory")]
    pub subcategory_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_from_camel_case_json() {
        let input: NewItem = serde_json::from_str(
            r#"{"name":"Latte","baseAmount":120,"discount":20,"subcategoryId":"abc"}"#,
        )
        .unwrap();

        assert_eq!(input.name, "Latte");
        assert_eq!(input.base_amount, Some(120.0));
        assert_eq!(input.discount, Some(20.0));
        assert_eq!(input.subcategory_id.as_deref(), Some("abc"));
        assert!(input.category_id.is_none());
    }

    #[test]
    fn test_omitted_tax_fields_stay_none() {
        let input: NewSubcategory = serde_json::from_str(r#"{"name":"Hot Drinks"}"#).unwrap();
        assert!(input.tax_applicability.is_none());
        assert!(input.tax.is_none());
    }

    #[test]
    fn test_subcategory_patch_category_alias() {
        let patch: SubcategoryPatch = serde_json::from_str(r#"{"categoryId":"x"}"#).unwrap();
        assert_eq!(patch.category.as_deref(), Some("x"));
    }
}
