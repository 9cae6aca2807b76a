//! # Category Manager
//!
//! Categories are the root of the hierarchy and the source subcategories
//! inherit their tax settings from.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::lookup;
use crate::stores::CatalogStores;
use menu_core::{
    Category, CategoryChanges, CategoryPatch, CategoryView, Item, NewCategory, Subcategory,
};
use menu_db::{CategoryStore, EntityStore};

#[derive(Debug, Clone)]
pub struct CategoryManager {
    stores: CatalogStores,
}

impl CategoryManager {
    pub fn new(stores: CatalogStores) -> Self {
        CategoryManager { stores }
    }

    /// Creates a category with empty child lists.
    ///
    /// ## Errors
    /// - `Validation` for a blank name, negative tax or unknown `taxType`
    /// - `DuplicateName` if a category already has this name
    pub async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        let category = Category::create(input, Utc::now()).inspect_err(|e| {
            warn!(error = %e, "Rejected category create");
        })?;

        self.ensure_name_free(&category.name, None).await?;

        // The UNIQUE index catches a racing create with the same name
        self.stores.categories.insert(&category).await?;

        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Every category with its subcategories and direct items resolved.
    pub async fn get_all(&self) -> CatalogResult<Vec<CategoryView>> {
        let categories = self.stores.categories.list().await?;
        self.resolve_children(categories).await
    }

    /// Looks up by id when `token` is one, otherwise by exact name.
    pub async fn get_by_id_or_name(&self, token: &str) -> CatalogResult<CategoryView> {
        let category: Category =
            lookup::resolve(&*self.stores.categories, "Category", token).await?;

        let mut views = self.resolve_children(vec![category]).await?;
        views
            .pop()
            .ok_or_else(|| CatalogError::not_found("Category", token))
    }

    /// Writes the provided fields and returns the stored category. Fields
    /// left out of `patch` keep whatever value is stored when the update
    /// runs. Child lists are not editable.
    pub async fn edit(&self, id: &str, patch: CategoryPatch) -> CatalogResult<Category> {
        let id = lookup::canonical_id(id).ok_or_else(|| CatalogError::not_found("Category", id))?;

        let changes = CategoryChanges::try_from(patch).inspect_err(|e| {
            warn!(id = %id, error = %e, "Rejected category edit");
        })?;
        if let Some(name) = &changes.name {
            self.ensure_name_free(name, Some(&id)).await?;
        }

        let category = self
            .stores
            .categories
            .update(&id, &changes, Utc::now())
            .await?;

        info!(id = %category.id, "Category updated");
        Ok(category)
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<&str>) -> CatalogResult<()> {
        match self.stores.categories.find_by_name(name).await? {
            Some(existing) if Some(existing.id.as_str()) != owner => {
                warn!(name = %name, "Category name already taken");
                Err(CatalogError::DuplicateName(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Loads every referenced child in two queries and hands each category
    /// its own share.
    async fn resolve_children(&self, categories: Vec<Category>) -> CatalogResult<Vec<CategoryView>> {
        let subcategory_ids: Vec<String> = categories
            .iter()
            .flat_map(|c| c.subcategories.iter().cloned())
            .collect();
        let item_ids: Vec<String> = categories
            .iter()
            .flat_map(|c| c.items.iter().cloned())
            .collect();

        let mut subcategories: HashMap<String, Subcategory> = self
            .stores
            .subcategories
            .find_many(&subcategory_ids)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        let mut items: HashMap<String, Item> = self
            .stores
            .items
            .find_many(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let subs = category
                    .subcategories
                    .iter()
                    .filter_map(|id| subcategories.remove(id))
                    .collect();
                let its = category
                    .items
                    .iter()
                    .filter_map(|id| items.remove(id))
                    .collect();
                CategoryView::resolve(category, subs, its)
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
