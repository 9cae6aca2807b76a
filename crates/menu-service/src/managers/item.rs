//! # Item Manager
//!
//! ## Creating an Item
//! ```text
//! create(input)
//!    │
//!    ├─ 1. Item::create(input)
//!    │       both / neither parent ──────────► Validation (before any store call)
//!    │       negative amount, blank name ────► Validation
//!    ├─ 2. resolve the one parent by id ─────► NotFound "Parent ... not found"
//!    └─ 3. UnitOfWork::create_item
//!            insert row + append to parent's item list
//!            any failure ────────────────────► TransactionFailure, nothing written
//! ```
//!
//! `totalAmount` is never written; every returned [`ItemView`] computes it.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::lookup;
use crate::stores::CatalogStores;
use menu_core::validation::validate_search_term;
use menu_core::{Item, ItemChanges, ItemParent, ItemPatch, ItemView, NewItem};
use menu_db::{EntityStore, ItemStore, UnitOfWork};

#[derive(Debug, Clone)]
pub struct ItemManager {
    stores: CatalogStores,
}

impl ItemManager {
    pub fn new(stores: CatalogStores) -> Self {
        ItemManager { stores }
    }

    /// Creates an item under exactly one parent and appends it to that
    /// parent's item list in one transaction.
    pub async fn create(&self, input: NewItem) -> CatalogResult<ItemView> {
        let mut item = Item::create(input, Utc::now()).inspect_err(|e| {
            warn!(error = %e, "Rejected item create");
        })?;

        item.parent = self.resolve_parent(&item.parent).await?;

        self.stores
            .coordinator
            .execute(UnitOfWork::create_item(item.clone()))
            .await?;

        info!(
            id = %item.id,
            parent = item.parent.kind(),
            parent_id = %item.parent.id(),
            "Item created"
        );
        Ok(ItemView::from(item))
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<ItemView>> {
        let items = self.stores.items.list().await?;
        Ok(items.into_iter().map(ItemView::from).collect())
    }

    /// Items placed directly under `category_id`; empty when none.
    pub async fn get_by_category(&self, category_id: &str) -> CatalogResult<Vec<ItemView>> {
        let Some(category_id) = lookup::canonical_id(category_id) else {
            return Ok(Vec::new());
        };
        let items = self.stores.items.list_by_category(&category_id).await?;
        Ok(items.into_iter().map(ItemView::from).collect())
    }

    /// Items placed under `subcategory_id`; empty when none.
    pub async fn get_by_subcategory(&self, subcategory_id: &str) -> CatalogResult<Vec<ItemView>> {
        let Some(subcategory_id) = lookup::canonical_id(subcategory_id) else {
            return Ok(Vec::new());
        };
        let items = self.stores.items.list_by_subcategory(&subcategory_id).await?;
        Ok(items.into_iter().map(ItemView::from).collect())
    }

    pub async fn get_by_id_or_name(&self, token: &str) -> CatalogResult<ItemView> {
        let item: Item = lookup::resolve(&*self.stores.items, "Item", token).await?;
        Ok(ItemView::from(item))
    }

    /// Writes the provided fields. A patch naming a parent is rejected.
    /// `totalAmount` in the result reflects the amounts as stored after the
    /// update, including any written concurrently.
    pub async fn edit(&self, id: &str, patch: ItemPatch) -> CatalogResult<ItemView> {
        let id = lookup::canonical_id(id).ok_or_else(|| CatalogError::not_found("Item", id))?;

        let changes = ItemChanges::try_from(patch).inspect_err(|e| {
            warn!(id = %id, error = %e, "Rejected item edit");
        })?;

        let item = self.stores.items.update(&id, &changes, Utc::now()).await?;

        info!(id = %item.id, "Item updated");
        Ok(ItemView::from(item))
    }

    /// Case-insensitive substring search on name. The term is matched as
    /// given, surrounding whitespace included.
    ///
    /// Unlike the by-parent listings, zero matches is `NotFound`.
    pub async fn search_by_name(&self, term: Option<&str>) -> CatalogResult<Vec<ItemView>> {
        let term = validate_search_term(term).inspect_err(|e| {
            warn!(error = %e, "Rejected item search");
        })?;

        let items = self.stores.items.search_by_name(&term).await?;
        if items.is_empty() {
            return Err(CatalogError::NotFound(
                "No items found matching that name".to_string(),
            ));
        }

        Ok(items.into_iter().map(ItemView::from).collect())
    }

    /// Checks the parent exists and returns it with a canonical id.
    async fn resolve_parent(&self, parent: &ItemParent) -> CatalogResult<ItemParent> {
        let missing = || {
            warn!(parent = parent.kind(), parent_id = %parent.id(), "Item parent not found");
            CatalogError::parent_not_found(parent.kind())
        };

        let id = lookup::canonical_id(parent.id()).ok_or_else(missing)?;

        match parent {
            ItemParent::Category(_) => {
                self.stores
                    .categories
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(missing)?;
                Ok(ItemParent::Category(id))
            }
            ItemParent::Subcategory(_) => {
                self.stores
                    .subcategories
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(missing)?;
                Ok(ItemParent::Subcategory(id))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
