//! # Lookup Resolver
//!
//! Shared by all three `get_by_id_or_name` operations.
//!
//! ```text
//! token ──► LookupKey::parse
//!              │
//!              ├── Id(canonical) ──► store.find_by_id
//!              └── Name(token)   ──► store.find_by_name   (oldest wins)
//!                                        │
//!                                  None ─┴─► CatalogError::NotFound
//! ```

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use menu_core::LookupKey;
use menu_db::EntityStore;

/// Resolves `token` as an id when it is one, otherwise as an exact name.
pub async fn resolve<T, S>(store: &S, entity: &str, token: &str) -> CatalogResult<T>
where
    S: EntityStore<T> + ?Sized,
{
    let key = LookupKey::parse(token);
    debug!(entity, key = ?key, "Resolving lookup token");

    let found = match &key {
        LookupKey::Id(id) => store.find_by_id(id).await?,
        LookupKey::Name(name) => store.find_by_name(name).await?,
    };

    found.ok_or_else(|| CatalogError::not_found(entity, token))
}

/// The canonical form of `token` if it is a well-formed id.
pub fn canonical_id(token: &str) -> Option<String> {
    match LookupKey::parse(token) {
        LookupKey::Id(id) => Some(id),
        LookupKey::Name(_) => None,
    }
}
