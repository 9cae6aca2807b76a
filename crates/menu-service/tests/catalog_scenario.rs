//! End-to-end catalog behaviour against a real SQLite store.

use std::collections::HashSet;
use std::path::PathBuf;

use menu_core::{new_id, NewCategory, NewItem, NewSubcategory, TaxType};
use menu_db::{Database, DbConfig, EntityStore};
use menu_service::{ApiError, Catalog, CatalogError, CatalogStores, ErrorCode};

async fn in_memory() -> (Database, Catalog) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let catalog = Catalog::sqlite(&db);
    (db, catalog)
}

fn beverages() -> NewCategory {
    NewCategory {
        name: "Beverages".to_string(),
        tax_applicability: Some(true),
        tax: Some(5.0),
        ..Default::default()
    }
}

fn named_item(name: &str, category_id: Option<&str>, subcategory_id: Option<&str>) -> NewItem {
    NewItem {
        name: name.to_string(),
        base_amount: Some(10.0),
        category_id: category_id.map(str::to_string),
        subcategory_id: subcategory_id.map(str::to_string),
        ..Default::default()
    }
}

/// A file-backed database so several pool connections can write at once.
struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        TempDb {
            path: std::env::temp_dir().join(format!("menu-catalog-{}.db", new_id())),
        }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

#[tokio::test]
async fn beverages_hot_drinks_latte() {
    let (db, catalog) = in_memory().await;

    let category = catalog.categories.create(beverages()).await.unwrap();
    assert!(category.subcategories.is_empty());
    assert!(category.items.is_empty());

    let hot_drinks = catalog
        .subcategories
        .create(
            &category.id,
            NewSubcategory {
                name: "Hot Drinks".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(hot_drinks.tax_applicability);
    assert_eq!(hot_drinks.tax, 5.0);

    let category_view = catalog.categories.get_by_id_or_name("Beverages").await.unwrap();
    assert_eq!(category_view.subcategories.len(), 1);
    assert_eq!(category_view.subcategories[0].id, hot_drinks.id);

    let latte = catalog
        .items
        .create(NewItem {
            name: "Latte".to_string(),
            base_amount: Some(120.0),
            discount: Some(20.0),
            subcategory_id: Some(hot_drinks.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(latte.total_amount, 100.0);

    let sub_view = catalog
        .subcategories
        .get_by_id_or_name(&hot_drinks.id)
        .await
        .unwrap();
    assert_eq!(sub_view.items.len(), 1);
    assert_eq!(sub_view.items[0].id, latte.id);
    assert_eq!(sub_view.items[0].total_amount, 100.0);

    let hits = catalog.items.search_by_name(Some("lAtTe")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, latte.id);

    let miss = catalog.items.search_by_name(Some("zzz")).await.unwrap_err();
    assert!(matches!(miss, CatalogError::NotFound(_)));
    assert_eq!(miss.status_code(), 404);

    db.close().await;
}

#[tokio::test]
async fn get_all_resolves_full_children() {
    let (_db, catalog) = in_memory().await;

    let category = catalog.categories.create(beverages()).await.unwrap();
    let sub = catalog
        .subcategories
        .create(
            &category.id,
            NewSubcategory {
                name: "Cold Drinks".to_string(),
                tax: Some(0.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let water = catalog
        .items
        .create(named_item("Water", Some(category.id.as_str()), None))
        .await
        .unwrap();
    let soda = catalog
        .items
        .create(named_item("Soda", None, Some(sub.id.as_str())))
        .await
        .unwrap();

    let all = catalog.categories.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].subcategories[0].items, vec![soda.id.clone()]);
    assert_eq!(all[0].items.len(), 1);
    assert_eq!(all[0].items[0].name, "Water");
    assert_eq!(all[0].items[0].id, water.id);

    let subs = catalog.subcategories.get_all().await.unwrap();
    assert_eq!(subs[0].items[0].name, "Soda");

    let items = catalog.items.get_all().await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|i| i.total_amount == i.base_amount - i.discount));
    assert!(items
        .iter()
        .all(|i| i.category.is_some() != i.subcategory.is_some()));
}

#[tokio::test]
async fn inheritance_snapshot_survives_category_edit() {
    let (_db, catalog) = in_memory().await;
    let category = catalog.categories.create(beverages()).await.unwrap();
    let sub = catalog
        .subcategories
        .create(
            &category.id,
            NewSubcategory {
                name: "Hot Drinks".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let edited = catalog
        .categories
        .edit(
            &category.id,
            menu_core::CategoryPatch {
                tax: Some(18.0),
                tax_type: Some("Percentage".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.tax_type, TaxType::Percentage);

    let after = catalog.subcategories.get_by_id_or_name("Hot Drinks").await.unwrap();
    assert_eq!(after.id, sub.id);
    assert_eq!(after.tax, 5.0);
}

#[tokio::test]
async fn duplicate_category_maps_to_bad_request() {
    let (_db, catalog) = in_memory().await;
    catalog.categories.create(beverages()).await.unwrap();

    let err = catalog.categories.create(beverages()).await.unwrap_err();
    let api = ApiError::from(err);
    assert_eq!(api.code, ErrorCode::DuplicateName);
    assert_eq!(api.status_code(), 400);

    assert_eq!(catalog.categories.get_all().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_child_creates_lose_nothing() {
    let tmp = TempDb::new();
    let db = Database::new(DbConfig::new(&tmp.path).max_connections(4))
        .await
        .unwrap();
    let stores = CatalogStores::sqlite(&db);
    let catalog = Catalog::new(stores.clone());

    let category = catalog.categories.create(beverages()).await.unwrap();

    let mut tasks = Vec::new();
    for n in 0..8 {
        let catalog = catalog.clone();
        let category_id = category.id.clone();
        tasks.push(tokio::spawn(async move {
            let sub = catalog
                .subcategories
                .create(
                    &category_id,
                    NewSubcategory {
                        name: format!("Sub {n}"),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let item = catalog
                .items
                .create(named_item(&format!("Item {n}"), Some(category_id.as_str()), None))
                .await
                .unwrap();
            (sub.id, item.id)
        }));
    }

    let mut sub_ids = HashSet::new();
    let mut item_ids = HashSet::new();
    for task in tasks {
        let (sub_id, item_id) = task.await.unwrap();
        sub_ids.insert(sub_id);
        item_ids.insert(item_id);
    }

    let parent = stores.categories.find_by_id(&category.id).await.unwrap().unwrap();
    assert_eq!(parent.subcategories.len(), 8);
    assert_eq!(parent.items.len(), 8);
    assert_eq!(parent.subcategories.iter().cloned().collect::<HashSet<_>>(), sub_ids);
    assert_eq!(parent.items.iter().cloned().collect::<HashSet<_>>(), item_ids);

    db.close().await;
}
