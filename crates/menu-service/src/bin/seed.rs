//! # Seed Data Generator
//!
//! Populates the catalog with a demo menu for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by MENU_DATABASE_PATH (default ./menu.db)
//! cargo run -p menu-service --bin seed
//!
//! # Specify database path
//! cargo run -p menu-service --bin seed -- --db ./data/menu.db
//! ```
//!
//! ## Generated Menu
//! - Categories with their own tax settings
//! - Subcategories that inherit tax from their category
//! - Items under subcategories and directly under categories
//!
//! Everything goes through the public managers, so the seed exercises the
//! same validation and transactions as real callers.

use std::env;

use anyhow::Context;
use menu_core::{NewCategory, NewItem, NewSubcategory};
use menu_db::{CategoryStore, Database};
use menu_service::{telemetry, Catalog, CatalogConfig, CatalogStores};

/// One demo category. Subcategories leave their tax fields out so they
/// inherit the category's.
struct SeedCategory {
    name: &'static str,
    tax_applicability: bool,
    tax: f64,
    tax_type: &'static str,
    subcategories: &'static [SeedSubcategory],
    items: &'static [SeedItem],
}

struct SeedSubcategory {
    name: &'static str,
    items: &'static [SeedItem],
}

/// (name, baseAmount, discount)
type SeedItem = (&'static str, f64, f64);

const MENU: &[SeedCategory] = &[
    SeedCategory {
        name: "Beverages",
        tax_applicability: true,
        tax: 5.0,
        tax_type: "Percentage",
        subcategories: &[
            SeedSubcategory {
                name: "Hot Drinks",
                items: &[
                    ("Latte", 120.0, 20.0),
                    ("Cappuccino", 110.0, 0.0),
                    ("Masala Chai", 60.0, 5.0),
                ],
            },
            SeedSubcategory {
                name: "Cold Drinks",
                items: &[("Iced Latte", 140.0, 10.0), ("Lemonade", 80.0, 0.0)],
            },
        ],
        items: &[("Bottled Water", 20.0, 0.0)],
    },
    SeedCategory {
        name: "Bakery",
        tax_applicability: false,
        tax: 0.0,
        tax_type: "None",
        subcategories: &[SeedSubcategory {
            name: "Pastries",
            items: &[("Croissant", 90.0, 0.0), ("Pain au Chocolat", 110.0, 15.0)],
        }],
        items: &[("Sourdough Loaf", 250.0, 25.0)],
    },
    SeedCategory {
        name: "Meals",
        tax_applicability: true,
        tax: 25.0,
        tax_type: "Fixed",
        subcategories: &[
            SeedSubcategory {
                name: "Breakfast",
                items: &[("Avocado Toast", 220.0, 0.0), ("Masala Omelette", 180.0, 20.0)],
            },
            SeedSubcategory {
                name: "Bowls",
                items: &[("Paneer Rice Bowl", 260.0, 30.0)],
            },
        ],
        items: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CatalogConfig::load()?;

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Menu Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $MENU_DATABASE_PATH or ./menu.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    telemetry::init_tracing(&config.log_level);

    println!("🌱 Menu Catalog Seed Data Generator");
    println!("===================================");
    println!("Database: {}", config.database_path);
    println!();

    let db = Database::new(config.db_config())
        .await
        .with_context(|| format!("opening {}", config.database_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let stores = CatalogStores::sqlite(&db);
    let existing = stores.categories.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} categories", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = Catalog::new(stores);
    let (mut categories, mut subcategories, mut items) = (0, 0, 0);

    for seed in MENU {
        let category = catalog
            .categories
            .create(NewCategory {
                name: seed.name.to_string(),
                tax_applicability: Some(seed.tax_applicability),
                tax: Some(seed.tax),
                tax_type: Some(seed.tax_type.to_string()),
                ..Default::default()
            })
            .await
            .with_context(|| format!("creating category {}", seed.name))?;
        categories += 1;

        for sub in seed.subcategories {
            let subcategory = catalog
                .subcategories
                .create(
                    &category.id,
                    NewSubcategory {
                        name: sub.name.to_string(),
                        ..Default::default()
                    },
                )
                .await
                .with_context(|| format!("creating subcategory {}", sub.name))?;
            subcategories += 1;

            for &(name, base, discount) in sub.items {
                catalog
                    .items
                    .create(item(name, base, discount, None, Some(subcategory.id.as_str())))
                    .await
                    .with_context(|| format!("creating item {name}"))?;
                items += 1;
            }
        }

        for &(name, base, discount) in seed.items {
            catalog
                .items
                .create(item(name, base, discount, Some(category.id.as_str()), None))
                .await
                .with_context(|| format!("creating item {name}"))?;
            items += 1;
        }
    }

    println!();
    println!(
        "✓ Created {} categories, {} subcategories, {} items",
        categories, subcategories, items
    );

    // Verify search
    println!();
    println!("Verifying search...");
    let hits = catalog.items.search_by_name(Some("latte")).await?;
    println!("  Search 'latte': {} results", hits.len());
    for hit in &hits {
        println!("    {} → total {:.2}", hit.name, hit.total_amount);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

fn item(
    name: &str,
    base_amount: f64,
    discount: f64,
    category_id: Option<&str>,
    subcategory_id: Option<&str>,
) -> NewItem {
    NewItem {
        name: name.to_string(),
        base_amount: Some(base_amount),
        discount: Some(discount),
        category_id: category_id.map(str::to_string),
        subcategory_id: subcategory_id.map(str::to_string),
        ..Default::default()
    }
}
