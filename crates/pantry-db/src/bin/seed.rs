//! # Seed Data Generator
//!
//! Populates a database with sample items and recipes for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p pantry-db --bin seed
//!
//! # Specify database path
//! cargo run -p pantry-db --bin seed -- --db ./data/pantry.db
//! ```
//!
//! Items are spread over all three locations and some share recipe
//! ingredient names, so the availability banner has something to show.

use std::env;

use pantry_core::{ItemLocation, NewIngredient, NewItem, NewRecipe, NewStep};
use pantry_db::{Database, DbConfig};

/// (name, location, barcode)
const ITEMS: &[(&str, ItemLocation, Option<&str>)] = &[
    ("Milk", ItemLocation::Inventory, Some("012345678905")),
    ("Eggs", ItemLocation::Inventory, Some("036000291452")),
    ("Butter", ItemLocation::Inventory, None),
    ("Flour", ItemLocation::Inventory, Some("041196910759")),
    ("Spaghetti", ItemLocation::Inventory, Some("076808501155")),
    ("Garlic", ItemLocation::Inventory, None),
    ("Olive Oil", ItemLocation::GroceryList, Some("041331024198")),
    ("Parmesan", ItemLocation::GroceryList, None),
    ("Tomatoes", ItemLocation::GroceryList, None),
    ("Candles", ItemLocation::Neither, None),
];

fn pancakes() -> NewRecipe {
    NewRecipe {
        description: Some("Fluffy weekend pancakes".to_string()),
        servings: 4,
        prep_time_minutes: Some(10),
        cook_time_minutes: Some(15),
        is_favorite: true,
        ingredients: vec![
            ingredient("Flour", "1.5", "cups"),
            ingredient("Milk", "1.25", "cups"),
            ingredient("Eggs", "1", ""),
            ingredient("Butter", "3", "tbsp"),
        ],
        steps: vec![
            NewStep::new(1, "Whisk the flour with a pinch of salt."),
            NewStep::new(2, "Beat in the milk, egg and melted butter."),
            NewStep::new(3, "Cook ladlefuls on a hot griddle until golden."),
        ],
        ..NewRecipe::named("Pancakes")
    }
}

fn pasta() -> NewRecipe {
    NewRecipe {
        description: Some("Spaghetti aglio e olio".to_string()),
        servings: 2,
        prep_time_minutes: Some(5),
        cook_time_minutes: Some(12),
        ingredients: vec![
            ingredient("Spaghetti", "200", "g"),
            ingredient("Garlic", "4", "cloves"),
            ingredient("Olive Oil", "4", "tbsp"),
            ingredient("Parmesan", "30", "g"),
        ],
        steps: vec![
            NewStep::new(1, "Boil the spaghetti in salted water."),
            NewStep::new(2, "Gently fry sliced garlic in the oil."),
            NewStep::new(3, "Toss the pasta in the oil and top with parmesan."),
        ],
        ..NewRecipe::named("Simple Pasta")
    }
}

fn ingredient(name: &str, amount: &str, unit: &str) -> NewIngredient {
    NewIngredient {
        amount: Some(amount.to_string()),
        unit: (!unit.is_empty()).then(|| unit.to_string()),
        ..NewIngredient::named(name)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pantry_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pantry Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pantry_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pantry Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (name, location, barcode) in ITEMS {
        let mut item = NewItem::named(*name).at(*location);
        if let Some(code) = barcode {
            item = item.with_barcode(*code);
        }
        db.items().create(&item).await?;
    }
    println!("✓ Created {} items", ITEMS.len());

    let recipes = [pancakes(), pasta()];
    for recipe in &recipes {
        db.recipes().create(recipe).await?;
    }
    println!("✓ Created {} recipes", recipes.len());

    db.close().await;
    println!();
    println!("Done.");
    Ok(())
}
