//! Demo data loaded into an empty store.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::{Collection, Database};
use crate::error::Result;
use crate::models::{
    Expense, MenuItem, PaymentMethod, Purchase, RawMaterial, RecipeLine, Transaction,
    TransactionItem, User,
};

pub const DEMO_EMAIL: &str = "admin@kasir.com";
pub const DEMO_PASSWORD: &str = "admin123";

fn material(
    id: &str,
    name: &str,
    unit: &str,
    stock: f64,
    min_stock: f64,
    price: f64,
    supplier: &str,
) -> RawMaterial {
    RawMaterial {
        id: id.to_string(),
        name: name.to_string(),
        unit: unit.to_string(),
        stock,
        min_stock,
        price,
        supplier: supplier.to_string(),
    }
}

fn recipe(lines: &[(&str, f64)]) -> Vec<RecipeLine> {
    lines
        .iter()
        .map(|(material_id, quantity)| RecipeLine {
            material_id: material_id.to_string(),
            quantity: *quantity,
        })
        .collect()
}

pub fn demo_users() -> Vec<User> {
    vec![User {
        id: "1".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
        name: "Admin Kasir".to_string(),
        role: "admin".to_string(),
    }]
}

pub fn demo_materials() -> Vec<RawMaterial> {
    vec![
        material("1", "Wheat Flour", "kg", 50.0, 10.0, 12000.0, "PT. Sumber Pangan"),
        material("2", "Granulated Sugar", "kg", 25.0, 5.0, 15000.0, "Toko Manis Jaya"),
        material("3", "Chicken Eggs", "pcs", 200.0, 50.0, 2500.0, "Peternakan Sari"),
        material("4", "Butter", "kg", 8.0, 2.0, 35000.0, "Dairy Fresh"),
    ]
}

pub fn demo_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            id: "1".to_string(),
            name: "Brownies".to_string(),
            category: "Cake".to_string(),
            price: 25000.0,
            recipe: recipe(&[("1", 0.2), ("2", 0.15), ("3", 2.0), ("4", 0.1)]),
            is_active: true,
        },
        MenuItem {
            id: "2".to_string(),
            name: "Sweet Bun".to_string(),
            category: "Bread".to_string(),
            price: 15000.0,
            recipe: recipe(&[("1", 0.3), ("2", 0.05), ("3", 1.0), ("4", 0.05)]),
            is_active: true,
        },
    ]
}

pub fn demo_transactions(today: NaiveDate) -> Vec<Transaction> {
    vec![Transaction {
        id: "1".to_string(),
        date: today,
        items: vec![TransactionItem {
            menu_id: "1".to_string(),
            menu_name: "Brownies".to_string(),
            quantity: 2,
            price: 25000.0,
            subtotal: 50000.0,
        }],
        total: 50000.0,
        payment_method: PaymentMethod::Cash,
        cashier_name: "Admin Kasir".to_string(),
        subtotal: 50000.0,
        discount_amount: 0.0,
        discount_reason: None,
        created_at: None,
    }]
}

/// Overwrite every collection with the demo set.
pub fn seed_demo_data(db: &Database, today: NaiveDate) -> Result<()> {
    db.save(Collection::Users, &demo_users())?;
    db.save(Collection::RawMaterials, &demo_materials())?;
    db.save(Collection::MenuItems, &demo_menu())?;
    db.save(Collection::Transactions, &demo_transactions(today))?;
    db.save::<Purchase>(Collection::Purchases, &[])?;
    db.save::<Expense>(Collection::Expenses, &[])?;

    info!(namespace = %db.namespace(), "demo data seeded");
    Ok(())
}

/// Seed only when the store has no users yet. Returns whether it seeded.
pub fn ensure_seeded(db: &Database) -> Result<bool> {
    let users: Vec<User> = db.load(Collection::Users)?;
    if !users.is_empty() {
        return Ok(false);
    }
    seed_demo_data(db, Local::now().date_naive())?;
    Ok(true)
}
