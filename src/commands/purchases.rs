use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::inventory;
use crate::models::{Purchase, PurchaseInput, RawMaterial};

use super::new_id;

pub fn get_purchases(db: &Database) -> Result<Vec<Purchase>> {
    db.load(Collection::Purchases)
}

pub fn record_purchase(db: &Database, input: PurchaseInput) -> Result<Purchase> {
    record_purchase_on(db, input, Local::now().date_naive())
}

/// Record a stock purchase and add its quantity to the material.
pub fn record_purchase_on(
    db: &Database,
    input: PurchaseInput,
    date: NaiveDate,
) -> Result<Purchase> {
    if input.material_id.trim().is_empty() || input.quantity.is_nan() || input.quantity <= 0.0 {
        return Err(PosError::validation("Choose a material and enter a valid quantity"));
    }
    if input.price.is_nan() || input.price < 0.0 {
        return Err(PosError::validation("Price cannot be negative"));
    }

    let purchase = db.update(Collection::RawMaterials, |materials: &mut Vec<RawMaterial>| {
        let material = materials
            .iter_mut()
            .find(|m| m.id == input.material_id)
            .ok_or_else(|| PosError::not_found("Material", input.material_id.as_str()))?;

        let price = if input.price > 0.0 { input.price } else { material.price };
        let supplier = if input.supplier.trim().is_empty() {
            material.supplier.clone()
        } else {
            input.supplier.trim().to_string()
        };

        inventory::restock(material, input.quantity);

        Ok(Purchase {
            id: new_id(),
            date,
            material_id: material.id.clone(),
            material_name: material.name.clone(),
            quantity: input.quantity,
            price,
            total: input.quantity * price,
            supplier,
        })
    })?;

    db.update(Collection::Purchases, |purchases: &mut Vec<Purchase>| {
        purchases.push(purchase.clone());
        Ok(())
    })?;

    info!(
        material = %purchase.material_name,
        quantity = purchase.quantity,
        total = purchase.total,
        "purchase recorded"
    );
    Ok(purchase)
}
