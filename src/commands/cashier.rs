use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cart::{Cart, MAX_LINE_QUANTITY};
use crate::db::{Collection, Database};
use crate::discount::{Discount, DiscountKind};
use crate::error::{PosError, Result};
use crate::inventory::{self, DeductionReport};
use crate::models::{MenuItem, PaymentMethod, RawMaterial, Transaction};
use crate::receipt;

use super::{auth, menu, new_id, settings};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SaleResult {
    pub transaction: Transaction,
    pub deduction: DeductionReport,
    pub receipt: String,
}

/// Add one unit of an active menu item to `cart`.
pub fn add_to_cart(db: &Database, mut cart: Cart, menu_id: &str) -> Result<Cart> {
    let item = menu::get_menu_item(db, menu_id)?;
    if !item.is_active {
        return Err(PosError::validation(format!("{} is not on sale", item.name)));
    }
    cart.add_item(&item);
    Ok(cart)
}

pub fn apply_discount(
    mut cart: Cart,
    kind: DiscountKind,
    value: f64,
    reason: &str,
) -> Result<Cart> {
    let discount = Discount::custom(kind, value, reason, cart.subtotal())?;
    cart.apply_discount(discount);
    Ok(cart)
}

pub fn clear_discount(mut cart: Cart) -> Cart {
    cart.clear_discount();
    cart
}

pub fn payment_methods() -> Vec<PaymentMethod> {
    PaymentMethod::ALL.to_vec()
}

pub fn checkout(db: &Database, cart: Cart) -> Result<SaleResult> {
    checkout_at(db, cart, Local::now())
}

/// Record the sale, deduct recipe stock for every line and return the
/// stored transaction with its receipt.
pub fn checkout_at(db: &Database, mut cart: Cart, now: DateTime<Local>) -> Result<SaleResult> {
    if cart.is_empty() {
        return Err(PosError::EmptyCart);
    }
    if let Some(line) = cart
        .lines
        .iter()
        .find(|l| l.quantity == 0 || l.quantity > MAX_LINE_QUANTITY)
    {
        return Err(PosError::validation(format!(
            "Quantity for {} must be between 1 and {MAX_LINE_QUANTITY}",
            line.menu_name
        )));
    }
    if cart.lines.iter().any(|l| !l.price.is_finite() || l.price < 0.0) {
        return Err(PosError::validation("Line prices must be valid amounts"));
    }
    cart.recalculate();
    let cashier = auth::require_user(db)?;

    let subtotal = cart.subtotal();
    let discount_amount = cart.discount_amount();
    let transaction = Transaction {
        id: new_id(),
        date: now.date_naive(),
        total: subtotal - discount_amount,
        payment_method: cart.payment_method,
        cashier_name: cashier.name,
        subtotal,
        discount_amount,
        discount_reason: cart.discount.map(|d| d.reason),
        created_at: Some(now.to_rfc3339()),
        items: cart.lines,
    };

    let menu_items: Vec<MenuItem> = db.load(Collection::MenuItems)?;
    let deduction = db.update(Collection::RawMaterials, |materials: &mut Vec<RawMaterial>| {
        Ok(inventory::deduct_for_lines(materials, &menu_items, &transaction.items))
    })?;
    if !deduction.is_complete() {
        warn!(
            transaction_id = %transaction.id,
            skipped_items = deduction.skipped_items.len(),
            skipped_ingredients = deduction.skipped_ingredients.len(),
            "sale recorded with partial stock deduction"
        );
    }

    db.update(Collection::Transactions, |transactions: &mut Vec<Transaction>| {
        transactions.push(transaction.clone());
        Ok(())
    })?;

    info!(
        transaction_id = %transaction.id,
        total = transaction.total,
        lines = transaction.items.len(),
        payment = %transaction.payment_method,
        "sale recorded"
    );

    let store = settings::get_settings(db)?.store_info;
    let receipt = receipt::render(&transaction, &store);

    Ok(SaleResult {
        transaction,
        deduction,
        receipt,
    })
}

pub fn get_transactions(db: &Database) -> Result<Vec<Transaction>> {
    db.load(Collection::Transactions)
}

pub fn get_receipt(db: &Database, transaction_id: &str) -> Result<String> {
    let transaction = get_transactions(db)?
        .into_iter()
        .find(|t| t.id == transaction_id)
        .ok_or_else(|| PosError::not_found("Transaction", transaction_id))?;
    let store = settings::get_settings(db)?.store_info;
    Ok(receipt::render(&transaction, &store))
}
