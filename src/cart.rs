//! The cashier's in-progress sale.

use serde::{Deserialize, Serialize};

use crate::discount::Discount;
use crate::models::{MenuItem, PaymentMethod, TransactionItem};

/// Upper bound for the quantity of a single cart line.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<TransactionItem>,
    pub discount: Option<Discount>,
    pub payment_method: PaymentMethod,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `menu`, merging with an existing line.
    pub fn add_item(&mut self, menu: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_id == menu.id) {
            line.quantity = line.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
            line.subtotal = f64::from(line.quantity) * line.price;
            return;
        }

        self.lines.push(TransactionItem {
            menu_id: menu.id.clone(),
            menu_name: menu.name.clone(),
            quantity: 1,
            price: menu.price,
            subtotal: menu.price,
        });
    }

    /// Set a line's quantity; zero or less removes the line, anything above
    /// `MAX_LINE_QUANTITY` is capped.
    pub fn set_quantity(&mut self, menu_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(menu_id);
            return;
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_LINE_QUANTITY);
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_id == menu_id) {
            line.quantity = quantity;
            line.subtotal = f64::from(quantity) * line.price;
        }
    }

    pub fn remove_item(&mut self, menu_id: &str) {
        self.lines.retain(|l| l.menu_id != menu_id);
    }

    /// Recompute every line subtotal from its quantity and unit price.
    pub fn recalculate(&mut self) {
        for line in &mut self.lines {
            line.subtotal = f64::from(line.quantity) * line.price;
        }
    }

    pub fn apply_discount(&mut self, discount: Discount) {
        self.discount = Some(discount);
    }

    pub fn clear_discount(&mut self) {
        self.discount = None;
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    pub fn discount_amount(&self) -> f64 {
        self.discount
            .as_ref()
            .map(|d| d.amount(self.subtotal()))
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.subtotal() - self.discount_amount()
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }
}
