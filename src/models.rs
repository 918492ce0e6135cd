use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub stock: f64,
    pub min_stock: f64,
    pub price: f64,
    pub supplier: String,
}

impl RawMaterial {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    pub name: String,
    pub unit: String,
    pub stock: f64,
    pub min_stock: f64,
    pub price: f64,
    pub supplier: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLine {
    pub material_id: String,
    pub quantity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: Vec<RecipeLine>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: Vec<RecipeLine>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    DebitCard,
    CreditCard,
    Transfer,
    EWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::DebitCard,
        PaymentMethod::CreditCard,
        PaymentMethod::Transfer,
        PaymentMethod::EWallet,
    ];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::EWallet => "E-Wallet",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub menu_id: String,
    pub menu_name: String,
    pub quantity: u32,
    pub price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub items: Vec<TransactionItem>,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub cashier_name: String,
    // Older records carry only `total`.
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub date: NaiveDate,
    pub material_id: String,
    pub material_name: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
    pub supplier: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    pub material_id: String,
    pub quantity: f64,
    /// Unit price; 0 falls back to the material's list price.
    #[serde(default)]
    pub price: f64,
    /// Blank falls back to the material's supplier.
    #[serde(default)]
    pub supplier: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[serde(default)]
    pub category: Option<String>,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    pub low_stock_alert: bool,
    pub daily_report: bool,
    pub sales_alert: bool,
    pub system_updates: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub store_info: StoreInfo,
    pub notifications: NotificationPrefs,
    pub currency: String,
    pub language: String,
    /// Percent, 0-100. Stored for display; checkout totals do not include it.
    pub tax_rate: f64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_info: StoreInfo {
                name: "Bakery & Cake Shop".to_string(),
                address: "Jl. Contoh No. 123, Jakarta".to_string(),
                phone: "(021) 1234-5678".to_string(),
                email: "kontak@tokoku.com".to_string(),
            },
            notifications: NotificationPrefs {
                low_stock_alert: true,
                daily_report: true,
                sales_alert: false,
                system_updates: true,
            },
            currency: "IDR".to_string(),
            language: "id".to_string(),
            tax_rate: 0.0,
        }
    }
}

/// Full backup document written by the export feature.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub raw_materials: Vec<RawMaterial>,
    pub menu_items: Vec<MenuItem>,
    pub transactions: Vec<Transaction>,
    pub purchases: Vec<Purchase>,
    pub expenses: Vec<Expense>,
    pub export_date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
