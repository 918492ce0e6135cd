//! Report aggregation over full history.
//!
//! Each report rescans the collections it is handed; nothing is indexed.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::inventory::low_stock;
use crate::models::{DateRange, Expense, MenuItem, Purchase, RawMaterial, Transaction};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub menu_id: String,
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub range: DateRange,
    pub total_sales: f64,
    pub total_transactions: usize,
    pub product_sales: Vec<ProductSales>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    pub range: DateRange,
    pub revenue: f64,
    pub purchase_costs: f64,
    pub operational_expenses: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of revenue; 0 when there is no revenue.
    pub profit_margin: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_sales: f64,
    pub total_transactions: usize,
    pub best_selling: Option<MenuItem>,
    pub low_stock_items: Vec<RawMaterial>,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub monthly_profit: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub daily_average: f64,
    pub by_category: Vec<CategoryTotal>,
    pub top_category: Option<String>,
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

pub fn transactions_in(transactions: &[Transaction], range: DateRange) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.date))
        .cloned()
        .collect()
}

/// Per-product quantity and revenue, highest quantity first. Products keep
/// the name from their first snapshot; ties stay in first-seen order.
pub fn product_sales<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for t in transactions {
        for item in &t.items {
            match index.get(&item.menu_id) {
                Some(&i) => {
                    rows[i].quantity += u64::from(item.quantity);
                    rows[i].revenue += item.subtotal;
                }
                None => {
                    index.insert(item.menu_id.clone(), rows.len());
                    rows.push(ProductSales {
                        menu_id: item.menu_id.clone(),
                        name: item.menu_name.clone(),
                        quantity: u64::from(item.quantity),
                        revenue: item.subtotal,
                    });
                }
            }
        }
    }

    // stable sort keeps first-seen order among equal quantities
    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    rows
}

pub fn sales_report(transactions: &[Transaction], range: DateRange) -> SalesReport {
    let filtered = transactions_in(transactions, range);
    let total_sales = filtered.iter().map(|t| t.total).sum();
    let product_sales = product_sales(&filtered);

    SalesReport {
        range,
        total_sales,
        total_transactions: filtered.len(),
        product_sales,
        transactions: filtered,
    }
}

pub fn cash_flow_report(
    transactions: &[Transaction],
    purchases: &[Purchase],
    expenses: &[Expense],
    range: DateRange,
) -> CashFlowReport {
    let revenue: f64 = transactions
        .iter()
        .filter(|t| range.contains(t.date))
        .map(|t| t.total)
        .sum();
    let purchase_costs: f64 = purchases
        .iter()
        .filter(|p| range.contains(p.date))
        .map(|p| p.total)
        .sum();
    let operational_expenses: f64 = expenses
        .iter()
        .filter(|e| range.contains(e.date))
        .map(|e| e.amount)
        .sum();

    let total_expenses = purchase_costs + operational_expenses;
    let net_profit = revenue - total_expenses;
    let profit_margin = if revenue > 0.0 {
        net_profit / revenue * 100.0
    } else {
        0.0
    };

    CashFlowReport {
        range,
        revenue,
        purchase_costs,
        operational_expenses,
        total_expenses,
        net_profit,
        profit_margin,
    }
}

/// Menu item with the most units sold across all history.
///
/// Lines for items no longer in the catalog are ignored. A later item only
/// takes the lead with a strictly greater count.
pub fn best_seller(transactions: &[Transaction], menu_items: &[MenuItem]) -> Option<MenuItem> {
    let mut counts: Vec<(&MenuItem, u64)> = Vec::new();

    for t in transactions {
        for item in &t.items {
            if let Some(entry) = counts.iter_mut().find(|(m, _)| m.id == item.menu_id) {
                entry.1 += u64::from(item.quantity);
            } else if let Some(menu) = menu_items.iter().find(|m| m.id == item.menu_id) {
                counts.push((menu, u64::from(item.quantity)));
            }
        }
    }

    let mut best: Option<(&MenuItem, u64)> = None;
    for (menu, count) in counts {
        if count > best.map(|(_, c)| c).unwrap_or(0) {
            best = Some((menu, count));
        }
    }
    best.map(|(menu, _)| menu.clone())
}

pub fn dashboard(
    today: NaiveDate,
    transactions: &[Transaction],
    materials: &[RawMaterial],
    menu_items: &[MenuItem],
    purchases: &[Purchase],
    expenses: &[Expense],
) -> DashboardStats {
    let todays: Vec<&Transaction> = transactions.iter().filter(|t| t.date == today).collect();
    let today_sales = todays.iter().map(|t| t.total).sum();

    let monthly_revenue: f64 = transactions
        .iter()
        .filter(|t| same_month(t.date, today))
        .map(|t| t.total)
        .sum();
    let monthly_purchases: f64 = purchases
        .iter()
        .filter(|p| same_month(p.date, today))
        .map(|p| p.total)
        .sum();
    let monthly_operational: f64 = expenses
        .iter()
        .filter(|e| same_month(e.date, today))
        .map(|e| e.amount)
        .sum();
    let monthly_expenses = monthly_purchases + monthly_operational;

    DashboardStats {
        today_sales,
        total_transactions: todays.len(),
        best_selling: best_seller(transactions, menu_items),
        low_stock_items: low_stock(materials),
        monthly_revenue,
        monthly_expenses,
        monthly_profit: monthly_revenue - monthly_expenses,
    }
}

/// Operational expenses for the month of `reference`. The daily average
/// divides by the day-of-month of `reference`, i.e. days elapsed so far.
pub fn expense_summary(expenses: &[Expense], reference: NaiveDate) -> ExpenseSummary {
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut total = 0.0;

    for e in expenses.iter().filter(|e| same_month(e.date, reference)) {
        total += e.amount;
        match by_category.iter_mut().find(|c| c.category == e.category) {
            Some(c) => c.amount += e.amount,
            None => by_category.push(CategoryTotal {
                category: e.category.clone(),
                amount: e.amount,
            }),
        }
    }

    let mut top: Option<&CategoryTotal> = None;
    for c in &by_category {
        // a later category wins a tie
        if top.map_or(true, |t| c.amount >= t.amount) {
            top = Some(c);
        }
    }
    let top_category = top.map(|c| c.category.clone());

    ExpenseSummary {
        year: reference.year(),
        month: reference.month(),
        total,
        daily_average: total / f64::from(reference.day()),
        by_category,
        top_category,
    }
}
