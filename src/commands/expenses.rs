use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::models::{Expense, ExpenseInput};
use crate::reports::{self, ExpenseSummary};

use super::new_id;

pub const DEFAULT_CATEGORY: &str = "Operational";

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Operational",
    "Rent",
    "Electricity & Water",
    "Internet & Phone",
    "Salaries",
    "Transport & Delivery",
    "Marketing",
    "Equipment Maintenance",
    "Insurance",
    "Tax",
    "Other",
];

pub fn get_expenses(db: &Database) -> Result<Vec<Expense>> {
    db.load(Collection::Expenses)
}

pub fn record_expense(db: &Database, input: ExpenseInput) -> Result<Expense> {
    record_expense_on(db, input, Local::now().date_naive())
}

pub fn record_expense_on(db: &Database, input: ExpenseInput, date: NaiveDate) -> Result<Expense> {
    if input.description.trim().is_empty() || input.amount.is_nan() || input.amount <= 0.0 {
        return Err(PosError::validation("Description and an amount above zero are required"));
    }

    let category = match input.category.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_CATEGORY.to_string(),
        Some(c) if EXPENSE_CATEGORIES.contains(&c) => c.to_string(),
        Some(c) => return Err(PosError::validation(format!("Unknown expense category: {c}"))),
    };

    let expense = Expense {
        id: new_id(),
        date,
        category,
        description: input.description.trim().to_string(),
        amount: input.amount,
    };

    db.update(Collection::Expenses, |expenses: &mut Vec<Expense>| {
        expenses.push(expense.clone());
        Ok(())
    })?;

    info!(category = %expense.category, amount = expense.amount, "expense recorded");
    Ok(expense)
}

pub fn delete_expense(db: &Database, id: &str) -> Result<()> {
    db.update(Collection::Expenses, |expenses: &mut Vec<Expense>| {
        let before = expenses.len();
        expenses.retain(|e| e.id != id);
        if expenses.len() == before {
            return Err(PosError::not_found("Expense", id));
        }
        Ok(())
    })?;

    info!(id, "expense deleted");
    Ok(())
}

pub fn get_expense_summary(db: &Database, reference: Option<NaiveDate>) -> Result<ExpenseSummary> {
    let reference = reference.unwrap_or_else(|| Local::now().date_naive());
    Ok(reports::expense_summary(&get_expenses(db)?, reference))
}
