use chrono::{Local, NaiveDate};

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::models::{DateRange, Expense, MenuItem, Purchase, RawMaterial, Transaction};
use crate::reports::{self, CashFlowReport, DashboardStats, SalesReport};

fn range_or_today(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange> {
    let today = Local::now().date_naive();
    let range = DateRange::new(start.unwrap_or(today), end.unwrap_or(today));
    if range.start > range.end {
        return Err(PosError::validation("Start date is after end date"));
    }
    Ok(range)
}

pub fn get_dashboard(db: &Database) -> Result<DashboardStats> {
    get_dashboard_on(db, Local::now().date_naive())
}

pub fn get_dashboard_on(db: &Database, today: NaiveDate) -> Result<DashboardStats> {
    Ok(reports::dashboard(
        today,
        &db.load::<Transaction>(Collection::Transactions)?,
        &db.load::<RawMaterial>(Collection::RawMaterials)?,
        &db.load::<MenuItem>(Collection::MenuItems)?,
        &db.load::<Purchase>(Collection::Purchases)?,
        &db.load::<Expense>(Collection::Expenses)?,
    ))
}

/// Sales between `start` and `end` inclusive; each defaults to today.
pub fn get_sales_report(
    db: &Database,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<SalesReport> {
    let range = range_or_today(start, end)?;
    Ok(reports::sales_report(&db.load::<Transaction>(Collection::Transactions)?, range))
}

pub fn get_cash_flow_report(
    db: &Database,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<CashFlowReport> {
    let range = range_or_today(start, end)?;
    Ok(reports::cash_flow_report(
        &db.load::<Transaction>(Collection::Transactions)?,
        &db.load::<Purchase>(Collection::Purchases)?,
        &db.load::<Expense>(Collection::Expenses)?,
        range,
    ))
}
