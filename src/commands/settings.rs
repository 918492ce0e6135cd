use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::{Collection, Database, SETTINGS_KEY};
use crate::error::{PosError, Result};
use crate::models::{ExportBundle, StoreSettings};
use crate::seed;

pub fn get_settings(db: &Database) -> Result<StoreSettings> {
    Ok(db.get_value(SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_settings(db: &Database, settings: StoreSettings) -> Result<StoreSettings> {
    if settings.tax_rate.is_nan() || !(0.0..=100.0).contains(&settings.tax_rate) {
        return Err(PosError::validation("Tax rate must be between 0 and 100"));
    }
    if settings.store_info.name.trim().is_empty() {
        return Err(PosError::validation("Store name is required"));
    }

    db.set_value(SETTINGS_KEY, &settings)?;
    info!("settings saved");
    Ok(settings)
}

pub fn export_data(db: &Database) -> Result<ExportBundle> {
    Ok(ExportBundle {
        raw_materials: db.load(Collection::RawMaterials)?,
        menu_items: db.load(Collection::MenuItems)?,
        transactions: db.load(Collection::Transactions)?,
        purchases: db.load(Collection::Purchases)?,
        expenses: db.load(Collection::Expenses)?,
        export_date: Local::now().to_rfc3339(),
    })
}

pub fn export_json(db: &Database) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_data(db)?)?)
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("backup-pos-{}.json", date.format("%Y-%m-%d"))
}

/// Write a backup into `dir` and return the file path.
pub fn write_backup(db: &Database, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(Local::now().date_naive()));
    fs::write(&path, export_json(db)?)?;
    info!(path = %path.display(), "backup written");
    Ok(path)
}

/// Replace the business collections with the contents of a backup. Users,
/// session and settings are left untouched.
pub fn import_data(db: &Database, bundle: &ExportBundle) -> Result<()> {
    db.save(Collection::RawMaterials, &bundle.raw_materials)?;
    db.save(Collection::MenuItems, &bundle.menu_items)?;
    db.save(Collection::Transactions, &bundle.transactions)?;
    db.save(Collection::Purchases, &bundle.purchases)?;
    db.save(Collection::Expenses, &bundle.expenses)?;

    info!(
        materials = bundle.raw_materials.len(),
        menu_items = bundle.menu_items.len(),
        transactions = bundle.transactions.len(),
        exported = %bundle.export_date,
        "backup restored"
    );
    Ok(())
}

pub fn import_backup(db: &Database, path: &Path) -> Result<ExportBundle> {
    let raw = fs::read_to_string(path)?;
    let bundle: ExportBundle = serde_json::from_str(&raw)?;
    import_data(db, &bundle)?;
    Ok(bundle)
}

pub fn clear_all_data(db: &Database) -> Result<()> {
    db.clear_namespace()?;
    Ok(())
}

pub fn reset_to_demo(db: &Database) -> Result<()> {
    db.clear_namespace()?;
    seed::seed_demo_data(db, Local::now().date_naive())?;
    info!("store reset to demo data");
    Ok(())
}
