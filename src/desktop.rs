//! Tauri desktop shell: IPC command handlers and the app builder.

use chrono::NaiveDate;
use std::path::PathBuf;
use tauri::{
    menu::{Menu, MenuItem as TrayMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use tracing::info;

use crate::cart::Cart;
use crate::commands::{
    auth, cashier, expenses, materials, menu, notifications, purchases, reports, settings,
};
use crate::config::AppConfig;
use crate::db::DatabaseExt;
use crate::discount::{self, Discount, DiscountKind};
use crate::inventory::MenuCosting;
use crate::models::{
    Expense, ExpenseInput, ExportBundle, MaterialInput, MenuItem, MenuItemInput, PaymentMethod,
    Purchase, PurchaseInput, RawMaterial, StoreSettings, Transaction, User,
};
use crate::notifications::NotificationFeed;
use crate::reports::{CashFlowReport, DashboardStats, ExpenseSummary, SalesReport};

// Auth

#[tauri::command]
fn login(app: AppHandle, email: String, password: String) -> Result<Option<User>, String> {
    auth::login(app.db(), &email, &password).map_err(|e| e.to_string())
}

#[tauri::command]
fn logout(app: AppHandle) -> Result<(), String> {
    auth::logout(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_current_user(app: AppHandle) -> Result<Option<User>, String> {
    auth::current_user(app.db()).map_err(|e| e.to_string())
}

// Raw materials

#[tauri::command]
fn get_materials(app: AppHandle) -> Result<Vec<RawMaterial>, String> {
    materials::get_materials(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn create_material(app: AppHandle, material: MaterialInput) -> Result<RawMaterial, String> {
    materials::create_material(app.db(), material).map_err(|e| e.to_string())
}

#[tauri::command]
fn update_material(
    app: AppHandle,
    id: String,
    material: MaterialInput,
) -> Result<RawMaterial, String> {
    materials::update_material(app.db(), &id, material).map_err(|e| e.to_string())
}

#[tauri::command]
fn delete_material(app: AppHandle, id: String) -> Result<(), String> {
    materials::delete_material(app.db(), &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_low_stock(app: AppHandle) -> Result<Vec<RawMaterial>, String> {
    materials::get_low_stock(app.db()).map_err(|e| e.to_string())
}

// Menu

#[tauri::command]
fn get_menu_items(app: AppHandle) -> Result<Vec<MenuItem>, String> {
    menu::get_menu_items(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_active_menu_items(app: AppHandle) -> Result<Vec<MenuItem>, String> {
    menu::get_active_menu_items(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn create_menu_item(app: AppHandle, item: MenuItemInput) -> Result<MenuItem, String> {
    menu::create_menu_item(app.db(), item).map_err(|e| e.to_string())
}

#[tauri::command]
fn update_menu_item(app: AppHandle, id: String, item: MenuItemInput) -> Result<MenuItem, String> {
    menu::update_menu_item(app.db(), &id, item).map_err(|e| e.to_string())
}

#[tauri::command]
fn delete_menu_item(app: AppHandle, id: String) -> Result<(), String> {
    menu::delete_menu_item(app.db(), &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn toggle_menu_item(app: AppHandle, id: String) -> Result<MenuItem, String> {
    menu::toggle_menu_item(app.db(), &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn search_menu(app: AppHandle, term: String) -> Result<Vec<MenuItem>, String> {
    menu::search_menu(app.db(), &term).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_menu_costing(app: AppHandle) -> Result<Vec<MenuCosting>, String> {
    menu::get_menu_costing(app.db()).map_err(|e| e.to_string())
}

// Cashier

#[tauri::command]
fn add_to_cart(app: AppHandle, cart: Cart, menu_id: String) -> Result<Cart, String> {
    cashier::add_to_cart(app.db(), cart, &menu_id).map_err(|e| e.to_string())
}

#[tauri::command]
fn set_cart_quantity(mut cart: Cart, menu_id: String, quantity: i64) -> Cart {
    cart.set_quantity(&menu_id, quantity);
    cart
}

#[tauri::command]
fn apply_discount(
    cart: Cart,
    kind: DiscountKind,
    value: f64,
    reason: String,
) -> Result<Cart, String> {
    cashier::apply_discount(cart, kind, value, &reason).map_err(|e| e.to_string())
}

#[tauri::command]
fn clear_cart_discount(cart: Cart) -> Cart {
    cashier::clear_discount(cart)
}

#[tauri::command]
fn get_payment_methods() -> Vec<PaymentMethod> {
    cashier::payment_methods()
}

#[tauri::command]
fn get_discount_presets() -> Vec<Discount> {
    discount::presets()
}

#[tauri::command]
fn checkout(app: AppHandle, cart: Cart) -> Result<cashier::SaleResult, String> {
    cashier::checkout(app.db(), cart).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_transactions(app: AppHandle) -> Result<Vec<Transaction>, String> {
    cashier::get_transactions(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_receipt(app: AppHandle, transaction_id: String) -> Result<String, String> {
    cashier::get_receipt(app.db(), &transaction_id).map_err(|e| e.to_string())
}

// Purchases & expenses

#[tauri::command]
fn get_purchases(app: AppHandle) -> Result<Vec<Purchase>, String> {
    purchases::get_purchases(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn record_purchase(app: AppHandle, purchase: PurchaseInput) -> Result<Purchase, String> {
    purchases::record_purchase(app.db(), purchase).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_expenses(app: AppHandle) -> Result<Vec<Expense>, String> {
    expenses::get_expenses(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn record_expense(app: AppHandle, expense: ExpenseInput) -> Result<Expense, String> {
    expenses::record_expense(app.db(), expense).map_err(|e| e.to_string())
}

#[tauri::command]
fn delete_expense(app: AppHandle, id: String) -> Result<(), String> {
    expenses::delete_expense(app.db(), &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_expense_categories() -> Vec<String> {
    expenses::EXPENSE_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[tauri::command]
fn get_expense_summary(
    app: AppHandle,
    month_of: Option<NaiveDate>,
) -> Result<ExpenseSummary, String> {
    expenses::get_expense_summary(app.db(), month_of).map_err(|e| e.to_string())
}

// Reports

#[tauri::command]
fn get_dashboard(app: AppHandle) -> Result<DashboardStats, String> {
    reports::get_dashboard(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_sales_report(
    app: AppHandle,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<SalesReport, String> {
    reports::get_sales_report(app.db(), start, end).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_cash_flow_report(
    app: AppHandle,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<CashFlowReport, String> {
    reports::get_cash_flow_report(app.db(), start, end).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_notifications(app: AppHandle) -> Result<NotificationFeed, String> {
    notifications::get_notifications(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_unread_count(app: AppHandle) -> Result<usize, String> {
    notifications::get_unread_count(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn mark_notification_read(feed: NotificationFeed, id: String) -> Result<NotificationFeed, String> {
    notifications::mark_notification_read(feed, &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn mark_all_notifications_read(feed: NotificationFeed) -> NotificationFeed {
    notifications::mark_all_notifications_read(feed)
}

#[tauri::command]
fn delete_notification(feed: NotificationFeed, id: String) -> Result<NotificationFeed, String> {
    notifications::delete_notification(feed, &id).map_err(|e| e.to_string())
}

// Settings & backup

#[tauri::command]
fn get_settings(app: AppHandle) -> Result<StoreSettings, String> {
    settings::get_settings(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn save_settings(app: AppHandle, settings: StoreSettings) -> Result<StoreSettings, String> {
    self::settings::save_settings(app.db(), settings).map_err(|e| e.to_string())
}

#[tauri::command]
fn export_data(app: AppHandle) -> Result<ExportBundle, String> {
    settings::export_data(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn write_backup(app: AppHandle, dir: PathBuf) -> Result<PathBuf, String> {
    settings::write_backup(app.db(), &dir).map_err(|e| e.to_string())
}

#[tauri::command]
fn import_backup(app: AppHandle, path: PathBuf) -> Result<ExportBundle, String> {
    settings::import_backup(app.db(), &path).map_err(|e| e.to_string())
}

#[tauri::command]
fn clear_all_data(app: AppHandle) -> Result<(), String> {
    settings::clear_all_data(app.db()).map_err(|e| e.to_string())
}

#[tauri::command]
fn reset_to_demo(app: AppHandle) -> Result<(), String> {
    settings::reset_to_demo(app.db()).map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .setup(|app| {
            let app_dir = app.path().app_data_dir()?;
            let config = AppConfig::load_with_data_dir(&app_dir)?;

            let guard = crate::init_logging(&config)?;
            // The app runs until process exit; keep the log writer alive.
            std::mem::forget(guard);
            info!("Starting Kasir POS v{}", env!("CARGO_PKG_VERSION"));

            let db = crate::open_store(&config)?;
            app.manage(db);

            let quit = TrayMenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
            let tray_menu = Menu::with_items(app, &[&quit])?;

            let mut tray = TrayIconBuilder::new()
                .menu(&tray_menu)
                .show_menu_on_left_click(false)
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        let app = tray.app_handle();
                        if let Some(window) = app.get_webview_window("main") {
                            if window.is_visible().unwrap_or(false) {
                                let _ = window.hide();
                            } else {
                                let _ = window.show();
                                let _ = window.set_focus();
                            }
                        }
                    }
                })
                .on_menu_event(|app, event| {
                    if event.id == "quit" {
                        app.exit(0);
                    }
                });
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            tray.build(app)?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Auth
            login,
            logout,
            get_current_user,
            // Raw materials
            get_materials,
            create_material,
            update_material,
            delete_material,
            get_low_stock,
            // Menu
            get_menu_items,
            get_active_menu_items,
            create_menu_item,
            update_menu_item,
            delete_menu_item,
            toggle_menu_item,
            search_menu,
            get_menu_costing,
            // Cashier
            add_to_cart,
            set_cart_quantity,
            apply_discount,
            clear_cart_discount,
            get_payment_methods,
            get_discount_presets,
            checkout,
            get_transactions,
            get_receipt,
            // Purchases & expenses
            get_purchases,
            record_purchase,
            get_expenses,
            record_expense,
            delete_expense,
            get_expense_categories,
            get_expense_summary,
            // Reports
            get_dashboard,
            get_sales_report,
            get_cash_flow_report,
            get_notifications,
            get_unread_count,
            mark_notification_read,
            mark_all_notifications_read,
            delete_notification,
            // Settings & backup
            get_settings,
            save_settings,
            export_data,
            write_backup,
            import_backup,
            clear_all_data,
            reset_to_demo,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
