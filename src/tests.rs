//! Integration tests for the command layer
//! These tests run against an in-memory SQLite store seeded with demo data

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, NaiveDate, TimeZone};

    use crate::cart::{Cart, MAX_LINE_QUANTITY};
    use crate::commands::{
        auth, cashier, expenses, materials, menu, notifications, purchases, reports, settings,
    };
    use crate::config::AppConfig;
    use crate::db::{Collection, Database};
    use crate::discount::DiscountKind;
    use crate::error::PosError;
    use crate::models::{
        ExpenseInput, MaterialInput, MenuItemInput, PaymentMethod, PurchaseInput, RawMaterial,
        RecipeLine, StoreSettings, Transaction,
    };
    use crate::seed::{self, DEMO_EMAIL, DEMO_PASSWORD};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 17).unwrap()
    }

    fn at(hour: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 8, 17, hour, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    /// Create a seeded store with the demo admin logged in
    fn setup_test_db() -> Database {
        let db = Database::open_in_memory("pos").expect("Failed to create in-memory store");
        db.initialize().expect("Failed to create schema");
        seed::seed_demo_data(&db, today()).expect("Failed to seed");
        auth::login(&db, DEMO_EMAIL, DEMO_PASSWORD)
            .expect("login query")
            .expect("demo user exists");
        db
    }

    fn stock_of(db: &Database, id: &str) -> f64 {
        materials::get_material(db, id).unwrap().stock
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn cart_with(db: &Database, menu_id: &str, quantity: i64) -> Cart {
        let mut cart = cashier::add_to_cart(db, Cart::new(), menu_id).unwrap();
        cart.set_quantity(menu_id, quantity);
        cart
    }

    // ========== CASHIER TESTS ==========

    #[test]
    fn test_checkout_deducts_recipe_stock() {
        let db = setup_test_db();
        let cart = cart_with(&db, "1", 3);

        let sale = cashier::checkout_at(&db, cart, at(10)).unwrap();

        assert_eq!(sale.transaction.total, 75000.0);
        assert_eq!(sale.transaction.cashier_name, "Admin Kasir");
        assert!(sale.deduction.is_complete());

        // Brownies: 0.2 flour, 0.15 sugar, 2 eggs, 0.1 butter per unit
        assert_close(stock_of(&db, "1"), 50.0 - 0.6);
        assert_close(stock_of(&db, "2"), 25.0 - 0.45);
        assert_close(stock_of(&db, "3"), 200.0 - 6.0);
        assert_close(stock_of(&db, "4"), 8.0 - 0.3);

        let history = cashier::get_transactions(&db).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].id, sale.transaction.id);
    }

    #[test]
    fn test_checkout_merges_lines_for_multiple_items() {
        let db = setup_test_db();
        let mut cart = Cart::new();
        for id in ["1", "2", "1"] {
            cart = cashier::add_to_cart(&db, cart, id).unwrap();
        }
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.item_count(), 3);

        let sale = cashier::checkout_at(&db, cart, at(11)).unwrap();
        assert_eq!(sale.transaction.total, 65000.0);

        // 2 Brownies (2 eggs each) + 1 Sweet Bun (1 egg)
        assert_close(sale.deduction.total_for("3"), 5.0);
        assert_close(stock_of(&db, "3"), 195.0);
    }

    #[test]
    fn test_checkout_with_discount() {
        let db = setup_test_db();
        let mut cart = cart_with(&db, "1", 2);
        cart.payment_method = PaymentMethod::EWallet;
        let cart = cashier::apply_discount(cart, DiscountKind::Percentage, 10.0, "Member").unwrap();

        let sale = cashier::checkout_at(&db, cart, at(12)).unwrap();
        let t = &sale.transaction;

        assert_eq!(t.subtotal, 50000.0);
        assert_eq!(t.discount_amount, 5000.0);
        assert_eq!(t.total, 45000.0);
        assert_eq!(t.discount_reason.as_deref(), Some("Member"));
        assert_eq!(t.payment_method, PaymentMethod::EWallet);
        assert!(sale.receipt.contains("Discount (Member)"));
        assert!(sale.receipt.contains("Rp 45.000"));
    }

    #[test]
    fn test_fixed_discount_is_capped_at_subtotal() {
        let db = setup_test_db();
        let cart = cart_with(&db, "2", 1);
        let cart = cashier::apply_discount(cart, DiscountKind::Fixed, 50000.0, "Promo").unwrap();

        let sale = cashier::checkout_at(&db, cart, at(12)).unwrap();
        assert_eq!(sale.transaction.discount_amount, 15000.0);
        assert_eq!(sale.transaction.total, 0.0);
    }

    #[test]
    fn test_discount_requires_reason() {
        let db = setup_test_db();
        let cart = cart_with(&db, "1", 1);
        let result = cashier::apply_discount(cart, DiscountKind::Percentage, 10.0, "  ");
        assert!(matches!(result, Err(PosError::Validation(_))));
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        let db = setup_test_db();
        let before = cashier::get_transactions(&db).unwrap().len();

        let result = cashier::checkout_at(&db, Cart::new(), at(9));
        assert!(matches!(result, Err(PosError::EmptyCart)));
        assert_eq!(cashier::get_transactions(&db).unwrap().len(), before);
    }

    #[test]
    fn test_checkout_requires_login() {
        let db = setup_test_db();
        let cart = cart_with(&db, "1", 1);
        auth::logout(&db).unwrap();

        let result = cashier::checkout_at(&db, cart, at(9));
        assert!(matches!(result, Err(PosError::NotAuthenticated)));
        assert_close(stock_of(&db, "1"), 50.0);
    }

    #[test]
    fn test_checkout_skips_deleted_material() {
        let db = setup_test_db();
        materials::delete_material(&db, "4").unwrap();

        let sale = cashier::checkout_at(&db, cart_with(&db, "1", 1), at(14)).unwrap();

        assert!(!sale.deduction.is_complete());
        assert_eq!(sale.deduction.skipped_ingredients.len(), 1);
        assert_eq!(sale.deduction.skipped_ingredients[0].material_id, "4");
        // Remaining ingredients still deducted
        assert_close(stock_of(&db, "1"), 49.8);
        assert_eq!(cashier::get_transactions(&db).unwrap().len(), 2);
    }

    #[test]
    fn test_stock_can_go_negative() {
        let db = setup_test_db();
        // Butter: 8 kg, 0.1 per brownie
        cashier::checkout_at(&db, cart_with(&db, "1", 100), at(15)).unwrap();
        assert_close(stock_of(&db, "4"), -2.0);
        assert!(materials::get_low_stock(&db)
            .unwrap()
            .iter()
            .any(|m| m.id == "4"));
    }

    #[test]
    fn test_oversized_quantity_is_capped_and_reports_still_load() {
        let db = setup_test_db();
        let mut cart = cart_with(&db, "1", 4_294_967_295);
        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);
        cart = cashier::add_to_cart(&db, cart, "1").unwrap();
        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);

        cashier::checkout_at(&db, cart, at(10)).unwrap();
        cashier::checkout_at(&db, cart_with(&db, "1", i64::MAX), at(11)).unwrap();

        let stats = reports::get_dashboard_on(&db, today()).unwrap();
        assert_eq!(stats.best_selling.unwrap().id, "1");
        let sales = reports::get_sales_report(&db, Some(today()), Some(today())).unwrap();
        assert_eq!(sales.product_sales[0].quantity, 2 * u64::from(MAX_LINE_QUANTITY) + 2);
    }

    #[test]
    fn test_checkout_rejects_out_of_range_line_quantity() {
        let db = setup_test_db();
        let mut cart = cart_with(&db, "1", 1);
        cart.lines[0].quantity = u32::MAX;

        let result = cashier::checkout_at(&db, cart.clone(), at(10));
        assert!(matches!(result, Err(PosError::Validation(_))));

        cart.lines[0].quantity = 0;
        let result = cashier::checkout_at(&db, cart, at(10));
        assert!(matches!(result, Err(PosError::Validation(_))));

        assert_eq!(cashier::get_transactions(&db).unwrap().len(), 1);
        assert_close(stock_of(&db, "1"), 50.0);
    }

    #[test]
    fn test_checkout_recomputes_line_subtotals() {
        let db = setup_test_db();
        let mut cart = cart_with(&db, "1", 2);
        cart.lines[0].subtotal = 1.0;

        let sale = cashier::checkout_at(&db, cart, at(10)).unwrap();
        assert_eq!(sale.transaction.items[0].subtotal, 50000.0);
        assert_eq!(sale.transaction.subtotal, 50000.0);
        assert_eq!(sale.transaction.total, 50000.0);
    }

    #[test]
    fn test_clear_discount_and_payment_methods() {
        let db = setup_test_db();
        let cart = cart_with(&db, "1", 1);
        let cart = cashier::apply_discount(cart, DiscountKind::Fixed, 5000.0, "Promo").unwrap();
        let cart = cashier::clear_discount(cart);
        assert!(cart.discount.is_none());
        assert_eq!(cart.total(), 25000.0);

        let methods = cashier::payment_methods();
        assert_eq!(methods.len(), 5);
        assert_eq!(methods[0], PaymentMethod::default());
        assert!(methods.contains(&PaymentMethod::EWallet));
    }

    #[test]
    fn test_inactive_item_cannot_be_added() {
        let db = setup_test_db();
        let item = menu::toggle_menu_item(&db, "2").unwrap();
        assert!(!item.is_active);

        let result = cashier::add_to_cart(&db, Cart::new(), "2");
        assert!(matches!(result, Err(PosError::Validation(_))));

        let missing = cashier::add_to_cart(&db, Cart::new(), "999");
        assert!(matches!(missing, Err(PosError::NotFound { .. })));
    }

    #[test]
    fn test_get_receipt_for_stored_sale() {
        let db = setup_test_db();
        let sale = cashier::checkout_at(&db, cart_with(&db, "2", 2), at(16)).unwrap();

        let receipt = cashier::get_receipt(&db, &sale.transaction.id).unwrap();
        assert_eq!(receipt, sale.receipt);
        assert!(receipt.contains("Sweet Bun"));

        assert!(matches!(
            cashier::get_receipt(&db, "nope"),
            Err(PosError::NotFound { .. })
        ));
    }

    // ========== PURCHASE TESTS ==========

    #[test]
    fn test_purchase_restocks_material() {
        let db = setup_test_db();
        let input = PurchaseInput {
            material_id: "1".to_string(),
            quantity: 10.0,
            price: 11000.0,
            supplier: "Pasar Induk".to_string(),
        };

        let purchase = purchases::record_purchase_on(&db, input, today()).unwrap();

        assert_eq!(purchase.material_name, "Wheat Flour");
        assert_eq!(purchase.total, 110000.0);
        assert_eq!(purchase.supplier, "Pasar Induk");
        assert_close(stock_of(&db, "1"), 60.0);
        assert_eq!(purchases::get_purchases(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_purchase_falls_back_to_material_price_and_supplier() {
        let db = setup_test_db();
        let input = PurchaseInput {
            material_id: "2".to_string(),
            quantity: 2.0,
            price: 0.0,
            supplier: String::new(),
        };

        let purchase = purchases::record_purchase_on(&db, input, today()).unwrap();
        assert_eq!(purchase.price, 15000.0);
        assert_eq!(purchase.total, 30000.0);
        assert_eq!(purchase.supplier, "Toko Manis Jaya");
    }

    #[test]
    fn test_purchase_validation() {
        let db = setup_test_db();
        let bad_quantity = PurchaseInput {
            material_id: "1".to_string(),
            quantity: 0.0,
            price: 0.0,
            supplier: String::new(),
        };
        assert!(matches!(
            purchases::record_purchase_on(&db, bad_quantity, today()),
            Err(PosError::Validation(_))
        ));

        let unknown = PurchaseInput {
            material_id: "42".to_string(),
            quantity: 1.0,
            price: 1000.0,
            supplier: String::new(),
        };
        assert!(matches!(
            purchases::record_purchase_on(&db, unknown, today()),
            Err(PosError::NotFound { .. })
        ));
        assert!(purchases::get_purchases(&db).unwrap().is_empty());
    }

    // ========== EXPENSE TESTS ==========

    #[test]
    fn test_expense_defaults_category() {
        let db = setup_test_db();
        let expense = expenses::record_expense_on(
            &db,
            ExpenseInput {
                category: None,
                description: "Gas refill".to_string(),
                amount: 25000.0,
            },
            today(),
        )
        .unwrap();

        assert_eq!(expense.category, expenses::DEFAULT_CATEGORY);
        assert_eq!(expenses::get_expenses(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_expense_validation() {
        let db = setup_test_db();
        let no_amount = ExpenseInput {
            category: Some("Rent".to_string()),
            description: "Shop".to_string(),
            amount: 0.0,
        };
        assert!(matches!(
            expenses::record_expense_on(&db, no_amount, today()),
            Err(PosError::Validation(_))
        ));

        let unknown_category = ExpenseInput {
            category: Some("Holiday".to_string()),
            description: "Trip".to_string(),
            amount: 1000.0,
        };
        assert!(matches!(
            expenses::record_expense_on(&db, unknown_category, today()),
            Err(PosError::Validation(_))
        ));
        assert!(expenses::get_expenses(&db).unwrap().is_empty());
    }

    #[test]
    fn test_delete_expense() {
        let db = setup_test_db();
        let expense = expenses::record_expense_on(
            &db,
            ExpenseInput {
                category: Some("Marketing".to_string()),
                description: "Flyers".to_string(),
                amount: 50000.0,
            },
            today(),
        )
        .unwrap();

        expenses::delete_expense(&db, &expense.id).unwrap();
        assert!(expenses::get_expenses(&db).unwrap().is_empty());
        assert!(matches!(
            expenses::delete_expense(&db, &expense.id),
            Err(PosError::NotFound { .. })
        ));
    }

    #[test]
    fn test_expense_summary_for_month() {
        let db = setup_test_db();
        let entries = [
            ("Rent", 1_000_000.0),
            ("Marketing", 200_000.0),
            ("Rent", 500_000.0),
        ];
        for (category, amount) in entries {
            expenses::record_expense_on(
                &db,
                ExpenseInput {
                    category: Some(category.to_string()),
                    description: "x".to_string(),
                    amount,
                },
                today(),
            )
            .unwrap();
        }

        let summary = expenses::get_expense_summary(&db, Some(today())).unwrap();
        assert_eq!(summary.total, 1_700_000.0);
        assert_close(summary.daily_average, 1_700_000.0 / 17.0);
        assert_eq!(summary.top_category.as_deref(), Some("Rent"));
    }

    // ========== AUTH TESTS ==========

    #[test]
    fn test_login_and_logout() {
        let db = setup_test_db();
        assert!(auth::current_user(&db).unwrap().is_some());

        auth::logout(&db).unwrap();
        assert!(auth::current_user(&db).unwrap().is_none());

        assert!(auth::login(&db, DEMO_EMAIL, "wrong").unwrap().is_none());
        assert!(auth::current_user(&db).unwrap().is_none());

        let user = auth::login(&db, DEMO_EMAIL, DEMO_PASSWORD).unwrap().unwrap();
        assert_eq!(user.role, "admin");
        assert_eq!(auth::require_user(&db).unwrap().email, DEMO_EMAIL);
    }

    // ========== MATERIAL & MENU TESTS ==========

    #[test]
    fn test_material_crud_and_low_stock() {
        let db = setup_test_db();
        let input = MaterialInput {
            name: "Cocoa Powder".to_string(),
            unit: "kg".to_string(),
            stock: 1.0,
            min_stock: 2.0,
            price: 80000.0,
            supplier: "Choco Co".to_string(),
        };
        let cocoa = materials::create_material(&db, input.clone()).unwrap();
        assert_eq!(materials::get_materials(&db).unwrap().len(), 5);

        let low = materials::get_low_stock(&db).unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, cocoa.id);

        let restocked = materials::update_material(
            &db,
            &cocoa.id,
            MaterialInput {
                stock: 5.0,
                ..input.clone()
            },
        )
        .unwrap();
        assert_eq!(restocked.stock, 5.0);
        assert!(materials::get_low_stock(&db).unwrap().is_empty());

        let nameless = MaterialInput {
            name: " ".to_string(),
            ..input
        };
        assert!(matches!(
            materials::create_material(&db, nameless),
            Err(PosError::Validation(_))
        ));
        assert!(matches!(
            materials::delete_material(&db, "missing"),
            Err(PosError::NotFound { .. })
        ));
    }

    #[test]
    fn test_menu_validation() {
        let db = setup_test_db();
        let base = MenuItemInput {
            name: "Donut".to_string(),
            category: "Bread".to_string(),
            price: 8000.0,
            recipe: vec![RecipeLine {
                material_id: "1".to_string(),
                quantity: 0.1,
            }],
            is_active: true,
        };

        let no_recipe = MenuItemInput {
            recipe: vec![],
            ..base.clone()
        };
        assert!(matches!(
            menu::create_menu_item(&db, no_recipe),
            Err(PosError::Validation(_))
        ));

        let free = MenuItemInput {
            price: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            menu::create_menu_item(&db, free),
            Err(PosError::Validation(_))
        ));

        let donut = menu::create_menu_item(&db, base).unwrap();
        assert_eq!(menu::get_menu_items(&db).unwrap().len(), 3);
        assert_eq!(menu::search_menu(&db, "don").unwrap()[0].id, donut.id);

        menu::delete_menu_item(&db, &donut.id).unwrap();
        assert!(menu::search_menu(&db, "don").unwrap().is_empty());
    }

    #[test]
    fn test_toggle_hides_item_from_till() {
        let db = setup_test_db();
        menu::toggle_menu_item(&db, "1").unwrap();

        let active = menu::get_active_menu_items(&db).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "2");
        assert!(menu::search_menu(&db, "brown").unwrap().is_empty());

        assert!(menu::toggle_menu_item(&db, "1").unwrap().is_active);
    }

    #[test]
    fn test_menu_costing() {
        let db = setup_test_db();
        let costing = menu::get_menu_costing(&db).unwrap();
        let brownies = costing.iter().find(|c| c.menu_id == "1").unwrap();

        // 0.2*12000 + 0.15*15000 + 2*2500 + 0.1*35000
        assert_close(brownies.unit_cost, 13150.0);
        assert_close(brownies.margin, 11850.0);
        assert!(brownies.missing_materials.is_empty());
        // Eggs limit production to 100
        assert!(brownies.producible_units.unwrap() <= 100);
    }

    // ========== REPORT TESTS ==========

    #[test]
    fn test_dashboard_figures() {
        let db = setup_test_db();
        cashier::checkout_at(&db, cart_with(&db, "2", 4), at(10)).unwrap();
        purchases::record_purchase_on(
            &db,
            PurchaseInput {
                material_id: "3".to_string(),
                quantity: 100.0,
                price: 2000.0,
                supplier: String::new(),
            },
            today(),
        )
        .unwrap();
        expenses::record_expense_on(
            &db,
            ExpenseInput {
                category: Some("Rent".to_string()),
                description: "August".to_string(),
                amount: 30000.0,
            },
            today(),
        )
        .unwrap();

        let stats = reports::get_dashboard_on(&db, today()).unwrap();

        assert_eq!(stats.today_sales, 110000.0);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.monthly_revenue, 110000.0);
        assert_eq!(stats.monthly_expenses, 230000.0);
        assert_eq!(stats.monthly_profit, -120000.0);
        // 4 Sweet Buns beat the 2 demo Brownies
        assert_eq!(stats.best_selling.unwrap().id, "2");
        assert!(stats.low_stock_items.is_empty());
    }

    #[test]
    fn test_best_seller_ignores_deleted_menu_items() {
        let db = setup_test_db();
        cashier::checkout_at(&db, cart_with(&db, "2", 5), at(10)).unwrap();
        menu::delete_menu_item(&db, "2").unwrap();

        let stats = reports::get_dashboard_on(&db, today()).unwrap();
        assert_eq!(stats.best_selling.unwrap().id, "1");
    }

    #[test]
    fn test_sales_and_cash_flow_reports() {
        let db = setup_test_db();
        cashier::checkout_at(&db, cart_with(&db, "1", 1), at(10)).unwrap();
        expenses::record_expense_on(
            &db,
            ExpenseInput {
                category: None,
                description: "Cleaning".to_string(),
                amount: 15000.0,
            },
            today(),
        )
        .unwrap();

        let sales = reports::get_sales_report(&db, Some(today()), Some(today())).unwrap();
        assert_eq!(sales.total_transactions, 2);
        assert_eq!(sales.total_sales, 75000.0);
        assert_eq!(sales.product_sales[0].name, "Brownies");
        assert_eq!(sales.product_sales[0].quantity, 3);

        let flow = reports::get_cash_flow_report(&db, Some(today()), Some(today())).unwrap();
        assert_eq!(flow.revenue, 75000.0);
        assert_eq!(flow.operational_expenses, 15000.0);
        assert_eq!(flow.net_profit, 60000.0);
        assert_close(flow.profit_margin, 80.0);

        let tomorrow = today().succ_opt().unwrap();
        let empty = reports::get_cash_flow_report(&db, Some(tomorrow), Some(tomorrow)).unwrap();
        assert_eq!(empty.revenue, 0.0);
        assert_eq!(empty.profit_margin, 0.0);
    }

    #[test]
    fn test_report_rejects_inverted_range() {
        let db = setup_test_db();
        let result = reports::get_sales_report(&db, Some(today()), today().pred_opt());
        assert!(matches!(result, Err(PosError::Validation(_))));
    }

    #[test]
    fn test_notifications_for_demo_store() {
        let db = setup_test_db();
        let feed = notifications::get_notifications(&db).unwrap();
        assert!(feed.notifications.iter().any(|n| n.id == "welcome"));
        assert!(!feed.notifications.iter().any(|n| n.id.starts_with("low-stock")));
    }

    #[test]
    fn test_notification_read_and_delete() {
        let db = setup_test_db();
        materials::update_material(
            &db,
            "4",
            MaterialInput {
                name: "Butter".to_string(),
                unit: "kg".to_string(),
                stock: 1.0,
                min_stock: 2.0,
                price: 35000.0,
                supplier: "Dairy Fresh".to_string(),
            },
        )
        .unwrap();
        assert_eq!(notifications::get_unread_count(&db).unwrap(), 2);

        let feed = notifications::get_notifications(&db).unwrap();
        let feed = notifications::mark_notification_read(feed, "low-stock-4").unwrap();
        assert_eq!(feed.unread_count(), 1);
        assert!(matches!(
            notifications::mark_notification_read(feed.clone(), "missing"),
            Err(PosError::NotFound { .. })
        ));

        let feed = notifications::delete_notification(feed, "welcome").unwrap();
        assert_eq!(feed.notifications.len(), 1);
        assert!(notifications::delete_notification(feed.clone(), "welcome").is_err());

        let feed = notifications::mark_all_notifications_read(feed);
        assert_eq!(feed.unread_count(), 0);
    }

    // ========== SETTINGS & BACKUP TESTS ==========

    #[test]
    fn test_settings_default_and_save() {
        let db = setup_test_db();
        let defaults = settings::get_settings(&db).unwrap();
        assert_eq!(defaults, StoreSettings::default());
        assert_eq!(defaults.currency, "IDR");

        let mut changed = defaults.clone();
        changed.store_info.name = "Toko Roti Sejahtera".to_string();
        changed.tax_rate = 11.0;
        settings::save_settings(&db, changed.clone()).unwrap();
        assert_eq!(settings::get_settings(&db).unwrap(), changed);

        let mut bad = changed;
        bad.tax_rate = 150.0;
        assert!(matches!(
            settings::save_settings(&db, bad),
            Err(PosError::Validation(_))
        ));
    }

    #[test]
    fn test_export_clear_import_roundtrip() {
        let db = setup_test_db();
        cashier::checkout_at(&db, cart_with(&db, "1", 2), at(10)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = settings::write_backup(&db, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup-pos-"));
        assert!(name.ends_with(".json"));

        settings::clear_all_data(&db).unwrap();
        assert!(db.keys().unwrap().is_empty());
        assert!(materials::get_materials(&db).unwrap().is_empty());
        assert!(auth::current_user(&db).unwrap().is_none());

        let bundle = settings::import_backup(&db, &path).unwrap();
        assert_eq!(bundle.transactions.len(), 2);
        assert_eq!(cashier::get_transactions(&db).unwrap().len(), 2);
        assert_close(stock_of(&db, "1"), 49.6);
        assert_eq!(menu::get_menu_items(&db).unwrap().len(), 2);
    }

    #[test]
    fn test_import_rejects_malformed_file() {
        let db = setup_test_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            settings::import_backup(&db, &path),
            Err(PosError::Serialization(_))
        ));
        assert_eq!(materials::get_materials(&db).unwrap().len(), 4);
    }

    #[test]
    fn test_reset_to_demo() {
        let db = setup_test_db();
        materials::delete_material(&db, "1").unwrap();
        settings::reset_to_demo(&db).unwrap();

        assert_eq!(materials::get_materials(&db).unwrap().len(), 4);
        assert_eq!(cashier::get_transactions(&db).unwrap().len(), 1);
        // The session is cleared along with everything else
        assert!(auth::current_user(&db).unwrap().is_none());
    }

    // ========== STORE TESTS ==========

    #[test]
    fn test_namespaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let config = |namespace: &str| AppConfig {
            data_dir: dir.path().to_path_buf(),
            namespace: namespace.to_string(),
            seed_demo_data: false,
            ..AppConfig::default()
        };

        let shop = crate::open_store(&config("pos")).unwrap();
        let other = crate::open_store(&config("training")).unwrap();
        seed::seed_demo_data(&shop, today()).unwrap();

        assert_eq!(shop.load::<RawMaterial>(Collection::RawMaterials).unwrap().len(), 4);
        assert!(other.load::<RawMaterial>(Collection::RawMaterials).unwrap().is_empty());

        other.save::<Transaction>(Collection::Transactions, &[]).unwrap();
        settings::clear_all_data(&shop).unwrap();
        assert!(shop.keys().unwrap().is_empty());
        assert_eq!(other.keys().unwrap(), vec!["training_transactions".to_string()]);
    }

    #[test]
    fn test_open_store_seeds_only_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().join("data"),
            ..AppConfig::default()
        };

        let db = crate::open_store(&config).unwrap();
        assert_eq!(materials::get_materials(&db).unwrap().len(), 4);
        materials::delete_material(&db, "1").unwrap();
        drop(db);

        let reopened = crate::open_store(&config).unwrap();
        assert_eq!(materials::get_materials(&reopened).unwrap().len(), 3);
        assert!(config.database_path().exists());
    }

    #[test]
    fn test_failed_update_leaves_collection_untouched() {
        let db = setup_test_db();
        let result = db.update(Collection::RawMaterials, |items: &mut Vec<RawMaterial>| {
            items.clear();
            Err::<(), _>(PosError::validation("abort"))
        });
        assert!(result.is_err());
        assert_eq!(materials::get_materials(&db).unwrap().len(), 4);
    }
}
