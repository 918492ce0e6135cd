pub mod auth;
pub mod cashier;
pub mod expenses;
pub mod materials;
pub mod menu;
pub mod notifications;
pub mod purchases;
pub mod reports;
pub mod settings;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
