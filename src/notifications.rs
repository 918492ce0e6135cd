//! Derived notification feed: low stock, sales milestone, housekeeping tips.
//!
//! The feed is rebuilt from current data on demand; read/deleted state lives
//! only on the `NotificationFeed` value the caller holds.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::inventory::low_stock;
use crate::models::{NotificationPrefs, RawMaterial, Transaction};
use crate::receipt::format_currency;

/// Today's sales above this raise a milestone note.
pub const SALES_MILESTONE: f64 = 100_000.0;
const BACKUP_TIP_MIN_TRANSACTIONS: usize = 10;
const WELCOME_MAX_TRANSACTIONS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Info,
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
}

impl NotificationFeed {
    /// Build the feed as of `now`, newest first.
    pub fn generate(
        now: NaiveDateTime,
        prefs: &NotificationPrefs,
        materials: &[RawMaterial],
        transactions: &[Transaction],
    ) -> Self {
        let mut notifications = Vec::new();

        if prefs.low_stock_alert {
            for item in low_stock(materials) {
                notifications.push(Notification {
                    id: format!("low-stock-{}", item.id),
                    kind: NotificationKind::Warning,
                    title: "Low stock!".to_string(),
                    message: format!("{} has {} {} left", item.name, item.stock, item.unit),
                    timestamp: now,
                    read: false,
                });
            }
        }

        let today = now.date();
        let today_sales: f64 = transactions
            .iter()
            .filter(|t| t.date == today)
            .map(|t| t.total)
            .sum();
        if today_sales > SALES_MILESTONE {
            notifications.push(Notification {
                id: "sales-milestone".to_string(),
                kind: NotificationKind::Success,
                title: "Target reached!".to_string(),
                message: format!("Sales today have reached {}", format_currency(today_sales)),
                timestamp: now - Duration::hours(2),
                read: false,
            });
        }

        if transactions.len() > BACKUP_TIP_MIN_TRANSACTIONS {
            notifications.push(Notification {
                id: "system-tip".to_string(),
                kind: NotificationKind::Info,
                title: "System tip".to_string(),
                message: "Remember to back up your data regularly from Settings".to_string(),
                timestamp: now - Duration::days(1),
                read: true,
            });
        }

        if transactions.len() <= WELCOME_MAX_TRANSACTIONS {
            notifications.push(Notification {
                id: "welcome".to_string(),
                kind: NotificationKind::Info,
                title: "Welcome!".to_string(),
                message: "Thanks for using the POS. Explore all the available features."
                    .to_string(),
                timestamp: now - Duration::days(3),
                read: false,
            });
        }

        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        NotificationFeed { notifications }
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Returns false when no notification has that id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }
}
