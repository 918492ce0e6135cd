use chrono::Local;

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::models::{RawMaterial, Transaction};
use crate::notifications::NotificationFeed;

use super::settings;

pub fn get_notifications(db: &Database) -> Result<NotificationFeed> {
    let prefs = settings::get_settings(db)?.notifications;
    Ok(NotificationFeed::generate(
        Local::now().naive_local(),
        &prefs,
        &db.load::<RawMaterial>(Collection::RawMaterials)?,
        &db.load::<Transaction>(Collection::Transactions)?,
    ))
}

pub fn get_unread_count(db: &Database) -> Result<usize> {
    Ok(get_notifications(db)?.unread_count())
}

// Read and deleted state lives on the feed the caller holds.

pub fn mark_notification_read(mut feed: NotificationFeed, id: &str) -> Result<NotificationFeed> {
    if !feed.mark_read(id) {
        return Err(PosError::not_found("Notification", id));
    }
    Ok(feed)
}

pub fn mark_all_notifications_read(mut feed: NotificationFeed) -> NotificationFeed {
    feed.mark_all_read();
    feed
}

pub fn delete_notification(mut feed: NotificationFeed, id: &str) -> Result<NotificationFeed> {
    if !feed.delete(id) {
        return Err(PosError::not_found("Notification", id));
    }
    Ok(feed)
}
