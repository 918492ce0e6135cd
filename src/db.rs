//! Namespaced key-value record store on top of SQLite.
//!
//! Each collection lives under one key (`<namespace>_<collection>`) and its
//! value is a JSON-encoded array. There is no schema versioning for the
//! stored values; a missing key reads as an empty collection.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{PosError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    RawMaterials,
    MenuItems,
    Transactions,
    Purchases,
    Expenses,
}

impl Collection {
    pub fn suffix(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::RawMaterials => "raw_materials",
            Collection::MenuItems => "menu_items",
            Collection::Transactions => "transactions",
            Collection::Purchases => "purchases",
            Collection::Expenses => "expenses",
        }
    }
}

/// Single-value keys that are not collections.
pub const CURRENT_USER_KEY: &str = "current_user";
pub const SETTINGS_KEY: &str = "settings";

pub struct Database {
    pub conn: Mutex<Connection>,
    namespace: String,
}

impl Database {
    pub fn open(config: &AppConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let db_path = config.database_path();
        info!("Opening store at {}", db_path.display());
        let conn = Connection::open(db_path)?;

        Ok(Database {
            conn: Mutex::new(conn),
            namespace: config.namespace.clone(),
        })
    }

    pub fn open_in_memory(namespace: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            ",
        )?;

        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| PosError::LockPoisoned)
    }

    pub fn key_for(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }

    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        Ok(self
            .get_value::<Vec<T>>(collection.suffix())?
            .unwrap_or_default())
    }

    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        self.set_value(collection.suffix(), records)
    }

    /// Load a collection, let `f` mutate it, and write it back.
    pub fn update<T, R>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Vec<T>) -> Result<R>,
    ) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut records = self.load::<T>(collection)?;
        let out = f(&mut records)?;
        self.save(collection, &records)?;
        Ok(out)
    }

    pub fn get_value<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let key = self.key_for(name);
        let conn = self.lock()?;

        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [&key], |row| {
                row.get(0)
            })
            .optional()?;

        debug!(key = %key, hit = raw.is_some(), "store read");

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set_value<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let key = self.key_for(name);
        let json = serde_json::to_string(value)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key, json],
        )?;

        debug!(key = %key, bytes = json.len(), "store write");
        Ok(())
    }

    pub fn remove_value(&self, name: &str) -> Result<()> {
        let key = self.key_for(name);
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", [&key])?;
        Ok(())
    }

    /// Remove every key under this store's namespace.
    pub fn clear_namespace(&self) -> Result<usize> {
        let conn = self.lock()?;
        let prefix = format!("{}_", self.namespace);
        // substr avoids LIKE treating '_' in the namespace as a wildcard
        let removed = conn.execute(
            "DELETE FROM kv_store WHERE substr(key, 1, length(?1)) = ?1",
            [&prefix],
        )?;
        info!(namespace = %self.namespace, removed, "store cleared");
        Ok(removed)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let prefix = format!("{}_", self.namespace);
        let mut stmt = conn.prepare(
            "SELECT key FROM kv_store WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map([&prefix], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(feature = "desktop")]
use tauri::{AppHandle, Manager};

#[cfg(feature = "desktop")]
pub trait DatabaseExt {
    fn db(&self) -> &Database;
}

#[cfg(feature = "desktop")]
impl DatabaseExt for AppHandle {
    fn db(&self) -> &Database {
        self.state::<Database>().inner()
    }
}
