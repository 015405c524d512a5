//! libSQL backend — async `SettingsStore` implementation.
//!
//! Supports local file and in-memory databases. A single connection is reused
//! for all operations; `libsql::Connection` is `Send + Sync` and safe for
//! concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database, params};
use tracing::info;

use crate::error::StoreError;
use crate::store::SettingsStore;

/// libSQL settings store.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<Database>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("Failed to create store directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        info!(path = %path.display(), "Settings store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        Ok(store)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create the settings table if it does not exist. Idempotent.
    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    user_id TEXT NOT NULL,
                    key TEXT NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (user_id, key)
                )",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for LibSqlStore {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: serde_json::Value =
                    serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get_setting: {e}"))),
        }
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![user_id, key, value_str, now],
        )
        .await
        .map_err(|e| StoreError::Query(format!("set_setting: {e}")))?;

        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, StoreError> {
        let conn = self.conn();
        let count = conn
            .execute(
                "DELETE FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("delete_setting: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn settings_crud() {
        let store = LibSqlStore::new_memory().await.unwrap();

        let value = serde_json::json!({"theme": "light"});
        store
            .set_setting("user1", "preferences", &value)
            .await
            .unwrap();

        let loaded = store
            .get_setting("user1", "preferences")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded["theme"], "light");

        // Overwrite
        let updated = serde_json::json!({"theme": "dark"});
        store
            .set_setting("user1", "preferences", &updated)
            .await
            .unwrap();
        let loaded = store
            .get_setting("user1", "preferences")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded["theme"], "dark");

        // Delete
        assert!(store.delete_setting("user1", "preferences").await.unwrap());
        let gone = store.get_setting("user1", "preferences").await.unwrap();
        assert!(gone.is_none());

        // Deleting again reports nothing to delete
        assert!(!store.delete_setting("user1", "preferences").await.unwrap());
    }

    #[tokio::test]
    async fn settings_user_isolation() {
        let store = LibSqlStore::new_memory().await.unwrap();

        store
            .set_setting("user1", "key", &serde_json::json!("val1"))
            .await
            .unwrap();
        store
            .set_setting("user2", "key", &serde_json::json!("val2"))
            .await
            .unwrap();

        let v1 = store.get_setting("user1", "key").await.unwrap().unwrap();
        let v2 = store.get_setting("user2", "key").await.unwrap().unwrap();
        assert_eq!(v1, "val1");
        assert_eq!(v2, "val2");
    }

    #[tokio::test]
    async fn settings_get_nonexistent() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let missing = store.get_setting("nobody", "nothing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("menoguide.db");
        let store = LibSqlStore::new_local(&db_path).await.unwrap();
        assert!(db_path.exists());
        drop(store);
    }
}
