//! Persistence layer — the durable key-value settings surface.
//!
//! Everything the app persists (signup progress, dashboard profile, daily
//! symptom check-ins, user records) is a JSON value scoped by `(user_id, key)`.

pub mod libsql_backend;

pub use libsql_backend::LibSqlStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Well-known settings keys.
pub mod settings_keys {
    /// Key for the in-progress signup draft envelope.
    pub const SIGNUP_PROGRESS: &str = "signup_progress";
    /// Key for the dashboard profile blob.
    pub const PROFILE: &str = "profile";
    /// Key for the daily symptom check-in blob.
    pub const SYMPTOMS: &str = "symptoms";
    /// Default user ID (single-user deployment).
    pub const DEFAULT_USER: &str = "default";

    /// Key for a created account's user record.
    pub fn user_record(user_id: &str) -> String {
        format!("user_record:{user_id}")
    }
}

/// Backend-agnostic settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the value stored under `(user_id, key)`, if any.
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError>;

    /// Write (insert or overwrite) the value under `(user_id, key)`.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Delete the entry under `(user_id, key)`. Returns whether one existed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, StoreError>;
}
