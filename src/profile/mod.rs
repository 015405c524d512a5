//! Dashboard state containers — profile and daily symptom check-in.
//!
//! Each container is an explicit [`StateCell`]: constructed with an injectable
//! initial value, hydrated from the settings surface, and observed through a
//! `watch` channel. Nothing here lives in module-level mutable state; callers
//! pass the cell wherever it is needed.

pub mod routes;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use crate::store::{SettingsStore, settings_keys};

/// Dashboard-facing profile data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub username: String,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menopause_notes: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            username: "Jane".to_string(),
            avatar_url: "https://placehold.co/100x100.png".to_string(),
            dietary_preferences: Some("vegetarian".to_string()),
            menopause_notes: None,
        }
    }
}

/// One daily symptom check-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomLog {
    pub mood: String,
    pub sleep_quality: String,
    pub hot_flashes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_symptoms: Option<String>,
}

/// A persistent, observable state value.
///
/// `set` persists best-effort (a store failure is logged, never surfaced) and
/// then notifies subscribers; `get` returns the current value.
pub struct StateCell<T> {
    store: Arc<dyn SettingsStore>,
    user_id: String,
    key: &'static str,
    tx: watch::Sender<T>,
}

impl<T> StateCell<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Build a cell, preferring persisted state over `initial`.
    ///
    /// A missing or unreadable entry falls back to `initial`.
    pub async fn hydrate(store: Arc<dyn SettingsStore>, key: &'static str, initial: T) -> Self {
        let user_id = settings_keys::DEFAULT_USER.to_string();
        let value = match store.get_setting(&user_id, key).await {
            Ok(Some(raw)) => match serde_json::from_value(raw) {
                Ok(v) => v,
                Err(e) => {
                    warn!(key, "Discarding unreadable persisted state: {}", e);
                    initial
                }
            },
            Ok(None) => initial,
            Err(e) => {
                warn!(key, "Failed to hydrate state: {}", e);
                initial
            }
        };

        let (tx, _rx) = watch::channel(value);
        Self {
            store,
            user_id,
            key,
            tx,
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value, persist it, and notify subscribers.
    pub async fn set(&self, value: T) {
        match serde_json::to_value(&value) {
            Ok(raw) => {
                if let Err(e) = self.store.set_setting(&self.user_id, self.key, &raw).await {
                    warn!(key = self.key, "Failed to persist state: {}", e);
                }
            }
            Err(e) => warn!(key = self.key, "Failed to serialize state: {}", e),
        }
        self.tx.send_replace(value);
    }

    /// Subscribe to changes. The receiver observes every `set`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// The dashboard profile container.
pub type ProfileCell = StateCell<ProfileData>;
/// The daily symptom check-in container.
pub type SymptomCell = StateCell<SymptomLog>;

/// Hydrate the profile container from the `profile` settings key.
pub async fn profile_cell(store: Arc<dyn SettingsStore>) -> ProfileCell {
    StateCell::hydrate(store, settings_keys::PROFILE, ProfileData::default()).await
}

/// Hydrate the symptom container from the `symptoms` settings key.
pub async fn symptom_cell(store: Arc<dyn SettingsStore>) -> SymptomCell {
    StateCell::hydrate(store, settings_keys::SYMPTOMS, SymptomLog::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LibSqlStore;

    async fn memory_store() -> Arc<dyn SettingsStore> {
        Arc::new(LibSqlStore::new_memory().await.unwrap())
    }

    #[tokio::test]
    async fn hydrate_falls_back_to_initial() {
        let store = memory_store().await;
        let cell = profile_cell(store).await;
        assert_eq!(cell.get(), ProfileData::default());
    }

    #[tokio::test]
    async fn hydrate_prefers_persisted_state() {
        let store = memory_store().await;
        let persisted = ProfileData {
            username: "Marie".to_string(),
            ..Default::default()
        };
        store
            .set_setting(
                settings_keys::DEFAULT_USER,
                settings_keys::PROFILE,
                &serde_json::to_value(&persisted).unwrap(),
            )
            .await
            .unwrap();

        let cell = profile_cell(store).await;
        assert_eq!(cell.get().username, "Marie");
    }

    #[tokio::test]
    async fn set_persists_and_survives_rehydration() {
        let store = memory_store().await;
        let cell = symptom_cell(Arc::clone(&store)).await;

        cell.set(SymptomLog {
            mood: "calm".to_string(),
            ..Default::default()
        })
        .await;

        let again = symptom_cell(store).await;
        assert_eq!(again.get().mood, "calm");
    }

    #[tokio::test]
    async fn subscribers_observe_updates() {
        let store = memory_store().await;
        let cell = profile_cell(store).await;
        let mut rx = cell.subscribe();

        cell.set(ProfileData {
            username: "Ana".to_string(),
            ..Default::default()
        })
        .await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().username, "Ana");
    }

    #[tokio::test]
    async fn unreadable_persisted_state_falls_back() {
        let store = memory_store().await;
        store
            .set_setting(
                settings_keys::DEFAULT_USER,
                settings_keys::PROFILE,
                &serde_json::json!(42),
            )
            .await
            .unwrap();

        let cell = profile_cell(store).await;
        assert_eq!(cell.get(), ProfileData::default());
    }
}
