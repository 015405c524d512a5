//! Signup progress persistence.
//!
//! The in-progress draft is wrapped in a timestamped envelope and stored under
//! a fixed settings key. Persistence is best-effort: a user must never be
//! blocked because the store misbehaved, so every failure here is logged and
//! swallowed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::signup::model::SignupDraft;
use crate::store::{SettingsStore, settings_keys};

/// Saved progress older than this is treated as absent.
const MAX_AGE_HOURS: i64 = 24;

/// Envelope wrapping a draft with its capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedProgress {
    data: SignupDraft,
    saved_at: DateTime<Utc>,
}

/// Handle for saving, restoring, and clearing signup progress.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn SettingsStore>,
    user_id: String,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            user_id: settings_keys::DEFAULT_USER.to_string(),
        }
    }

    /// Persist the full draft, overwriting any prior envelope.
    pub async fn save(&self, draft: &SignupDraft) {
        let envelope = SavedProgress {
            data: draft.clone(),
            saved_at: Utc::now(),
        };
        let value = match serde_json::to_value(&envelope) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize signup progress: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .store
            .set_setting(&self.user_id, settings_keys::SIGNUP_PROGRESS, &value)
            .await
        {
            warn!("Failed to save signup progress: {}", e);
        }
    }

    /// Restore the draft, if a fresh envelope exists.
    ///
    /// Returns `None` when no entry exists, when the entry does not
    /// deserialize, or when it is 24 hours old or more.
    pub async fn load(&self) -> Option<SignupDraft> {
        let value = match self
            .store
            .get_setting(&self.user_id, settings_keys::SIGNUP_PROGRESS)
            .await
        {
            Ok(v) => v?,
            Err(e) => {
                warn!("Failed to load signup progress: {}", e);
                return None;
            }
        };

        let envelope: SavedProgress = match serde_json::from_value(value) {
            Ok(p) => p,
            Err(e) => {
                warn!("Discarding unreadable signup progress: {}", e);
                return None;
            }
        };

        if Utc::now() - envelope.saved_at >= Duration::hours(MAX_AGE_HOURS) {
            return None;
        }
        Some(envelope.data)
    }

    /// Delete any saved progress. Idempotent.
    pub async fn clear(&self) {
        if let Err(e) = self
            .store
            .delete_setting(&self.user_id, settings_keys::SIGNUP_PROGRESS)
            .await
        {
            warn!("Failed to clear signup progress: {}", e);
        }
    }
}
