//! Account creation and profile persistence.
//!
//! The signup wizard talks to this layer through the [`AccountBackend`] trait
//! and never sees what is behind it. `AccountService` orchestrates the
//! multi-step signup completion (auth account, image upload, profile record)
//! and owns the rollback policy when a later step fails. The auth backend is
//! an in-process stub behind a trait — a real identity provider plugs in at
//! that seam.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AccountError;
use crate::profile::ProfileData;
use crate::signup::model::{
    ConcernSelections, CycleInfo, MenopausePhase, Preferences, SignupDraft, SymptomSelections,
};
use crate::store::{SettingsStore, settings_keys};

const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100.png";

/// Result of a successful signup completion.
#[derive(Debug, Clone, Serialize)]
pub struct SignupOutcome {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// The account-creation collaborator consumed by the wizard.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Provision an account from a complete draft.
    ///
    /// Owns all backing-store writes and any rollback-on-partial-failure
    /// policy. Errors are descriptive and shown to the user verbatim.
    async fn complete_signup(&self, draft: &SignupDraft) -> Result<SignupOutcome, AccountError>;
}

/// Authentication backend seam.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create a user, returning the new user id.
    async fn create_user(&self, email: &str, password: &str) -> Result<String, AccountError>;

    /// Verify credentials, returning the user id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AccountError>;

    /// Remove a user (used for rollback).
    async fn delete_user(&self, user_id: &str) -> Result<(), AccountError>;
}

/// In-process auth stub. Accounts live in memory only.
#[derive(Default)]
pub struct StubAuth {
    users: RwLock<HashMap<String, StubUser>>,
}

struct StubUser {
    user_id: String,
    password: String,
}

impl StubAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthBackend for StubAuth {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(AccountError::CreateFailed(
                "email already registered".to_string(),
            ));
        }
        let user_id = format!("user_{}", Uuid::new_v4().simple());
        users.insert(
            email.to_string(),
            StubUser {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let users = self.users.read().await;
        match users.get(email) {
            Some(user) if user.password == password => Ok(user.user_id.clone()),
            _ => Err(AccountError::SignInFailed(
                "invalid email or password".to_string(),
            )),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AccountError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|_, u| u.user_id != user_id);
        if users.len() == before {
            return Err(AccountError::NotFound(user_id.to_string()));
        }
        Ok(())
    }
}

/// The profile record written at account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub personal: PersonalInfo,
    pub menopause: MenopauseInfo,
    pub preferences: StoredPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub is_active: bool,
    pub last_login: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenopauseInfo {
    pub phase: MenopausePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_info: Option<CycleInfo>,
    #[serde(default)]
    pub symptoms: SymptomSelections,
    #[serde(default)]
    pub concerns: ConcernSelections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPreferences {
    #[serde(flatten)]
    pub flags: Preferences,
    pub theme: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
}

/// Partial update to a stored record's profile-facing fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub avatar_url: Option<String>,
    pub dietary_preferences: Option<String>,
    pub menopause_notes: Option<String>,
}

/// Orchestrates signup completion and account-level profile operations.
pub struct AccountService {
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn SettingsStore>,
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthBackend>, store: Arc<dyn SettingsStore>) -> Self {
        Self { auth, store }
    }

    /// Verify credentials, returning the user id.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, AccountError> {
        self.auth.sign_in(email, password).await
    }

    /// Read the dashboard-facing profile for a user, if a record exists.
    pub async fn user_profile(&self, user_id: &str) -> Result<Option<ProfileData>, AccountError> {
        let Some(record) = self.load_record(user_id).await? else {
            return Ok(None);
        };
        Ok(Some(ProfileData {
            username: format!(
                "{} {}",
                record.personal.first_name, record.personal.last_name
            ),
            avatar_url: record
                .profile_image_url
                .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string()),
            dietary_preferences: Some(
                record
                    .preferences
                    .dietary_preferences
                    .unwrap_or_else(|| "vegetarian".to_string()),
            ),
            menopause_notes: Some(record.menopause.notes.unwrap_or_default()),
        }))
    }

    /// Apply a partial profile update, bumping the record's `updated_at`.
    pub async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<(), AccountError> {
        let mut record = self
            .load_record(user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(user_id.to_string()))?;

        if let Some(avatar_url) = changes.avatar_url {
            record.profile_image_url = Some(avatar_url);
        }
        if let Some(dietary) = changes.dietary_preferences {
            record.preferences.dietary_preferences = Some(dietary);
        }
        if let Some(notes) = changes.menopause_notes {
            record.menopause.notes = Some(notes);
        }
        record.personal.updated_at = Utc::now();

        self.save_record(user_id, &record).await
    }

    /// Stubbed image upload: derives a deterministic URL for the user.
    async fn upload_profile_image(
        &self,
        user_id: &str,
        _image_ref: &str,
    ) -> Result<String, AccountError> {
        Ok(format!(
            "https://storage.menoguide.app/profiles/{user_id}/profile.jpg"
        ))
    }

    async fn load_record(&self, user_id: &str) -> Result<Option<UserRecord>, AccountError> {
        let value = self
            .store
            .get_setting(settings_keys::DEFAULT_USER, &settings_keys::user_record(user_id))
            .await
            .map_err(|e| AccountError::ProfileSaveFailed(e.to_string()))?;
        match value {
            None => Ok(None),
            Some(raw) => serde_json::from_value(raw)
                .map(Some)
                .map_err(|e| AccountError::ProfileSaveFailed(e.to_string())),
        }
    }

    async fn save_record(&self, user_id: &str, record: &UserRecord) -> Result<(), AccountError> {
        let raw = serde_json::to_value(record)
            .map_err(|e| AccountError::ProfileSaveFailed(e.to_string()))?;
        self.store
            .set_setting(settings_keys::DEFAULT_USER, &settings_keys::user_record(user_id), &raw)
            .await
            .map_err(|e| AccountError::ProfileSaveFailed(e.to_string()))
    }

    fn build_record(draft: &SignupDraft, profile_image_url: Option<String>) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            personal: PersonalInfo {
                first_name: draft.first_name.clone().unwrap_or_default(),
                last_name: draft.last_name.clone().unwrap_or_default(),
                email: draft.email.clone().unwrap_or_default(),
                created_at: now,
                updated_at: now,
            },
            menopause: MenopauseInfo {
                // The wizard's final gate guarantees a phase is present.
                phase: draft.phase.unwrap_or(MenopausePhase::PeriMenopause),
                cycle_info: draft.cycle_info.clone(),
                symptoms: draft.symptoms.clone().unwrap_or_default(),
                concerns: draft.concerns.clone().unwrap_or_default(),
                notes: None,
            },
            preferences: StoredPreferences {
                flags: draft.preferences.clone().unwrap_or_default(),
                theme: "light".to_string(),
                language: "en".to_string(),
                dietary_preferences: None,
            },
            profile_image_url,
            is_active: true,
            last_login: now,
        }
    }
}

#[async_trait]
impl AccountBackend for AccountService {
    async fn complete_signup(&self, draft: &SignupDraft) -> Result<SignupOutcome, AccountError> {
        let email = draft
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AccountError::CreateFailed("email and password are required".into()))?;
        let password = draft
            .password
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AccountError::CreateFailed("email and password are required".into()))?;

        // Step 1: auth account.
        let user_id = self.auth.create_user(&email, &password).await?;

        // Step 2: profile image, when one was staged.
        let mut profile_image_url = None;
        if let Some(image_ref) = draft.profile_image.as_deref() {
            profile_image_url = Some(self.upload_profile_image(&user_id, image_ref).await?);
        }

        // Step 3: profile record. The auth account already exists, so a
        // failure here triggers rollback.
        let record = Self::build_record(draft, profile_image_url.clone());
        if let Err(save_err) = self.save_record(&user_id, &record).await {
            warn!("Rollback: account creation succeeded but profile save failed");
            if let Err(rollback_err) = self.auth.delete_user(&user_id).await {
                warn!("Failed to rollback account creation: {}", rollback_err);
            }
            return Err(save_err);
        }

        info!(user_id = %user_id, "Signup completed");
        Ok(SignupOutcome {
            user_id,
            profile_image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::signup::model::DraftUpdate;
    use crate::store::LibSqlStore;

    fn complete_draft() -> SignupDraft {
        let mut draft = SignupDraft::default();
        draft.apply(DraftUpdate::FirstName("Jane".into()));
        draft.apply(DraftUpdate::LastName("Doe".into()));
        draft.apply(DraftUpdate::Email("jane@example.com".into()));
        draft.apply(DraftUpdate::Password("Str0ng!pass".into()));
        draft.apply(DraftUpdate::Phase(MenopausePhase::PostMenopause));
        draft
    }

    async fn service() -> (AccountService, Arc<StubAuth>) {
        let auth = Arc::new(StubAuth::new());
        let store: Arc<dyn SettingsStore> = Arc::new(LibSqlStore::new_memory().await.unwrap());
        (
            AccountService::new(Arc::clone(&auth) as Arc<dyn AuthBackend>, store),
            auth,
        )
    }

    #[tokio::test]
    async fn stub_auth_rejects_duplicate_email() {
        let auth = StubAuth::new();
        auth.create_user("a@b.co", "pw").await.unwrap();
        let err = auth.create_user("a@b.co", "pw2").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create account: email already registered"
        );
    }

    #[tokio::test]
    async fn stub_auth_verifies_credentials() {
        let auth = StubAuth::new();
        let id = auth.create_user("a@b.co", "pw").await.unwrap();
        assert_eq!(auth.sign_in("a@b.co", "pw").await.unwrap(), id);
        assert!(auth.sign_in("a@b.co", "wrong").await.is_err());
        assert!(auth.sign_in("missing@b.co", "pw").await.is_err());
    }

    #[tokio::test]
    async fn complete_signup_provisions_account_and_record() {
        let (service, _auth) = service().await;
        let outcome = service.complete_signup(&complete_draft()).await.unwrap();
        assert!(outcome.user_id.starts_with("user_"));
        assert!(outcome.profile_image_url.is_none());

        let profile = service
            .user_profile(&outcome.user_id)
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(profile.username, "Jane Doe");
        assert_eq!(profile.avatar_url, PLACEHOLDER_AVATAR);
        assert_eq!(profile.dietary_preferences.as_deref(), Some("vegetarian"));
    }

    #[tokio::test]
    async fn complete_signup_uploads_staged_image() {
        let (service, _auth) = service().await;
        let mut draft = complete_draft();
        draft.apply(DraftUpdate::ProfileImage(Some("staging/img.png".into())));

        let outcome = service.complete_signup(&draft).await.unwrap();
        let url = outcome.profile_image_url.unwrap();
        assert!(url.contains(&outcome.user_id));

        let profile = service.user_profile(&outcome.user_id).await.unwrap().unwrap();
        assert_eq!(profile.avatar_url, url);
    }

    #[tokio::test]
    async fn complete_signup_requires_credentials() {
        let (service, _auth) = service().await;
        let mut draft = complete_draft();
        draft.email = None;
        let err = service.complete_signup(&draft).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create account: email and password are required"
        );
    }

    /// Store whose writes always fail — drives the rollback path.
    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn get_setting(
            &self,
            _user_id: &str,
            _key: &str,
        ) -> Result<Option<serde_json::Value>, StoreError> {
            Ok(None)
        }

        async fn set_setting(
            &self,
            _user_id: &str,
            _key: &str,
            _value: &serde_json::Value,
        ) -> Result<(), StoreError> {
            Err(StoreError::Query("disk full".into()))
        }

        async fn delete_setting(&self, _user_id: &str, _key: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn failed_record_write_rolls_back_auth_account() {
        let auth = Arc::new(StubAuth::new());
        let service = AccountService::new(
            Arc::clone(&auth) as Arc<dyn AuthBackend>,
            Arc::new(BrokenStore),
        );

        let err = service.complete_signup(&complete_draft()).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to save profile:"));

        // The rollback removed the stub account, so the email is free again.
        auth.create_user("jane@example.com", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn update_profile_merges_changes() {
        let (service, _auth) = service().await;
        let outcome = service.complete_signup(&complete_draft()).await.unwrap();

        service
            .update_profile(
                &outcome.user_id,
                ProfileChanges {
                    dietary_preferences: Some("vegan".into()),
                    menopause_notes: Some("sleeping better".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let profile = service.user_profile(&outcome.user_id).await.unwrap().unwrap();
        assert_eq!(profile.dietary_preferences.as_deref(), Some("vegan"));
        assert_eq!(profile.menopause_notes.as_deref(), Some("sleeping better"));
        // Untouched fields keep their values.
        assert_eq!(profile.username, "Jane Doe");
    }

    #[tokio::test]
    async fn update_profile_for_unknown_user_fails() {
        let (service, _auth) = service().await;
        let err = service
            .update_profile("user_missing", ProfileChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound(_)));
    }
}
