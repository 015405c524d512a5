//! Signup data model — the draft accumulator and its typed updates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Menopause stage category. Governs which steps and symptom sets apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenopausePhase {
    PreMenopause,
    PeriMenopause,
    PostMenopause,
}

impl MenopausePhase {
    pub fn all() -> &'static [MenopausePhase] {
        &[
            MenopausePhase::PreMenopause,
            MenopausePhase::PeriMenopause,
            MenopausePhase::PostMenopause,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MenopausePhase::PreMenopause => "pre-menopause",
            MenopausePhase::PeriMenopause => "peri-menopause",
            MenopausePhase::PostMenopause => "post-menopause",
        }
    }
}

impl std::fmt::Display for MenopausePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MenopausePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-menopause" => Ok(MenopausePhase::PreMenopause),
            "peri-menopause" => Ok(MenopausePhase::PeriMenopause),
            "post-menopause" => Ok(MenopausePhase::PostMenopause),
            _ => Err(format!("unknown menopause phase: {s}")),
        }
    }
}

/// Menstrual cycle details, collected only for pre-menopause.
///
/// Fields stay optional while the step is being edited; the validation rules
/// decide when they must all be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// Average cycle length in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cycle_length: Option<u32>,
    /// Period duration in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_period_date: Option<NaiveDate>,
    /// Whether cycles arrive at a consistent length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_regular: Option<bool>,
}

/// The fixed symptom checklist plus free-form custom entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomSelections {
    pub hot_flashes: bool,
    pub night_sweats: bool,
    pub mood_swings: bool,
    pub fatigue: bool,
    pub sleep_problems: bool,
    pub brain_fog: bool,
    pub weight_gain: bool,
    pub vaginal_dryness: bool,
    pub irregular_periods: bool,
    pub heavy_bleeding: bool,
    pub skipped_periods: bool,
    pub shorter_cycles: bool,
    pub bone_loss: bool,
    pub heart_health: bool,
    pub other_symptoms: Vec<String>,
}

impl SymptomSelections {
    /// Whether any flag is set or any custom symptom was entered.
    pub fn has_any(&self) -> bool {
        self.hot_flashes
            || self.night_sweats
            || self.mood_swings
            || self.fatigue
            || self.sleep_problems
            || self.brain_fog
            || self.weight_gain
            || self.vaginal_dryness
            || self.irregular_periods
            || self.heavy_bleeding
            || self.skipped_periods
            || self.shorter_cycles
            || self.bone_loss
            || self.heart_health
            || !self.other_symptoms.is_empty()
    }
}

/// The fixed personal-concern checklist plus free-form custom entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcernSelections {
    pub sleep_quality: bool,
    pub energy_levels: bool,
    pub mental_health: bool,
    pub relationships: bool,
    pub career: bool,
    pub physical_activity: bool,
    pub nutrition: bool,
    pub stress_management: bool,
    pub other_concerns: Vec<String>,
}

impl ConcernSelections {
    pub fn has_any(&self) -> bool {
        self.sleep_quality
            || self.energy_levels
            || self.mental_health
            || self.relationships
            || self.career
            || self.physical_activity
            || self.nutrition
            || self.stress_management
            || !self.other_concerns.is_empty()
    }
}

/// Communication and privacy preferences. All independent, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications: bool,
    pub email_updates: bool,
    pub community_access: bool,
    pub data_sharing: bool,
}

/// The accumulating, partially-filled signup record.
///
/// Every field is optional while the wizard runs; `validate_complete` is the
/// only place that decides whether the draft is submittable. Owned exclusively
/// by the wizard for the duration of one signup session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Opaque reference to an already-uploaded image (e.g. a staging path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<MenopausePhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_info: Option<CycleInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<SymptomSelections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concerns: Option<ConcernSelections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl SignupDraft {
    /// Apply one typed update. Nested groups are replaced whole — callers
    /// supply the full group, not a delta.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::FirstName(v) => self.first_name = Some(v),
            DraftUpdate::LastName(v) => self.last_name = Some(v),
            DraftUpdate::Email(v) => self.email = Some(v),
            DraftUpdate::Password(v) => self.password = Some(v),
            DraftUpdate::ProfileImage(v) => self.profile_image = v,
            DraftUpdate::Phase(v) => self.phase = Some(v),
            DraftUpdate::CycleInfo(v) => self.cycle_info = Some(v),
            DraftUpdate::Symptoms(v) => self.symptoms = Some(v),
            DraftUpdate::Concerns(v) => self.concerns = Some(v),
            DraftUpdate::Preferences(v) => self.preferences = Some(v),
        }
    }
}

/// A typed update to one top-level draft field.
///
/// This replaces an untyped partial merge: every mutation names the field it
/// touches, so a malformed partial state cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    Password(String),
    ProfileImage(Option<String>),
    Phase(MenopausePhase),
    CycleInfo(CycleInfo),
    Symptoms(SymptomSelections),
    Concerns(ConcernSelections),
    Preferences(Preferences),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_serde_uses_kebab_case() {
        let json = serde_json::to_string(&MenopausePhase::PreMenopause).unwrap();
        assert_eq!(json, "\"pre-menopause\"");
        let parsed: MenopausePhase = serde_json::from_str("\"peri-menopause\"").unwrap();
        assert_eq!(parsed, MenopausePhase::PeriMenopause);
    }

    #[test]
    fn phase_display_matches_serde() {
        for phase in MenopausePhase::all() {
            let json = serde_json::to_string(phase).unwrap();
            assert_eq!(json, format!("\"{phase}\""));
        }
    }

    #[test]
    fn draft_applies_updates_field_by_field() {
        let mut draft = SignupDraft::default();
        draft.apply(DraftUpdate::FirstName("Jane".into()));
        draft.apply(DraftUpdate::Phase(MenopausePhase::PostMenopause));
        assert_eq!(draft.first_name.as_deref(), Some("Jane"));
        assert_eq!(draft.phase, Some(MenopausePhase::PostMenopause));
        assert!(draft.last_name.is_none());
    }

    #[test]
    fn nested_groups_are_replaced_whole() {
        let mut draft = SignupDraft::default();
        draft.apply(DraftUpdate::Symptoms(SymptomSelections {
            hot_flashes: true,
            other_symptoms: vec!["headaches".into()],
            ..Default::default()
        }));
        draft.apply(DraftUpdate::Symptoms(SymptomSelections {
            night_sweats: true,
            ..Default::default()
        }));

        let symptoms = draft.symptoms.unwrap();
        assert!(symptoms.night_sweats);
        // The first update's selections are gone — no deep merge.
        assert!(!symptoms.hot_flashes);
        assert!(symptoms.other_symptoms.is_empty());
    }

    #[test]
    fn draft_serde_roundtrip() {
        let mut draft = SignupDraft::default();
        draft.apply(DraftUpdate::FirstName("Alice".into()));
        draft.apply(DraftUpdate::Email("alice@example.com".into()));
        draft.apply(DraftUpdate::Phase(MenopausePhase::PreMenopause));
        draft.apply(DraftUpdate::CycleInfo(CycleInfo {
            average_cycle_length: Some(28),
            period_duration: Some(5),
            last_period_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            is_regular: Some(true),
        }));

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: SignupDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
    }

    #[test]
    fn empty_selections_have_nothing_selected() {
        assert!(!SymptomSelections::default().has_any());
        assert!(!ConcernSelections::default().has_any());
        assert!(
            SymptomSelections {
                other_symptoms: vec!["tinnitus".into()],
                ..Default::default()
            }
            .has_any()
        );
        assert!(
            ConcernSelections {
                career: true,
                ..Default::default()
            }
            .has_any()
        );
    }

    #[test]
    fn draft_update_serde_shape() {
        let update = DraftUpdate::FirstName("Jane".into());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["field"], "first_name");
        assert_eq!(json["value"], "Jane");
    }
}
