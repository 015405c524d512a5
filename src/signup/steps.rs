//! Signup steps and the visibility policy.
//!
//! Six fixed steps; which of them apply depends on the selected menopause
//! phase. Cycle information only makes sense before menopause, so step 3 is
//! hidden for every other phase, and until a phase is chosen the wizard shows
//! nothing past phase selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signup::model::MenopausePhase;

/// One of the six fixed signup steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStep {
    BasicInfo,
    Phase,
    CycleInfo,
    Symptoms,
    Concerns,
    Preferences,
}

impl SignupStep {
    pub fn all() -> &'static [SignupStep] {
        &[
            SignupStep::BasicInfo,
            SignupStep::Phase,
            SignupStep::CycleInfo,
            SignupStep::Symptoms,
            SignupStep::Concerns,
            SignupStep::Preferences,
        ]
    }

    /// The step's 1-based display number.
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Look a step up by its display number.
    pub fn from_id(id: u8) -> Option<SignupStep> {
        Self::all().get(id.checked_sub(1)? as usize).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            SignupStep::BasicInfo => "Basic Information",
            SignupStep::Phase => "Menopause Phase",
            SignupStep::CycleInfo => "Cycle Information",
            SignupStep::Symptoms => "Symptoms",
            SignupStep::Concerns => "Personal Concerns",
            SignupStep::Preferences => "Preferences",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SignupStep::BasicInfo => "Tell us about yourself",
            SignupStep::Phase => "Select your current phase",
            SignupStep::CycleInfo => "Track your menstrual cycle",
            SignupStep::Symptoms => "Identify your symptoms",
            SignupStep::Concerns => "Share your goals",
            SignupStep::Preferences => "Customize your experience",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignupStep::BasicInfo => "basic_info",
            SignupStep::Phase => "phase",
            SignupStep::CycleInfo => "cycle_info",
            SignupStep::Symptoms => "symptoms",
            SignupStep::Concerns => "concerns",
            SignupStep::Preferences => "preferences",
        }
    }
}

impl fmt::Display for SignupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the ordered list of steps applicable for a phase selection.
///
/// Pure decision table. Callers must recompute on every phase change rather
/// than caching the result — the list shrinks and grows with the selection.
pub fn visible_steps(phase: Option<MenopausePhase>) -> Vec<SignupStep> {
    match phase {
        // Nothing past phase selection until a phase is chosen.
        None => vec![SignupStep::BasicInfo, SignupStep::Phase],
        Some(MenopausePhase::PreMenopause) => SignupStep::all().to_vec(),
        Some(_) => SignupStep::all()
            .iter()
            .copied()
            .filter(|s| *s != SignupStep::CycleInfo)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based_and_roundtrip() {
        for (i, step) in SignupStep::all().iter().enumerate() {
            assert_eq!(step.id() as usize, i + 1);
            assert_eq!(SignupStep::from_id(step.id()), Some(*step));
        }
        assert_eq!(SignupStep::from_id(0), None);
        assert_eq!(SignupStep::from_id(7), None);
    }

    #[test]
    fn no_phase_shows_only_first_two_steps() {
        assert_eq!(
            visible_steps(None),
            vec![SignupStep::BasicInfo, SignupStep::Phase]
        );
    }

    #[test]
    fn pre_menopause_shows_all_six_steps() {
        let steps = visible_steps(Some(MenopausePhase::PreMenopause));
        assert_eq!(steps.len(), 6);
        assert!(steps.contains(&SignupStep::CycleInfo));
    }

    #[test]
    fn other_phases_hide_cycle_info() {
        for phase in [MenopausePhase::PeriMenopause, MenopausePhase::PostMenopause] {
            let steps = visible_steps(Some(phase));
            assert_eq!(steps.len(), 5);
            assert!(!steps.contains(&SignupStep::CycleInfo));
            // Order is preserved
            assert_eq!(steps[0], SignupStep::BasicInfo);
            assert_eq!(steps[4], SignupStep::Preferences);
        }
    }

    #[test]
    fn display_matches_serde() {
        for step in SignupStep::all() {
            let json = serde_json::to_string(step).unwrap();
            assert_eq!(json, format!("\"{step}\""));
        }
    }
}
