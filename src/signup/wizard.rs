//! The signup wizard — a state machine over the visible step sequence.
//!
//! The wizard owns the draft for the duration of one signup session. It
//! delegates per-step checks to the validation rules, recomputes the visible
//! step list on every use, persists progress after each edit, and hands the
//! finished draft to the account-creation collaborator exactly once.

use std::sync::Arc;

use serde::Serialize;

use crate::account::AccountBackend;
use crate::signup::model::{DraftUpdate, SignupDraft};
use crate::signup::progress::ProgressStore;
use crate::signup::steps::{SignupStep, visible_steps};
use crate::signup::validation::{validate_complete, validate_step};

/// Where the wizard currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardState {
    Editing { step: SignupStep },
    Reviewing,
    Submitting,
    Done { user_id: String },
}

/// Outcome of a navigation or submission attempt.
///
/// `error` carries the first blocking error (or the collaborator's message
/// verbatim); `warnings` are advisory and never block.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub state: WizardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// The wizard controller.
pub struct SignupWizard {
    draft: SignupDraft,
    state: WizardState,
    progress: ProgressStore,
    accounts: Arc<dyn AccountBackend>,
}

impl SignupWizard {
    /// Mount the wizard, restoring saved progress when a fresh draft exists.
    ///
    /// A restored draft with a phase resumes at the highest-numbered step of
    /// that phase's visible list; earlier steps are not re-validated here,
    /// only by the complete-draft gate at submission.
    pub async fn start(progress: ProgressStore, accounts: Arc<dyn AccountBackend>) -> Self {
        let (draft, step) = match progress.load().await {
            Some(draft) => {
                let step = match draft.phase {
                    Some(phase) => visible_steps(Some(phase))
                        .last()
                        .copied()
                        .unwrap_or(SignupStep::BasicInfo),
                    None => SignupStep::BasicInfo,
                };
                (draft, step)
            }
            None => (SignupDraft::default(), SignupStep::BasicInfo),
        };

        Self {
            draft,
            state: WizardState::Editing { step },
            progress,
            accounts,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn draft(&self) -> &SignupDraft {
        &self.draft
    }

    /// The step currently being edited, if any.
    pub fn current_step(&self) -> Option<SignupStep> {
        match self.state {
            WizardState::Editing { step } => Some(step),
            _ => None,
        }
    }

    /// The ordered steps applicable to the current draft. Never cached.
    pub fn visible(&self) -> Vec<SignupStep> {
        visible_steps(self.draft.phase)
    }

    /// Display progress in percent. Recomputed on every call — the
    /// denominator changes whenever the phase selection does.
    pub fn progress_percent(&self) -> f32 {
        match self.state {
            WizardState::Editing { step } => {
                let visible = self.visible();
                match visible.iter().position(|s| *s == step) {
                    Some(index) => (index + 1) as f32 / visible.len() as f32 * 100.0,
                    None => 0.0,
                }
            }
            _ => 100.0,
        }
    }

    /// Apply one draft update and persist progress (best-effort).
    ///
    /// If a phase change hides the step being edited, the wizard falls back
    /// to the nearest preceding visible step so later navigation stays
    /// well-defined.
    pub async fn update(&mut self, update: DraftUpdate) {
        match self.state {
            WizardState::Editing { .. } | WizardState::Reviewing => {}
            _ => return,
        }

        self.draft.apply(update);

        if let WizardState::Editing { step } = self.state {
            let visible = self.visible();
            if !visible.contains(&step) {
                let fallback = visible
                    .iter()
                    .copied()
                    .filter(|s| s.id() < step.id())
                    .next_back()
                    .unwrap_or(SignupStep::BasicInfo);
                self.state = WizardState::Editing { step: fallback };
            }
        }

        self.progress.save(&self.draft).await;
    }

    /// Validate the current step and advance if it passes.
    ///
    /// The last visible step advances into review.
    pub fn next(&mut self) -> Transition {
        let WizardState::Editing { step } = self.state else {
            return self.snapshot(None, Vec::new());
        };

        let report = validate_step(step, &self.draft);
        if !report.is_valid {
            return self.snapshot(report.errors.first().cloned(), report.warnings);
        }

        let visible = self.visible();
        let Some(index) = visible.iter().position(|s| *s == step) else {
            return self.snapshot(None, report.warnings);
        };

        self.state = match visible.get(index + 1) {
            Some(next_step) => WizardState::Editing { step: *next_step },
            None => WizardState::Reviewing,
        };
        self.snapshot(None, report.warnings)
    }

    /// Move to the prior visible step; stays put at the first one.
    pub fn previous(&mut self) -> Transition {
        if let WizardState::Editing { step } = self.state {
            let visible = self.visible();
            if let Some(index) = visible.iter().position(|s| *s == step) {
                if index > 0 {
                    self.state = WizardState::Editing {
                        step: visible[index - 1],
                    };
                }
            }
        }
        self.snapshot(None, Vec::new())
    }

    /// Jump directly to a step — allowed only for currently-visible steps,
    /// from editing or from the review screen.
    pub fn jump_to(&mut self, step: SignupStep) -> Transition {
        match self.state {
            WizardState::Editing { .. } | WizardState::Reviewing => {
                if self.visible().contains(&step) {
                    self.state = WizardState::Editing { step };
                }
            }
            _ => {}
        }
        self.snapshot(None, Vec::new())
    }

    /// Run the final gate and hand the draft to the account collaborator.
    ///
    /// Re-entry while a submission is in flight is a no-op. On success the
    /// saved progress is cleared and the wizard is done; on failure the
    /// wizard returns to review with the collaborator's message verbatim and
    /// the draft untouched, so the user can retry.
    pub async fn complete(&mut self) -> Transition {
        match self.state {
            WizardState::Reviewing => {}
            // Includes Submitting: a second invocation must be a no-op.
            _ => return self.snapshot(None, Vec::new()),
        }

        let report = validate_complete(&self.draft);
        if !report.is_valid {
            return self.snapshot(report.errors.first().cloned(), report.warnings);
        }

        self.state = WizardState::Submitting;
        match self.accounts.complete_signup(&self.draft).await {
            Ok(outcome) => {
                self.progress.clear().await;
                self.state = WizardState::Done {
                    user_id: outcome.user_id,
                };
                self.snapshot(None, report.warnings)
            }
            Err(e) => {
                self.state = WizardState::Reviewing;
                self.snapshot(Some(e.to_string()), report.warnings)
            }
        }
    }

    fn snapshot(&self, error: Option<String>, warnings: Vec<String>) -> Transition {
        Transition {
            state: self.state.clone(),
            error,
            warnings,
        }
    }
}
