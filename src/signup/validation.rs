//! Validation rules for signup steps and the final submission gate.
//!
//! All functions here are pure. Error strings are shown to the user verbatim
//! (the UI displays the first blocking error), so they are part of the
//! contract and fixed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::signup::model::{MenopausePhase, SignupDraft};
use crate::signup::steps::SignupStep;

/// `local@domain.tld` — no whitespace or `@` inside the parts, at least one
/// dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Characters counted as "special" by the password score.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Outcome of validating a step or the complete draft.
///
/// Produced fresh on every call, never persisted. `errors` block progression;
/// `warnings` are advisory only.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Password score with per-criterion feedback.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordStrength {
    /// 0..=5, one point per satisfied criterion.
    pub score: u8,
    /// One fixed feedback line per unmet criterion, in criterion order.
    pub feedback: Vec<String>,
    pub is_strong: bool,
}

/// Score a password against the five fixed criteria.
pub fn evaluate_password_strength(password: &str) -> PasswordStrength {
    let mut score = 0u8;
    let mut feedback = Vec::new();

    if password.len() >= 8 {
        score += 1;
    } else {
        feedback.push("At least 8 characters".to_string());
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    } else {
        feedback.push("At least one uppercase letter".to_string());
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    } else {
        feedback.push("At least one lowercase letter".to_string());
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    } else {
        feedback.push("At least one number".to_string());
    }

    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 1;
    } else {
        feedback.push("At least one special character".to_string());
    }

    PasswordStrength {
        score,
        feedback,
        is_strong: score >= 4,
    }
}

/// Check the email shape.
pub fn validate_email(email: &str) -> ValidationReport {
    if EMAIL_RE.is_match(email) {
        ValidationReport::new(Vec::new(), Vec::new())
    } else {
        ValidationReport::new(
            vec!["Please enter a valid email address".to_string()],
            Vec::new(),
        )
    }
}

fn is_blank(field: Option<&String>) -> bool {
    field.map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// Validate a single step against the current draft.
pub fn validate_step(step: SignupStep, draft: &SignupDraft) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match step {
        SignupStep::BasicInfo => {
            if is_blank(draft.first_name.as_ref()) {
                errors.push("First name is required".to_string());
            }
            if is_blank(draft.last_name.as_ref()) {
                errors.push("Last name is required".to_string());
            }
            if is_blank(draft.email.as_ref()) {
                errors.push("Email is required".to_string());
            }
            if is_blank(draft.password.as_ref()) {
                errors.push("Password is required".to_string());
            }

            if let Some(email) = draft.email.as_deref() {
                if !email.is_empty() {
                    errors.extend(validate_email(email).errors);
                }
            }

            if let Some(password) = draft.password.as_deref() {
                if !password.is_empty() && !evaluate_password_strength(password).is_strong {
                    warnings.push("Consider strengthening your password".to_string());
                }
            }
        }

        SignupStep::Phase => {
            if draft.phase.is_none() {
                errors.push("Please select your menopause phase".to_string());
            }
        }

        // Only meaningful for pre-menopause; for every other phase the step
        // is not part of the visible list at all.
        SignupStep::CycleInfo => {
            if draft.phase == Some(MenopausePhase::PreMenopause) {
                let cycle = draft.cycle_info.clone().unwrap_or_default();
                if cycle.average_cycle_length.is_none() {
                    errors.push("Average cycle length is required".to_string());
                }
                if cycle.period_duration.is_none() {
                    errors.push("Period duration is required".to_string());
                }
                if cycle.last_period_date.is_none() {
                    errors.push("Last period date is required".to_string());
                }
            }
        }

        SignupStep::Symptoms => {
            let has_any = draft.symptoms.as_ref().is_some_and(|s| s.has_any());
            if !has_any {
                warnings
                    .push("Selecting symptoms helps us personalize your experience".to_string());
            }
        }

        SignupStep::Concerns => {
            let has_any = draft.concerns.as_ref().is_some_and(|c| c.has_any());
            if !has_any {
                warnings.push("Selecting concerns helps us provide relevant support".to_string());
            }
        }

        SignupStep::Preferences => {}
    }

    ValidationReport::new(errors, warnings)
}

/// The authoritative gate before submission.
///
/// Re-checks every required field regardless of which steps were actually
/// visited.
pub fn validate_complete(draft: &SignupDraft) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if is_blank(draft.first_name.as_ref()) {
        errors.push("First name is required".to_string());
    }
    if is_blank(draft.last_name.as_ref()) {
        errors.push("Last name is required".to_string());
    }
    if is_blank(draft.email.as_ref()) {
        errors.push("Email is required".to_string());
    }
    if is_blank(draft.password.as_ref()) {
        errors.push("Password is required".to_string());
    }
    if draft.phase.is_none() {
        errors.push("Menopause phase is required".to_string());
    }

    errors.extend(validate_email(draft.email.as_deref().unwrap_or_default()).errors);

    let strength = evaluate_password_strength(draft.password.as_deref().unwrap_or_default());
    if !strength.is_strong {
        warnings.push("Consider strengthening your password for better security".to_string());
    }

    if draft.phase == Some(MenopausePhase::PreMenopause) {
        match draft.cycle_info.as_ref() {
            None => errors.push("Cycle information is required for pre-menopause".to_string()),
            Some(cycle) => {
                if cycle.average_cycle_length.is_none() {
                    errors.push("Average cycle length is required".to_string());
                }
                if cycle.period_duration.is_none() {
                    errors.push("Period duration is required".to_string());
                }
                if cycle.last_period_date.is_none() {
                    errors.push("Last period date is required".to_string());
                }
            }
        }
    }

    ValidationReport::new(errors, warnings)
}
