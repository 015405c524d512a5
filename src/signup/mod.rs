//! The signup wizard — conditional multi-step flow engine.
//!
//! Split the way the flow is layered: pure step/visibility rules and
//! validation at the bottom, progress persistence above them, and the
//! state-machine controller on top. REST handlers in [`routes`] drive the
//! controller; any other presentation layer could do the same.

pub mod model;
pub mod progress;
pub mod routes;
pub mod steps;
pub mod validation;
pub mod wizard;

pub use model::{DraftUpdate, MenopausePhase, SignupDraft};
pub use progress::ProgressStore;
pub use steps::{SignupStep, visible_steps};
pub use validation::{evaluate_password_strength, validate_complete, validate_step};
pub use wizard::{SignupWizard, Transition, WizardState};
