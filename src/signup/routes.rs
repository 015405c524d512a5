//! REST endpoints driving the signup wizard.
//!
//! One wizard instance sits behind a mutex; every handler locks it for the
//! duration of the request, which serializes all transitions (including the
//! full account-creation call during `complete`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::signup::model::{DraftUpdate, SignupDraft};
use crate::signup::steps::SignupStep;
use crate::signup::wizard::{SignupWizard, WizardState};

/// Shared state for the signup routes.
#[derive(Clone)]
pub struct SignupRouteState {
    pub wizard: Arc<Mutex<SignupWizard>>,
}

/// Step metadata for the step indicator.
#[derive(Debug, Serialize)]
struct StepInfo {
    id: u8,
    title: &'static str,
    description: &'static str,
}

impl From<SignupStep> for StepInfo {
    fn from(step: SignupStep) -> Self {
        Self {
            id: step.id(),
            title: step.title(),
            description: step.description(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    state: WizardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_step: Option<StepInfo>,
    visible_steps: Vec<StepInfo>,
    progress_percent: f32,
    draft: SignupDraft,
}

fn status_of(wizard: &SignupWizard) -> StatusResponse {
    StatusResponse {
        state: wizard.state().clone(),
        current_step: wizard.current_step().map(StepInfo::from),
        visible_steps: wizard.visible().into_iter().map(StepInfo::from).collect(),
        progress_percent: wizard.progress_percent(),
        draft: wizard.draft().clone(),
    }
}

/// GET /api/signup/status
async fn get_status(State(state): State<SignupRouteState>) -> impl IntoResponse {
    let wizard = state.wizard.lock().await;
    Json(status_of(&wizard))
}

/// POST /api/signup/update
async fn post_update(
    State(state): State<SignupRouteState>,
    Json(update): Json<DraftUpdate>,
) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    wizard.update(update).await;
    Json(status_of(&wizard))
}

/// POST /api/signup/next
async fn post_next(State(state): State<SignupRouteState>) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    Json(wizard.next())
}

/// POST /api/signup/previous
async fn post_previous(State(state): State<SignupRouteState>) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    Json(wizard.previous())
}

/// POST /api/signup/jump/{id}
///
/// Unknown step numbers are 404; known-but-hidden steps leave the wizard
/// where it is (the transition echoes the unchanged state).
async fn post_jump(
    State(state): State<SignupRouteState>,
    Path(id): Path<u8>,
) -> impl IntoResponse {
    let Some(step) = SignupStep::from_id(id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("no such step: {id}")})),
        )
            .into_response();
    };
    let mut wizard = state.wizard.lock().await;
    Json(wizard.jump_to(step)).into_response()
}

/// POST /api/signup/complete
async fn post_complete(State(state): State<SignupRouteState>) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    Json(wizard.complete().await)
}

/// Build the signup REST routes.
pub fn signup_routes(state: SignupRouteState) -> Router {
    Router::new()
        .route("/api/signup/status", get(get_status))
        .route("/api/signup/update", post(post_update))
        .route("/api/signup/next", post(post_next))
        .route("/api/signup/previous", post(post_previous))
        .route("/api/signup/jump/{id}", post(post_jump))
        .route("/api/signup/complete", post(post_complete))
        .with_state(state)
}
