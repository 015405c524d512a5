//! REST endpoints for the dashboard profile and daily symptom check-in.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::profile::{ProfileCell, ProfileData, SymptomCell, SymptomLog};

/// Shared state for the dashboard routes.
#[derive(Clone)]
pub struct DashboardRouteState {
    pub profile: Arc<ProfileCell>,
    pub symptoms: Arc<SymptomCell>,
}

/// GET /api/profile
async fn get_profile(State(state): State<DashboardRouteState>) -> Json<ProfileData> {
    Json(state.profile.get())
}

/// PUT /api/profile
async fn put_profile(
    State(state): State<DashboardRouteState>,
    Json(profile): Json<ProfileData>,
) -> Json<ProfileData> {
    state.profile.set(profile).await;
    Json(state.profile.get())
}

/// GET /api/symptoms
async fn get_symptoms(State(state): State<DashboardRouteState>) -> Json<SymptomLog> {
    Json(state.symptoms.get())
}

/// PUT /api/symptoms
async fn put_symptoms(
    State(state): State<DashboardRouteState>,
    Json(log): Json<SymptomLog>,
) -> Json<SymptomLog> {
    state.symptoms.set(log).await;
    Json(state.symptoms.get())
}

/// Build the dashboard REST routes.
pub fn dashboard_routes(state: DashboardRouteState) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/symptoms", get(get_symptoms).put(put_symptoms))
        .with_state(state)
}
