use std::sync::Arc;

use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use menoguide::account::{AccountService, AuthBackend, StubAuth};
use menoguide::config::AppConfig;
use menoguide::profile::routes::{DashboardRouteState, dashboard_routes};
use menoguide::profile::{profile_cell, symptom_cell};
use menoguide::signup::routes::{SignupRouteState, signup_routes};
use menoguide::signup::{ProgressStore, SignupWizard};
use menoguide::store::{LibSqlStore, SettingsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🌸 MenoGuide v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);
    eprintln!("   Database: {}", config.db_path.display());

    // ── Persistence ─────────────────────────────────────────────────────
    let store: Arc<dyn SettingsStore> = Arc::new(LibSqlStore::new_local(&config.db_path).await?);

    // ── Accounts ────────────────────────────────────────────────────────
    let auth: Arc<dyn AuthBackend> = Arc::new(StubAuth::new());
    let accounts = Arc::new(AccountService::new(auth, Arc::clone(&store)));

    // ── Signup wizard (resumes saved progress, if fresh) ────────────────
    let progress = ProgressStore::new(Arc::clone(&store));
    let wizard = SignupWizard::start(progress, accounts).await;

    // ── Dashboard state containers ──────────────────────────────────────
    let profile = Arc::new(profile_cell(Arc::clone(&store)).await);
    let symptoms = Arc::new(symptom_cell(Arc::clone(&store)).await);

    let app = signup_routes(SignupRouteState {
        wizard: Arc::new(Mutex::new(wizard)),
    })
    .merge(dashboard_routes(DashboardRouteState { profile, symptoms }))
    .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
