use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domain::UserRoleType;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod demo;
mod error;
mod footprints;
mod observability;
mod observatories;
mod schedules;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn identity(&self) -> &Arc<dyn crate::services::IdentityService> {
        &self.shared.identity_service
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn crate::services::CatalogService> {
        &self.shared.catalog_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();
    let public_dir = state.config().server.public_dir.clone();

    let api_router = Router::new()
        .route("/hello", get(demo::hello))
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::issue_token))
        .route("/auth/verify", post(auth::verify))
        .route(
            "/auth/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
        .merge(account_routes(&state))
        .merge(admin_routes(&state))
        .merge(read_routes(&state))
        .merge(observatory_editor_routes(&state))
        .merge(schedule_editor_routes(&state))
        .merge(observation_editor_routes(&state));

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v0", api_router)
        .route("/rand", get(demo::rand_number))
        .route("/randData", get(demo::rand_data))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .merge(assets::router(Path::new(&public_dir)))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}

fn scoped(
    state: &Arc<AppState>,
    scope: Option<UserRoleType>,
    routes: Router<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    routes.route_layer(middleware::from_fn_with_state(
        (state.clone(), scope),
        auth::require_scope,
    ))
}

/// Any valid token.
fn account_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        None,
        Router::new()
            .route("/auth/me", get(auth::current_user))
            .route("/auth/password", put(auth::change_password)),
    )
}

/// Reset tokens are credentials, so only admins may mint them for another account.
fn admin_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        Some(UserRoleType::Admin),
        Router::new().route("/auth/password-reset", post(auth::issue_password_reset)),
    )
}

fn read_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        Some(UserRoleType::Viewer),
        Router::new()
            .route("/observatories", get(observatories::list_observatories))
            .route("/observatories/{id}", get(observatories::get_observatory))
            .route(
                "/observatories/{id}/telescopes",
                get(observatories::list_telescopes),
            )
            .route("/telescopes/{id}", get(observatories::get_telescope))
            .route(
                "/telescopes/{id}/instruments",
                get(observatories::list_instruments),
            )
            .route("/instruments/{id}", get(observatories::get_instrument))
            .route(
                "/instruments/{id}/schedules",
                get(observatories::list_schedules),
            )
            .route("/schedules/{id}", get(schedules::get_schedule))
            .route(
                "/schedules/{id}/observations",
                get(schedules::list_observations),
            )
            .route("/observations/{id}", get(schedules::get_observation))
            .route(
                "/observations/{id}/observatory",
                get(schedules::observatory_for_observation),
            )
            .route("/footprints", get(footprints::list_footprints))
            .route("/footprints/{id}", get(footprints::get_footprint)),
    )
}

fn observatory_editor_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        Some(UserRoleType::ObservatoryEditor),
        Router::new()
            .route("/observatories", post(observatories::create_observatory))
            .route(
                "/observatories/{id}",
                put(observatories::rename_observatory),
            )
            .route(
                "/observatories/{id}",
                delete(observatories::delete_observatory),
            )
            .route("/telescopes", post(observatories::create_telescope))
            .route("/telescopes/{id}", delete(observatories::delete_telescope))
            .route("/instruments", post(observatories::create_instrument))
            .route(
                "/instruments/{id}",
                delete(observatories::delete_instrument),
            )
            .route("/footprints", post(footprints::create_footprint))
            .route("/footprints/{id}", delete(footprints::delete_footprint)),
    )
}

fn schedule_editor_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        Some(UserRoleType::ScheduleEditor),
        Router::new()
            .route("/schedules", post(schedules::create_schedule))
            .route(
                "/schedules/{id}/status",
                put(schedules::update_schedule_status),
            )
            .route("/schedules/{id}", delete(schedules::delete_schedule)),
    )
}

fn observation_editor_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    scoped(
        state,
        Some(UserRoleType::ObservationEditor),
        Router::new()
            .route("/observations", post(schedules::create_observation))
            .route(
                "/observations/{id}/status",
                put(schedules::update_observation_status),
            )
            .route(
                "/observations/{id}/extension",
                put(schedules::set_observation_extension),
            )
            .route("/observations/{id}", delete(schedules::delete_observation)),
    )
}
