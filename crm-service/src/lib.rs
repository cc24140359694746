pub mod config;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use crm_core::axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use crm_core::cache::TenantCache;
use crm_core::error::AppError;
use crm_core::middleware::{
    request_id::request_id_middleware, security_headers::security_headers_middleware,
    tenant::tenant_context_middleware, tenant::TenantResolver, tenant::TenantResolverConfig,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CrmConfig;
use crate::services::Database;

#[derive(Clone)]
pub struct AppState {
    pub config: CrmConfig,
    pub db: Database,
    pub cache: Arc<TenantCache>,
}

/// Build the application router.
///
/// Everything under `/api` runs behind the tenant middleware; `/health`
/// is mounted outside it so probes never touch tenant resolution.
pub fn build_router(state: AppState) -> Router {
    let resolver = TenantResolver::new(TenantResolverConfig {
        default_tenant_id: state.config.tenancy.default_tenant_id.clone(),
    });

    let api_routes = Router::new()
        .route("/api/tenant", get(handlers::tenant::get_current_tenant))
        .route(
            "/api/tenants",
            get(handlers::tenant::list_tenants).post(handlers::tenant::create_tenant),
        )
        .route(
            "/api/tenants/:tenant_id",
            get(handlers::tenant::get_tenant)
                .patch(handlers::tenant::update_tenant)
                .delete(handlers::tenant::delete_tenant),
        )
        .route(
            "/api/user/tenants",
            get(handlers::user_tenants::list_user_tenants),
        )
        .route(
            "/api/user/tenants/primary",
            post(handlers::user_tenants::set_primary_tenant),
        )
        .route(
            "/api/patients",
            get(handlers::patient::list_patients).post(handlers::patient::create_patient),
        )
        .route(
            "/api/patients/:patient_id",
            get(handlers::patient::get_patient)
                .patch(handlers::patient::update_patient)
                .delete(handlers::patient::delete_patient),
        )
        .route(
            "/api/appointments",
            get(handlers::appointment::list_appointments)
                .post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/appointments/:appointment_id",
            get(handlers::appointment::get_appointment)
                .patch(handlers::appointment::update_appointment)
                .delete(handlers::appointment::delete_appointment),
        )
        .layer(from_fn_with_state(resolver, tenant_context_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe with a database ping.
///
/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}
