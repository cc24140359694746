//! Tenant endpoints: the resolved-tenant record for clients, plus
//! administrative provisioning and lifecycle operations.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

use crate::models::{
    CreateTenantRequest, Tenant, TenantResponse, TenantStatus, UpdateTenantRequest,
};
use crate::AppState;
use crm_core::error::AppError;
use crm_core::middleware::tenant::TenantContext;

/// Cache key for the resolved tenant record; the cache itself is
/// partitioned by tenant, so the key name is shared.
const TENANT_RECORD_KEY: &str = "tenant:record";
const TENANT_RECORD_TTL: Duration = Duration::from_secs(30);

/// Return the resolved tenant's record.
///
/// GET /api/tenant
///
/// Consumed by the client-side tenant provider. Resolution is syntactic;
/// this is where a made-up tenant identifier finally surfaces as a 404.
pub async fn get_current_tenant(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<TenantResponse>, AppError> {
    if let Some(cached) = state.cache.get(&tenant.tenant_id, TENANT_RECORD_KEY) {
        if let Ok(record) = serde_json::from_value::<Tenant>(cached) {
            return Ok(Json(record.into()));
        }
    }

    let record = state
        .db
        .find_tenant(&tenant.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Tenant not found")))?;

    if let Ok(value) = serde_json::to_value(&record) {
        state.cache.put(
            &tenant.tenant_id,
            TENANT_RECORD_KEY,
            value,
            Some(TENANT_RECORD_TTL),
        );
    }

    Ok(Json(record.into()))
}

/// Provision a new tenant.
///
/// POST /api/tenants
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), AppError> {
    req.validate()?;

    let tenant = state.db.create_tenant(&req).await?;

    Ok((StatusCode::CREATED, Json(tenant.into())))
}

#[derive(Debug, Deserialize)]
pub struct ListTenantsQuery {
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

fn default_page_size() -> i32 {
    50
}

/// List tenants (administrative).
///
/// GET /api/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    Query(query): Query<ListTenantsQuery>,
) -> Result<Json<Vec<TenantResponse>>, AppError> {
    let tenants = state.db.list_tenants(query.page_size).await?;
    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// Get a tenant by identifier.
///
/// GET /api/tenants/:tenant_id
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantResponse>, AppError> {
    let tenant = state
        .db
        .find_tenant(&tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Tenant not found")))?;

    Ok(Json(tenant.into()))
}

/// Update a tenant's settings or status.
///
/// PATCH /api/tenants/:tenant_id
pub async fn update_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(req): Json<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, AppError> {
    req.validate()?;

    if let Some(ref status) = req.status {
        if TenantStatus::parse(status).is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown tenant status '{}'",
                status
            )));
        }
    }

    let tenant = state
        .db
        .update_tenant(&tenant_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Tenant not found")))?;

    // Drop any cached copy of the old record.
    state.cache.clear_tenant(&tenant_id);

    Ok(Json(tenant.into()))
}

/// Soft-delete a tenant.
///
/// DELETE /api/tenants/:tenant_id
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_tenant(&tenant_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Tenant not found")));
    }
    state.cache.clear_tenant(&tenant_id);
    Ok(StatusCode::NO_CONTENT)
}
