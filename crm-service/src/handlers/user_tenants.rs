//! Tenant membership endpoints backing the organisation-switch flow.

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{SetPrimaryTenantRequest, UserTenantResponse};
use crate::AppState;
use crm_core::error::AppError;
use crm_core::middleware::tenant::tenant_cookie;

#[derive(Debug, Deserialize)]
pub struct UserTenantsQuery {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// List the tenants a user belongs to, primary first.
///
/// GET /api/user/tenants?userId=<uuid>
pub async fn list_user_tenants(
    State(state): State<AppState>,
    Query(query): Query<UserTenantsQuery>,
) -> Result<Json<Vec<UserTenantResponse>>, AppError> {
    let memberships = state.db.list_tenants_for_user(query.user_id).await?;
    Ok(Json(memberships.into_iter().map(Into::into).collect()))
}

/// Set a user's primary tenant and pin it in the tenant cookie, so the
/// resolver picks it up on subsequent requests.
///
/// POST /api/user/tenants/primary
pub async fn set_primary_tenant(
    State(state): State<AppState>,
    Json(req): Json<SetPrimaryTenantRequest>,
) -> Result<Response, AppError> {
    // The tenant must exist before it can be anyone's primary.
    let tenant = state
        .db
        .find_tenant(&req.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Tenant not found")))?;

    if !tenant.is_active() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Tenant '{}' is not active",
            req.tenant_id
        )));
    }

    state
        .db
        .set_primary_tenant(req.user_id, &req.tenant_id)
        .await?;

    let response = (
        StatusCode::OK,
        [(header::SET_COOKIE, tenant_cookie(&req.tenant_id))],
        Json(UserTenantResponse {
            tenant_id: tenant.tenant_id,
            name: tenant.name,
            domain: tenant.domain,
            status: tenant.status,
            is_primary: true,
        }),
    );

    Ok(response.into_response())
}
