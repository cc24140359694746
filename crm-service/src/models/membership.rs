//! User-to-tenant membership, backing the tenant-switch flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's membership in a tenant, joined with the tenant record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserTenantMembership {
    pub tenant_id: String,
    pub name: String,
    pub domain: Option<String>,
    pub status: String,
    pub is_primary: bool,
    pub created_utc: DateTime<Utc>,
}

/// Request to set a user's primary tenant. The response pins the tenant
/// cookie so subsequent requests resolve to it.
#[derive(Debug, Deserialize)]
pub struct SetPrimaryTenantRequest {
    pub user_id: Uuid,
    pub tenant_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserTenantResponse {
    pub tenant_id: String,
    pub name: String,
    pub domain: Option<String>,
    pub status: String,
    pub is_primary: bool,
}

impl From<UserTenantMembership> for UserTenantResponse {
    fn from(m: UserTenantMembership) -> Self {
        Self {
            tenant_id: m.tenant_id,
            name: m.name,
            domain: m.domain,
            status: m.status,
            is_primary: m.is_primary,
        }
    }
}
