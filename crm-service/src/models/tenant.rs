//! Tenant model - root of multi-tenancy.
//!
//! The tenant identifier is an opaque, stable string (a slug chosen at
//! provisioning time). Every business row carries exactly one tenant
//! identifier, stamped at creation and never changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Tenant status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(TenantStatus::Active),
            "inactive" => Some(TenantStatus::Inactive),
            "suspended" => Some(TenantStatus::Suspended),
            _ => None,
        }
    }
}

/// Tenant entity. Soft-deleted via `deleted_utc`, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub tenant_id: String,
    pub name: String,
    pub domain: Option<String>,
    pub settings: serde_json::Value,
    pub features: Vec<String>,
    pub status: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active.as_str()
    }
}

/// Request to provision a tenant.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 64))]
    pub tenant_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub domain: Option<String>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Request to update tenant settings or status.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub domain: Option<String>,
    pub settings: Option<serde_json::Value>,
    pub features: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Tenant response for API. Field names match what the client-side
/// tenant provider deserializes.
#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub settings: serde_json::Value,
    pub features: Vec<String>,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.tenant_id,
            name: t.name,
            domain: t.domain,
            settings: t.settings,
            features: t.features,
            status: t.status,
            created_utc: t.created_utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            TenantStatus::Active,
            TenantStatus::Inactive,
            TenantStatus::Suspended,
        ] {
            assert_eq!(TenantStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TenantStatus::parse("archived"), None);
    }
}
