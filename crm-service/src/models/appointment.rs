//! Appointment scheduling entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Appointment status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub tenant_id: String,
    pub patient_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_utc: DateTime<Utc>,
    pub ends_utc: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    pub location: Option<String>,
    pub starts_utc: DateTime<Utc>,
    pub ends_utc: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub location: Option<String>,
    pub starts_utc: Option<DateTime<Utc>>,
    pub ends_utc: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Listing filter: date range, patient, cursor pagination.
#[derive(Debug, Deserialize)]
pub struct ListAppointmentsFilter {
    pub from_utc: Option<DateTime<Utc>>,
    pub to_utc: Option<DateTime<Utc>>,
    pub patient_id: Option<Uuid>,
    #[serde(default = "default_page_size")]
    pub page_size: i32,
    pub page_token: Option<Uuid>,
}

fn default_page_size() -> i32 {
    50
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub appointment_id: Uuid,
    pub tenant_id: String,
    pub patient_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_utc: DateTime<Utc>,
    pub ends_utc: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            appointment_id: a.appointment_id,
            tenant_id: a.tenant_id,
            patient_id: a.patient_id,
            title: a.title,
            location: a.location,
            starts_utc: a.starts_utc,
            ends_utc: a.ends_utc,
            status: a.status,
            notes: a.notes,
            created_utc: a.created_utc,
        }
    }
}
