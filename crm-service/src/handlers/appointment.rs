//! Appointment scheduling handlers, tenant-scoped like the patient CRUD.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    AppointmentResponse, AppointmentStatus, CreateAppointmentRequest, ListAppointmentsFilter,
    UpdateAppointmentRequest,
};
use crate::AppState;
use crm_core::error::AppError;
use crm_core::middleware::tenant::TenantContext;

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    req.validate()?;

    if req.ends_utc <= req.starts_utc {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Appointment must end after it starts"
        )));
    }

    let appointment = state
        .db
        .create_appointment(&tenant.tenant_id, &req)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(filter): Query<ListAppointmentsFilter>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = state
        .db
        .list_appointments(&tenant.tenant_id, &filter)
        .await?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

/// GET /api/appointments/:appointment_id
pub async fn get_appointment(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state
        .db
        .get_appointment(&tenant.tenant_id, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Appointment not found")))?;

    Ok(Json(appointment.into()))
}

/// PATCH /api/appointments/:appointment_id
pub async fn update_appointment(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    req.validate()?;

    if let Some(ref status) = req.status {
        if AppointmentStatus::parse(status).is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown appointment status '{}'",
                status
            )));
        }
    }

    let appointment = state
        .db
        .update_appointment(&tenant.tenant_id, appointment_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Appointment not found")))?;

    Ok(Json(appointment.into()))
}

/// DELETE /api/appointments/:appointment_id
pub async fn delete_appointment(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .db
        .delete_appointment(&tenant.tenant_id, appointment_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Appointment not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
