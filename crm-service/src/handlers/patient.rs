//! Patient CRUD handlers. Every operation is scoped to the request's
//! resolved tenant via the `TenantContext` extractor.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreatePatientRequest, ListPatientsFilter, PatientResponse, UpdatePatientRequest,
};
use crate::AppState;
use crm_core::error::AppError;
use crm_core::middleware::tenant::TenantContext;

/// POST /api/patients
pub async fn create_patient(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    req.validate()?;

    let patient = state.db.create_patient(&tenant.tenant_id, &req).await?;

    Ok((StatusCode::CREATED, Json(patient.into())))
}

/// GET /api/patients
pub async fn list_patients(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(filter): Query<ListPatientsFilter>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let patients = state.db.list_patients(&tenant.tenant_id, &filter).await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

/// GET /api/patients/:patient_id
pub async fn get_patient(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = state
        .db
        .get_patient(&tenant.tenant_id, patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient not found")))?;

    Ok(Json(patient.into()))
}

/// PATCH /api/patients/:patient_id
pub async fn update_patient(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    req.validate()?;

    // Zero rows affected covers both "no such patient" and "belongs to
    // another tenant"; neither is distinguished to the caller.
    let patient = state
        .db
        .update_patient(&tenant.tenant_id, patient_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient not found")))?;

    Ok(Json(patient.into()))
}

/// DELETE /api/patients/:patient_id
pub async fn delete_patient(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .db
        .delete_patient(&tenant.tenant_id, patient_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Patient not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
