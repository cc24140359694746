//! Tenant-scoped database service.
//!
//! Every read carries a `tenant_id = $1` predicate and every write stamps
//! or matches on the tenant identifier, so a handler holding tenant A can
//! never touch tenant B's rows through this service. An update or soft
//! delete aimed at another tenant's row affects zero rows; callers that
//! need to distinguish "not found" from "not yours" check the returned
//! `Option` / `bool`. Nothing here prevents new code from querying the
//! pool directly; the scoping guarantee holds only for call sites that
//! go through this service.

use crate::config::DatabaseConfig;
use crate::models::{
    Appointment, CreateAppointmentRequest, CreatePatientRequest, CreateTenantRequest,
    ListAppointmentsFilter, ListPatientsFilter, Patient, Tenant, TenantStatus,
    UpdateAppointmentRequest, UpdatePatientRequest, UpdateTenantRequest, UserTenantMembership,
};
use crm_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Calling a scoped operation without a tenant identifier is a
/// programming error; fail fast instead of silently widening the query.
fn require_tenant(tenant_id: &str) -> Result<(), AppError> {
    if tenant_id.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Tenant identifier must not be empty"
        )));
    }
    Ok(())
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "crm-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Raw pool access, for migrations and health checks only. Business
    /// queries go through the scoped methods below.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tenant Operations
    // -------------------------------------------------------------------------

    /// Provision a new tenant.
    #[instrument(skip(self, input), fields(tenant_id = %input.tenant_id))]
    pub async fn create_tenant(&self, input: &CreateTenantRequest) -> Result<Tenant, AppError> {
        require_tenant(&input.tenant_id)?;

        let settings = input
            .settings
            .clone()
            .unwrap_or_else(|| serde_json::json!({}));

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (tenant_id, name, domain, settings, features, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING tenant_id, name, domain, settings, features, status,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(&input.tenant_id)
        .bind(&input.name)
        .bind(&input.domain)
        .bind(&settings)
        .bind(&input.features)
        .bind(TenantStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Tenant '{}' already exists",
                    input.tenant_id
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create tenant: {}", e)),
        })?;

        info!(tenant_id = %tenant.tenant_id, name = %tenant.name, "Tenant provisioned");

        Ok(tenant)
    }

    /// Find a tenant by identifier.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn find_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>, AppError> {
        require_tenant(tenant_id)?;

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT tenant_id, name, domain, settings, features, status,
                created_utc, updated_utc, deleted_utc
            FROM tenants
            WHERE tenant_id = $1 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find tenant: {}", e)))?;

        Ok(tenant)
    }

    /// List tenants (administrative listing).
    #[instrument(skip(self))]
    pub async fn list_tenants(&self, page_size: i32) -> Result<Vec<Tenant>, AppError> {
        let limit = page_size.clamp(1, 100) as i64;

        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT tenant_id, name, domain, settings, features, status,
                created_utc, updated_utc, deleted_utc
            FROM tenants
            WHERE deleted_utc IS NULL
            ORDER BY tenant_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list tenants: {}", e)))?;

        Ok(tenants)
    }

    /// Update a tenant's settings, features, or status.
    #[instrument(skip(self, input), fields(tenant_id = %tenant_id))]
    pub async fn update_tenant(
        &self,
        tenant_id: &str,
        input: &UpdateTenantRequest,
    ) -> Result<Option<Tenant>, AppError> {
        require_tenant(tenant_id)?;

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = COALESCE($2, name),
                domain = COALESCE($3, domain),
                settings = COALESCE($4, settings),
                features = COALESCE($5, features),
                status = COALESCE($6, status),
                updated_utc = NOW()
            WHERE tenant_id = $1 AND deleted_utc IS NULL
            RETURNING tenant_id, name, domain, settings, features, status,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.domain)
        .bind(&input.settings)
        .bind(&input.features)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update tenant: {}", e)))?;

        if let Some(ref t) = tenant {
            info!(tenant_id = %t.tenant_id, status = %t.status, "Tenant updated");
        }

        Ok(tenant)
    }

    /// Soft-delete a tenant.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn delete_tenant(&self, tenant_id: &str) -> Result<bool, AppError> {
        require_tenant(tenant_id)?;

        let result = sqlx::query(
            r#"
            UPDATE tenants
            SET deleted_utc = NOW(), updated_utc = NOW()
            WHERE tenant_id = $1 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete tenant: {}", e)))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(tenant_id = %tenant_id, "Tenant soft-deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // User-Tenant Membership Operations
    // -------------------------------------------------------------------------

    /// List the tenants a user belongs to, primary first.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_tenants_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserTenantMembership>, AppError> {
        let memberships = sqlx::query_as::<_, UserTenantMembership>(
            r#"
            SELECT t.tenant_id, t.name, t.domain, t.status, ut.is_primary, ut.created_utc
            FROM user_tenants ut
            JOIN tenants t ON t.tenant_id = ut.tenant_id
            WHERE ut.user_id = $1 AND t.deleted_utc IS NULL
            ORDER BY ut.is_primary DESC, t.tenant_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list user tenants: {}", e))
        })?;

        Ok(memberships)
    }

    /// Set a user's primary tenant, creating the membership if needed.
    #[instrument(skip(self), fields(user_id = %user_id, tenant_id = %tenant_id))]
    pub async fn set_primary_tenant(
        &self,
        user_id: Uuid,
        tenant_id: &str,
    ) -> Result<(), AppError> {
        require_tenant(tenant_id)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            UPDATE user_tenants SET is_primary = FALSE
            WHERE user_id = $1 AND is_primary = TRUE
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to clear primary tenant: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_tenants (user_tenant_id, user_id, tenant_id, is_primary)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (user_id, tenant_id)
            DO UPDATE SET is_primary = TRUE
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to set primary tenant: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(user_id = %user_id, tenant_id = %tenant_id, "Primary tenant set");

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Patient Operations
    // -------------------------------------------------------------------------

    /// Create a patient, stamped with the given tenant identifier.
    #[instrument(skip(self, input), fields(tenant_id = %tenant_id))]
    pub async fn create_patient(
        &self,
        tenant_id: &str,
        input: &CreatePatientRequest,
    ) -> Result<Patient, AppError> {
        require_tenant(tenant_id)?;

        let patient_id = Uuid::new_v4();
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (
                patient_id, tenant_id, first_name, last_name, date_of_birth,
                nhs_number, email, phone, address, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active')
            RETURNING patient_id, tenant_id, first_name, last_name, date_of_birth,
                nhs_number, email, phone, address, status,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(patient_id)
        .bind(tenant_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.date_of_birth)
        .bind(&input.nhs_number)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create patient: {}", e)))?;

        info!(patient_id = %patient.patient_id, "Patient created");

        Ok(patient)
    }

    /// Get a patient by ID, scoped to the tenant.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, patient_id = %patient_id))]
    pub async fn get_patient(
        &self,
        tenant_id: &str,
        patient_id: Uuid,
    ) -> Result<Option<Patient>, AppError> {
        require_tenant(tenant_id)?;

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, tenant_id, first_name, last_name, date_of_birth,
                nhs_number, email, phone, address, status,
                created_utc, updated_utc, deleted_utc
            FROM patients
            WHERE tenant_id = $1 AND patient_id = $2 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get patient: {}", e)))?;

        Ok(patient)
    }

    /// List patients for a tenant.
    #[instrument(skip(self, filter), fields(tenant_id = %tenant_id))]
    pub async fn list_patients(
        &self,
        tenant_id: &str,
        filter: &ListPatientsFilter,
    ) -> Result<Vec<Patient>, AppError> {
        require_tenant(tenant_id)?;

        let limit = filter.page_size.clamp(1, 100) as i64;

        let patients = if let Some(cursor) = filter.page_token {
            sqlx::query_as::<_, Patient>(
                r#"
                SELECT patient_id, tenant_id, first_name, last_name, date_of_birth,
                    nhs_number, email, phone, address, status,
                    created_utc, updated_utc, deleted_utc
                FROM patients
                WHERE tenant_id = $1
                  AND deleted_utc IS NULL
                  AND ($2::varchar IS NULL OR status = $2)
                  AND patient_id > $3
                ORDER BY patient_id
                LIMIT $4
                "#,
            )
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Patient>(
                r#"
                SELECT patient_id, tenant_id, first_name, last_name, date_of_birth,
                    nhs_number, email, phone, address, status,
                    created_utc, updated_utc, deleted_utc
                FROM patients
                WHERE tenant_id = $1
                  AND deleted_utc IS NULL
                  AND ($2::varchar IS NULL OR status = $2)
                ORDER BY patient_id
                LIMIT $3
                "#,
            )
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list patients: {}", e)))?;

        Ok(patients)
    }

    /// Update a patient. A patient belonging to another tenant is left
    /// untouched and `None` is returned.
    #[instrument(skip(self, input), fields(tenant_id = %tenant_id, patient_id = %patient_id))]
    pub async fn update_patient(
        &self,
        tenant_id: &str,
        patient_id: Uuid,
        input: &UpdatePatientRequest,
    ) -> Result<Option<Patient>, AppError> {
        require_tenant(tenant_id)?;

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients
            SET first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                date_of_birth = COALESCE($5, date_of_birth),
                nhs_number = COALESCE($6, nhs_number),
                email = COALESCE($7, email),
                phone = COALESCE($8, phone),
                address = COALESCE($9, address),
                status = COALESCE($10, status),
                updated_utc = NOW()
            WHERE tenant_id = $1 AND patient_id = $2 AND deleted_utc IS NULL
            RETURNING patient_id, tenant_id, first_name, last_name, date_of_birth,
                nhs_number, email, phone, address, status,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(tenant_id)
        .bind(patient_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.date_of_birth)
        .bind(&input.nhs_number)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update patient: {}", e)))?;

        Ok(patient)
    }

    /// Soft-delete a patient. Returns false when the row does not exist
    /// for this tenant.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, patient_id = %patient_id))]
    pub async fn delete_patient(
        &self,
        tenant_id: &str,
        patient_id: Uuid,
    ) -> Result<bool, AppError> {
        require_tenant(tenant_id)?;

        let result = sqlx::query(
            r#"
            UPDATE patients
            SET deleted_utc = NOW(), updated_utc = NOW()
            WHERE tenant_id = $1 AND patient_id = $2 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(patient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete patient: {}", e)))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(patient_id = %patient_id, "Patient soft-deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Appointment Operations
    // -------------------------------------------------------------------------

    /// Create an appointment for a patient of the same tenant.
    #[instrument(skip(self, input), fields(tenant_id = %tenant_id, patient_id = %input.patient_id))]
    pub async fn create_appointment(
        &self,
        tenant_id: &str,
        input: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        require_tenant(tenant_id)?;

        // The patient lookup is itself scoped, so scheduling against
        // another tenant's patient surfaces as "not found".
        let patient = self.get_patient(tenant_id, input.patient_id).await?;
        if patient.is_none() {
            return Err(AppError::NotFound(anyhow::anyhow!("Patient not found")));
        }

        let appointment_id = Uuid::new_v4();
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                appointment_id, tenant_id, patient_id, title, location,
                starts_utc, ends_utc, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'scheduled', $8)
            RETURNING appointment_id, tenant_id, patient_id, title, location,
                starts_utc, ends_utc, status, notes,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(appointment_id)
        .bind(tenant_id)
        .bind(input.patient_id)
        .bind(&input.title)
        .bind(&input.location)
        .bind(input.starts_utc)
        .bind(input.ends_utc)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create appointment: {}", e))
        })?;

        info!(appointment_id = %appointment.appointment_id, "Appointment created");

        Ok(appointment)
    }

    /// Get an appointment by ID, scoped to the tenant.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, appointment_id = %appointment_id))]
    pub async fn get_appointment(
        &self,
        tenant_id: &str,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, AppError> {
        require_tenant(tenant_id)?;

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT appointment_id, tenant_id, patient_id, title, location,
                starts_utc, ends_utc, status, notes,
                created_utc, updated_utc, deleted_utc
            FROM appointments
            WHERE tenant_id = $1 AND appointment_id = $2 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get appointment: {}", e))
        })?;

        Ok(appointment)
    }

    /// List appointments for a tenant, optionally filtered by patient and
    /// date range.
    #[instrument(skip(self, filter), fields(tenant_id = %tenant_id))]
    pub async fn list_appointments(
        &self,
        tenant_id: &str,
        filter: &ListAppointmentsFilter,
    ) -> Result<Vec<Appointment>, AppError> {
        require_tenant(tenant_id)?;

        let limit = filter.page_size.clamp(1, 100) as i64;

        let appointments = if let Some(cursor) = filter.page_token {
            sqlx::query_as::<_, Appointment>(
                r#"
                SELECT appointment_id, tenant_id, patient_id, title, location,
                    starts_utc, ends_utc, status, notes,
                    created_utc, updated_utc, deleted_utc
                FROM appointments
                WHERE tenant_id = $1
                  AND deleted_utc IS NULL
                  AND ($2::uuid IS NULL OR patient_id = $2)
                  AND ($3::timestamptz IS NULL OR starts_utc >= $3)
                  AND ($4::timestamptz IS NULL OR starts_utc <= $4)
                  AND appointment_id > $5
                ORDER BY appointment_id
                LIMIT $6
                "#,
            )
            .bind(tenant_id)
            .bind(filter.patient_id)
            .bind(filter.from_utc)
            .bind(filter.to_utc)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Appointment>(
                r#"
                SELECT appointment_id, tenant_id, patient_id, title, location,
                    starts_utc, ends_utc, status, notes,
                    created_utc, updated_utc, deleted_utc
                FROM appointments
                WHERE tenant_id = $1
                  AND deleted_utc IS NULL
                  AND ($2::uuid IS NULL OR patient_id = $2)
                  AND ($3::timestamptz IS NULL OR starts_utc >= $3)
                  AND ($4::timestamptz IS NULL OR starts_utc <= $4)
                ORDER BY appointment_id
                LIMIT $5
                "#,
            )
            .bind(tenant_id)
            .bind(filter.patient_id)
            .bind(filter.from_utc)
            .bind(filter.to_utc)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list appointments: {}", e))
        })?;

        Ok(appointments)
    }

    /// Update an appointment. Another tenant's appointment yields `None`.
    #[instrument(skip(self, input), fields(tenant_id = %tenant_id, appointment_id = %appointment_id))]
    pub async fn update_appointment(
        &self,
        tenant_id: &str,
        appointment_id: Uuid,
        input: &UpdateAppointmentRequest,
    ) -> Result<Option<Appointment>, AppError> {
        require_tenant(tenant_id)?;

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET title = COALESCE($3, title),
                location = COALESCE($4, location),
                starts_utc = COALESCE($5, starts_utc),
                ends_utc = COALESCE($6, ends_utc),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                updated_utc = NOW()
            WHERE tenant_id = $1 AND appointment_id = $2 AND deleted_utc IS NULL
            RETURNING appointment_id, tenant_id, patient_id, title, location,
                starts_utc, ends_utc, status, notes,
                created_utc, updated_utc, deleted_utc
            "#,
        )
        .bind(tenant_id)
        .bind(appointment_id)
        .bind(&input.title)
        .bind(&input.location)
        .bind(input.starts_utc)
        .bind(input.ends_utc)
        .bind(&input.status)
        .bind(&input.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update appointment: {}", e))
        })?;

        Ok(appointment)
    }

    /// Soft-delete an appointment.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, appointment_id = %appointment_id))]
    pub async fn delete_appointment(
        &self,
        tenant_id: &str,
        appointment_id: Uuid,
    ) -> Result<bool, AppError> {
        require_tenant(tenant_id)?;

        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET deleted_utc = NOW(), updated_utc = NOW()
            WHERE tenant_id = $1 AND appointment_id = $2 AND deleted_utc IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(appointment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to delete appointment: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tenant_identifier_fails_fast() {
        assert!(require_tenant("tenant-1").is_ok());
        assert!(matches!(
            require_tenant(""),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            require_tenant("   "),
            Err(AppError::BadRequest(_))
        ));
    }
}
