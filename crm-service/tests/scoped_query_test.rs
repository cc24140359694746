//! Tenant isolation tests against a real PostgreSQL instance.
//!
//! All tests are ignored by default; run with a database available:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/complexcare_test cargo test -- --ignored
//! ```

use chrono::{NaiveDate, TimeZone, Utc};
use crm_service::config::DatabaseConfig;
use crm_service::models::{
    CreateAppointmentRequest, CreatePatientRequest, CreateTenantRequest, ListPatientsFilter,
    UpdatePatientRequest,
};
use crm_service::services::Database;
use uuid::Uuid;

async fn test_database() -> Database {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/complexcare_test".to_string()),
        max_connections: 5,
        min_connections: 1,
    };
    let db = Database::new(&config).await.expect("connect to postgres");
    db.run_migrations().await.expect("run migrations");
    db
}

/// Unique tenant slug per test run to keep runs independent.
fn unique_tenant(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn provision(db: &Database, tenant_id: &str) {
    db.create_tenant(&CreateTenantRequest {
        tenant_id: tenant_id.to_string(),
        name: format!("Test tenant {tenant_id}"),
        domain: None,
        settings: None,
        features: vec![],
    })
    .await
    .expect("provision tenant");
}

fn patient_request(first_name: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        first_name: first_name.to_string(),
        last_name: "Example".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1962, 3, 14).unwrap(),
        nhs_number: None,
        email: None,
        phone: None,
        address: None,
    }
}

fn default_filter() -> ListPatientsFilter {
    ListPatientsFilter {
        page_size: 50,
        page_token: None,
        status: None,
    }
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn scoped_read_never_returns_another_tenants_rows() {
    let db = test_database().await;
    let tenant_1 = unique_tenant("tenant-1");
    let tenant_2 = unique_tenant("tenant-2");
    provision(&db, &tenant_1).await;
    provision(&db, &tenant_2).await;

    let ours = db
        .create_patient(&tenant_1, &patient_request("Ada"))
        .await
        .expect("create patient for tenant 1");
    db.create_patient(&tenant_2, &patient_request("Grace"))
        .await
        .expect("create patient for tenant 2");

    let listed = db
        .list_patients(&tenant_1, &default_filter())
        .await
        .expect("list patients");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].patient_id, ours.patient_id);
    assert_eq!(listed[0].tenant_id, tenant_1);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn update_against_another_tenants_row_affects_nothing() {
    let db = test_database().await;
    let tenant_1 = unique_tenant("tenant-1");
    let tenant_2 = unique_tenant("tenant-2");
    provision(&db, &tenant_1).await;
    provision(&db, &tenant_2).await;

    let theirs = db
        .create_patient(&tenant_2, &patient_request("Grace"))
        .await
        .expect("create patient for tenant 2");

    let update = UpdatePatientRequest {
        first_name: Some("Hijacked".to_string()),
        ..Default::default()
    };
    let result = db
        .update_patient(&tenant_1, theirs.patient_id, &update)
        .await
        .expect("update call itself succeeds");

    // Wrong tenant: zero rows, surfaced as None, data unchanged.
    assert!(result.is_none());
    let unchanged = db
        .get_patient(&tenant_2, theirs.patient_id)
        .await
        .expect("re-read patient")
        .expect("still present");
    assert_eq!(unchanged.first_name, "Grace");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn delete_against_another_tenants_row_is_a_no_op() {
    let db = test_database().await;
    let tenant_1 = unique_tenant("tenant-1");
    let tenant_2 = unique_tenant("tenant-2");
    provision(&db, &tenant_1).await;
    provision(&db, &tenant_2).await;

    let theirs = db
        .create_patient(&tenant_2, &patient_request("Grace"))
        .await
        .expect("create patient");

    let deleted = db
        .delete_patient(&tenant_1, theirs.patient_id)
        .await
        .expect("delete call");
    assert!(!deleted);

    assert!(db
        .get_patient(&tenant_2, theirs.patient_id)
        .await
        .expect("re-read")
        .is_some());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn soft_deleted_rows_disappear_from_scoped_reads() {
    let db = test_database().await;
    let tenant = unique_tenant("tenant");
    provision(&db, &tenant).await;

    let patient = db
        .create_patient(&tenant, &patient_request("Ada"))
        .await
        .expect("create patient");

    assert!(db
        .delete_patient(&tenant, patient.patient_id)
        .await
        .expect("soft delete"));
    assert!(db
        .get_patient(&tenant, patient.patient_id)
        .await
        .expect("read back")
        .is_none());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn appointment_cannot_reference_another_tenants_patient() {
    let db = test_database().await;
    let tenant_1 = unique_tenant("tenant-1");
    let tenant_2 = unique_tenant("tenant-2");
    provision(&db, &tenant_1).await;
    provision(&db, &tenant_2).await;

    let theirs = db
        .create_patient(&tenant_2, &patient_request("Grace"))
        .await
        .expect("create patient");

    let request = CreateAppointmentRequest {
        patient_id: theirs.patient_id,
        title: "Home visit".to_string(),
        location: None,
        starts_utc: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
        ends_utc: Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap(),
        notes: None,
    };

    // The scoped patient lookup makes the cross-tenant reference look
    // like a missing patient.
    let result = db.create_appointment(&tenant_1, &request).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn primary_tenant_switch_is_exclusive_per_user() {
    let db = test_database().await;
    let tenant_1 = unique_tenant("tenant-1");
    let tenant_2 = unique_tenant("tenant-2");
    provision(&db, &tenant_1).await;
    provision(&db, &tenant_2).await;

    let user_id = Uuid::new_v4();
    db.set_primary_tenant(user_id, &tenant_1)
        .await
        .expect("set first primary");
    db.set_primary_tenant(user_id, &tenant_2)
        .await
        .expect("switch primary");

    let memberships = db
        .list_tenants_for_user(user_id)
        .await
        .expect("list memberships");

    assert_eq!(memberships.len(), 2);
    let primaries: Vec<_> = memberships.iter().filter(|m| m.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].tenant_id, tenant_2);
}
