pub mod appointment;
pub mod membership;
pub mod patient;
pub mod tenant;

pub use appointment::{
    Appointment, AppointmentResponse, AppointmentStatus, CreateAppointmentRequest,
    ListAppointmentsFilter, UpdateAppointmentRequest,
};
pub use membership::{SetPrimaryTenantRequest, UserTenantMembership, UserTenantResponse};
pub use patient::{
    CreatePatientRequest, ListPatientsFilter, Patient, PatientResponse, UpdatePatientRequest,
};
pub use tenant::{
    CreateTenantRequest, Tenant, TenantResponse, TenantStatus, UpdateTenantRequest,
};
