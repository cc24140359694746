pub mod appointment;
pub mod patient;
pub mod tenant;
pub mod user_tenants;
