pub mod tenant;

pub use tenant::{TenantProvider, TenantProviderConfig, TenantSnapshot, TenantState};
