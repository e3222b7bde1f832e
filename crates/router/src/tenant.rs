//! Tenant collaborator interface
//!
//! Deployments that partition data per tenant expose the active tenant
//! through this trait; single-tenant deployments plug in `SingleTenant`
//! and the binder never asks for tenant state at all.

/// The tenant a record was produced under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    /// Schema or partition name
    pub schema_name: String,
    /// Tenant's serving domain, when one is assigned
    pub domain_url: Option<String>,
}

impl Tenant {
    /// Tenant with a schema name only
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            domain_url: None,
        }
    }

    /// Attach the serving domain
    #[must_use]
    pub fn with_domain(mut self, domain_url: impl Into<String>) -> Self {
        self.domain_url = Some(domain_url.into());
        self
    }
}

/// Source of the active tenant
pub trait TenantProvider: Send + Sync {
    /// Whether the deployment runs in multi-tenant mode. When this is
    /// false the provider is never asked for the current tenant.
    fn is_multi_tenant(&self) -> bool;

    /// The tenant active for the record being bound
    fn current_tenant(&self) -> Option<Tenant>;
}

/// Single-tenant deployment: no tenant context, ever
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleTenant;

impl TenantProvider for SingleTenant {
    fn is_multi_tenant(&self) -> bool {
        false
    }

    fn current_tenant(&self) -> Option<Tenant> {
        None
    }
}
