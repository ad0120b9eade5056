//! Well-known annotation and label keys
//!
//! Manifests rendered by Pulumi carry `pulumi.com/*` bookkeeping annotations
//! that have no meaning once the resources are packaged as a Helm chart.

/// Pulumi-owned annotations
pub mod pulumi {
    /// Set to `"true"` when Pulumi appended a random suffix to the resource name
    pub const AUTONAMED: &str = "pulumi.com/autonamed";
    /// Every Pulumi annotation lives under this prefix
    pub const PREFIX: &str = "pulumi.com/";
}

/// Recommended Kubernetes labels
pub mod labels {
    /// Application name label
    pub const NAME: &str = "app.kubernetes.io/name";
}

/// Value of the name label carried by the agent's own ServiceAccount
pub const PRIMARY_WORKLOAD: &str = "customer-managed-workflow-agent";

/// Name given to the worker ServiceAccount when it collides with the agent's
pub const WORKER_SERVICE_ACCOUNT: &str = "worker-service-account";
