//! Provider of this platform's own declared business roles.

use voltlink_types::CredentialsRole;

/// Source of the roles this platform presents in every handshake payload.
pub trait CredentialsRoleRepository: Send + Sync {
    fn credentials_roles(&self) -> Vec<CredentialsRole>;
}

/// Fixed role set, typically loaded from configuration at startup.
pub struct StaticRolesRepository {
    roles: Vec<CredentialsRole>,
}

impl StaticRolesRepository {
    pub fn new(roles: Vec<CredentialsRole>) -> Self {
        Self { roles }
    }
}

impl CredentialsRoleRepository for StaticRolesRepository {
    fn credentials_roles(&self) -> Vec<CredentialsRole> {
        self.roles.clone()
    }
}
