//! The credential registration engine: mutual trust bootstrapping between
//! federated platforms.
//!
//! Two platforms start from one out-of-band bootstrap secret and finish
//! with per-peer rotating tokens plus each other's declared business
//! roles. The initiating side ([`CredentialsClientService`]) negotiates a
//! protocol version, generates a fresh token, and exchanges credentials
//! payloads; the receiving side ([`CredentialsServerService`]) resolves
//! the caller's identity purely from its bearer token, rotates the
//! caller's inbound token, and replies with its own credentials. Either
//! side failing leaves its platform record exactly as it was.

mod client;
mod client_service;
mod error;
mod roles;
mod server_service;

pub use client::CredentialsClient;
pub use client_service::CredentialsClientService;
pub use error::CredentialsError;
pub use roles::{CredentialsRoleRepository, StaticRolesRepository};
pub use server_service::CredentialsServerService;

/// Generates a fresh opaque bearer token.
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
