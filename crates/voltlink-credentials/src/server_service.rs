//! Receiving side of the mutual credential handshake.

use crate::error::CredentialsError;
use crate::generate_token;
use crate::roles::CredentialsRoleRepository;
use std::sync::Arc;
use voltlink_store::{authenticate, PlatformRepository};
use voltlink_types::{
    Credentials, Envelope, Platform, RegistrationEvent, RegistrationStatus, Status,
};

/// Handles inbound register/update/get/delete calls from counterparties.
///
/// Identity is always resolved from the presented bearer token, never from
/// a URL or the transport-layer source address: before the token matches,
/// the caller's identity is simply unknown. Every reply is a protocol
/// envelope; store faults become `ServerError` envelopes rather than
/// transport-level failures.
pub struct CredentialsServerService {
    platform_repository: Arc<dyn PlatformRepository>,
    roles_repository: Arc<dyn CredentialsRoleRepository>,
    /// This platform's own version-discovery URL, sent in every reply.
    own_versions_url: String,
}

impl CredentialsServerService {
    pub fn new(
        platform_repository: Arc<dyn PlatformRepository>,
        roles_repository: Arc<dyn CredentialsRoleRepository>,
        own_versions_url: impl Into<String>,
    ) -> Self {
        Self {
            platform_repository,
            roles_repository,
            own_versions_url: own_versions_url.into(),
        }
    }

    fn own_credentials(&self, token_for_caller: String) -> Credentials {
        Credentials {
            token: token_for_caller,
            url: self.own_versions_url.clone(),
            roles: self.roles_repository.credentials_roles(),
        }
    }

    fn resolve_caller<T>(&self, token: Option<&str>) -> Result<Platform, Envelope<T>> {
        match authenticate(self.platform_repository.as_ref(), token) {
            Ok(Some(platform)) => Ok(platform),
            Ok(None) => Err(Envelope::invalid_parameters("unknown or missing token")),
            Err(error) => {
                tracing::error!(%error, "platform store failure during authentication");
                Err(Envelope::error(Status::ServerError, "store failure"))
            }
        }
    }

    /// Accepts a registration or update exchange: stores the caller's
    /// declared roles, issues a fresh inbound token for its future calls,
    /// and replies with this platform's own credentials.
    fn accept_exchange(
        &self,
        caller: Platform,
        payload: Credentials,
        event: RegistrationEvent,
    ) -> Envelope<Credentials> {
        let status = match caller.status.transition(event) {
            Ok(transient) => match transient.transition(RegistrationEvent::HandshakeComplete) {
                Ok(status) => status,
                Err(error) => return Envelope::invalid_parameters(error.to_string()),
            },
            Err(error) => return Envelope::invalid_parameters(error.to_string()),
        };

        let fresh_inbound = generate_token();
        let updated = Platform {
            url: payload.url.clone(),
            token_a: None,
            inbound_token: Some(fresh_inbound.clone()),
            outbound_token: Some(payload.token.clone()),
            remote_version_url: Some(payload.url.clone()),
            remote_roles: payload.roles,
            status,
        };

        let result = (|| -> Result<(), CredentialsError> {
            // The record may have been seeded under a different URL than
            // the one the caller now declares; re-key it.
            if caller.url != updated.url {
                self.platform_repository.delete(&caller.url)?;
            }
            self.platform_repository.upsert(&updated)?;
            Ok(())
        })();
        if let Err(error) = result {
            tracing::error!(%error, "failed to persist counterparty registration");
            return Envelope::error(Status::ServerError, "store failure");
        }

        tracing::info!(peer = %updated.url, "accepted credentials exchange");
        Envelope::success(self.own_credentials(fresh_inbound))
    }

    /// Inbound registration, authenticated by the caller's bootstrap token.
    pub fn post_credentials(
        &self,
        token: Option<&str>,
        payload: Credentials,
    ) -> Envelope<Credentials> {
        match self.resolve_caller(token) {
            Ok(caller) => self.accept_exchange(caller, payload, RegistrationEvent::BeginRegister),
            Err(envelope) => envelope,
        }
    }

    /// Inbound token rotation, authenticated by the caller's current
    /// inbound token. Only valid once registered.
    pub fn put_credentials(
        &self,
        token: Option<&str>,
        payload: Credentials,
    ) -> Envelope<Credentials> {
        match self.resolve_caller(token) {
            Ok(caller) => self.accept_exchange(caller, payload, RegistrationEvent::BeginUpdate),
            Err(envelope) => envelope,
        }
    }

    /// Returns the credentials the caller should currently be using.
    /// Pure read; no token is rotated.
    pub fn get_credentials(&self, token: Option<&str>) -> Envelope<Credentials> {
        let caller = match self.resolve_caller(token) {
            Ok(caller) => caller,
            Err(envelope) => return envelope,
        };
        if caller.status != RegistrationStatus::Registered {
            return Envelope::invalid_parameters("caller is not registered");
        }
        match caller.inbound_token {
            Some(inbound) => Envelope::success(self.own_credentials(inbound)),
            None => Envelope::error(Status::ServerError, "registered record lacks inbound token"),
        }
    }

    /// Removes the caller's trust record entirely. Its token stops
    /// authenticating immediately.
    pub fn delete_credentials(&self, token: Option<&str>) -> Envelope<serde_json::Value> {
        let caller = match self.resolve_caller(token) {
            Ok(caller) => caller,
            Err(envelope) => return envelope,
        };
        if let Err(error) = self.platform_repository.delete(&caller.url) {
            tracing::error!(%error, "failed to delete counterparty record");
            return Envelope::error(Status::ServerError, "store failure");
        }
        tracing::info!(peer = %caller.url, "deleted counterparty trust record");
        Envelope::success_opt(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::StaticRolesRepository;
    use voltlink_store::{create_pool, run_migrations, SqlitePlatformRepository};
    use voltlink_types::{BusinessDetails, CredentialsRole, PartyRole};

    fn repository() -> Arc<SqlitePlatformRepository> {
        let pool = create_pool(":memory:", 1).unwrap();
        run_migrations(&pool.get().unwrap()).unwrap();
        Arc::new(SqlitePlatformRepository::new(pool))
    }

    fn service(repository: Arc<SqlitePlatformRepository>) -> CredentialsServerService {
        let roles = StaticRolesRepository::new(vec![CredentialsRole {
            role: PartyRole::Emsp,
            business_details: BusinessDetails::named("Receiver"),
            party_id: "DEF".into(),
            country_code: "FR".into(),
        }]);
        CredentialsServerService::new(repository, Arc::new(roles), "https://receiver.test/versions")
    }

    fn sender_payload(token: &str) -> Credentials {
        Credentials {
            token: token.into(),
            url: "https://sender.test/versions".into(),
            roles: vec![CredentialsRole {
                role: PartyRole::Cpo,
                business_details: BusinessDetails::named("Sender"),
                party_id: "ABC".into(),
                country_code: "FR".into(),
            }],
        }
    }

    #[test]
    fn post_with_unknown_token_rejects_and_mutates_nothing() {
        let repository = repository();
        let service = service(repository.clone());

        let envelope = service.post_credentials(Some("nope"), sender_payload("b-sender"));
        assert_eq!(envelope.status_code, Status::ClientInvalidParameters);
        assert!(envelope.data.is_none());
        assert!(repository
            .find_by_url("https://sender.test/versions")
            .unwrap()
            .is_none());
    }

    #[test]
    fn post_with_missing_token_rejects() {
        let repository = repository();
        let service = service(repository.clone());
        let envelope = service.post_credentials(None, sender_payload("b-sender"));
        assert_eq!(envelope.status_code, Status::ClientInvalidParameters);
    }

    #[test]
    fn post_with_bootstrap_token_registers_and_rotates() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let envelope = service.post_credentials(Some("token-a"), sender_payload("b-sender"));
        assert_eq!(envelope.status_code, Status::Success);
        let reply = envelope.data.unwrap();
        assert_eq!(reply.url, "https://receiver.test/versions");
        assert_eq!(reply.roles.len(), 1);

        // Record re-keyed to the declared URL, bootstrap token discarded.
        assert!(repository.find_by_url("https://sender.test").unwrap().is_none());
        let stored = repository
            .find_by_url("https://sender.test/versions")
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, RegistrationStatus::Registered);
        assert!(stored.token_a.is_none());
        assert_eq!(stored.inbound_token.as_deref(), Some(reply.token.as_str()));
        assert_eq!(stored.outbound_token.as_deref(), Some("b-sender"));
        assert_eq!(stored.remote_roles[0].party_id, "ABC");

        // The bootstrap token no longer authenticates; the issued one does.
        assert!(repository.find_by_token("token-a").unwrap().is_none());
        assert!(repository.find_by_token(&reply.token).unwrap().is_some());
    }

    #[test]
    fn double_registration_is_rejected() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let first = service.post_credentials(Some("token-a"), sender_payload("b1"));
        let issued = first.data.unwrap().token;

        let second = service.post_credentials(Some(&issued), sender_payload("b2"));
        assert_eq!(second.status_code, Status::ClientInvalidParameters);

        // The first registration's tokens are still in force.
        assert!(repository.find_by_token(&issued).unwrap().is_some());
    }

    #[test]
    fn put_rotates_tokens_for_registered_caller() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let registered = service.post_credentials(Some("token-a"), sender_payload("b1"));
        let old_token = registered.data.unwrap().token;

        let updated = service.put_credentials(Some(&old_token), sender_payload("b2"));
        assert_eq!(updated.status_code, Status::Success);
        let new_token = updated.data.unwrap().token;
        assert_ne!(new_token, old_token);

        assert!(repository.find_by_token(&old_token).unwrap().is_none());
        let stored = repository.find_by_token(&new_token).unwrap().unwrap();
        assert_eq!(stored.outbound_token.as_deref(), Some("b2"));
    }

    #[test]
    fn put_before_registration_is_rejected() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let envelope = service.put_credentials(Some("token-a"), sender_payload("b1"));
        assert_eq!(envelope.status_code, Status::ClientInvalidParameters);

        // Bootstrap token untouched: registration can still proceed.
        assert!(repository.find_by_token("token-a").unwrap().is_some());
    }

    #[test]
    fn get_returns_current_credentials_without_rotation() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let issued = service
            .post_credentials(Some("token-a"), sender_payload("b1"))
            .data
            .unwrap()
            .token;

        let envelope = service.get_credentials(Some(&issued));
        assert_eq!(envelope.status_code, Status::Success);
        assert_eq!(envelope.data.unwrap().token, issued);
    }

    #[test]
    fn delete_revokes_the_token_immediately() {
        let repository = repository();
        let service = service(repository.clone());
        repository
            .upsert(&Platform::with_bootstrap("https://sender.test", "token-a"))
            .unwrap();

        let issued = service
            .post_credentials(Some("token-a"), sender_payload("b1"))
            .data
            .unwrap()
            .token;

        let envelope = service.delete_credentials(Some(&issued));
        assert_eq!(envelope.status_code, Status::Success);

        assert!(repository.find_by_token(&issued).unwrap().is_none());
        let after = service.get_credentials(Some(&issued));
        assert_eq!(after.status_code, Status::ClientInvalidParameters);
    }
}
