//! Initiating side of the mutual credential handshake.

use crate::client::CredentialsClient;
use crate::error::CredentialsError;
use crate::roles::CredentialsRoleRepository;
use crate::generate_token;
use std::sync::Arc;
use voltlink_store::PlatformRepository;
use voltlink_types::{
    Credentials, InterfaceRole, ModuleId, Platform, RegistrationEvent, RegistrationStatus,
    VersionDetails,
};
use voltlink_versions::VersionsClient;

/// Drives register/get/update/delete against one counterparty.
///
/// The platform record for `server_versions_url` is the unit of mutual
/// exclusion: callers must not run two handshakes against the same peer
/// concurrently, or token rotation can race and leave the two sides with
/// mismatched tokens. Handshake network calls are sequential, never
/// pipelined. Every failure path returns before the record is written, so
/// a failed attempt leaves the stored state untouched.
pub struct CredentialsClientService {
    platform_repository: Arc<dyn PlatformRepository>,
    roles_repository: Arc<dyn CredentialsRoleRepository>,
    /// This platform's own version-discovery URL, sent in every payload.
    own_versions_url: String,
    /// The peer's version-discovery URL (identity key of its record).
    server_versions_url: String,
    versions_client: VersionsClient,
    credentials_client: CredentialsClient,
}

impl CredentialsClientService {
    pub fn new(
        platform_repository: Arc<dyn PlatformRepository>,
        roles_repository: Arc<dyn CredentialsRoleRepository>,
        own_versions_url: impl Into<String>,
        server_versions_url: impl Into<String>,
        versions_client: VersionsClient,
        credentials_client: CredentialsClient,
    ) -> Self {
        Self {
            platform_repository,
            roles_repository,
            own_versions_url: own_versions_url.into(),
            server_versions_url: server_versions_url.into(),
            versions_client,
            credentials_client,
        }
    }

    fn load_platform(&self) -> Result<Platform, CredentialsError> {
        self.platform_repository
            .find_by_url(&self.server_versions_url)?
            .ok_or_else(|| {
                CredentialsError::InvalidParameters(format!(
                    "no platform record for peer {}",
                    self.server_versions_url
                ))
            })
    }

    /// Negotiates a version and returns the peer's credentials receiver
    /// endpoint from its capability set.
    fn credentials_endpoint(&self) -> Result<String, CredentialsError> {
        let envelope = self.versions_client.negotiate()?;
        if !envelope.status_code.is_success() {
            return Err(CredentialsError::from_envelope(
                envelope.status_code,
                envelope.status_message,
            ));
        }
        let details: VersionDetails = envelope
            .data
            .ok_or_else(|| CredentialsError::Protocol("version details without payload".into()))?;
        details
            .endpoint_for(ModuleId::Credentials, InterfaceRole::Receiver)
            .map(str::to_owned)
            .ok_or_else(|| {
                CredentialsError::NotEnoughInformation(
                    "peer capability set has no credentials receiver endpoint".into(),
                )
            })
    }

    /// Runs one credentials exchange (POST for register, PUT for update)
    /// and persists the rotated tokens only after the peer has accepted.
    fn handshake(
        &self,
        platform: Platform,
        call_token: String,
        update: bool,
    ) -> Result<Credentials, CredentialsError> {
        let endpoint = self.credentials_endpoint()?;

        // Fresh payload on every exchange; never merged with the previous one.
        let new_inbound = generate_token();
        let payload = Credentials {
            token: new_inbound.clone(),
            url: self.own_versions_url.clone(),
            roles: self.roles_repository.credentials_roles(),
        };

        let envelope = if update {
            self.credentials_client.put(&endpoint, &call_token, &payload)?
        } else {
            self.credentials_client.post(&endpoint, &call_token, &payload)?
        };
        if !envelope.status_code.is_success() {
            return Err(CredentialsError::from_envelope(
                envelope.status_code,
                envelope.status_message,
            ));
        }
        let received = envelope
            .data
            .ok_or_else(|| CredentialsError::Protocol("credentials reply without payload".into()))?;

        let status = platform
            .status
            .transition(RegistrationEvent::HandshakeComplete)?;
        let updated = Platform {
            url: platform.url,
            token_a: None,
            inbound_token: Some(new_inbound),
            outbound_token: Some(received.token.clone()),
            remote_version_url: Some(received.url.clone()),
            remote_roles: received.roles.clone(),
            status,
        };
        self.platform_repository.upsert(&updated)?;

        tracing::info!(peer = %self.server_versions_url, update, "credentials handshake complete");
        Ok(received)
    }

    /// Performs the full registration handshake using the stored
    /// bootstrap token, replacing it with rotating per-peer tokens.
    pub fn register(&self) -> Result<Credentials, CredentialsError> {
        let mut platform = self.load_platform()?;
        platform.status = platform
            .status
            .transition(RegistrationEvent::BeginRegister)?;
        let token_a = platform.token_a.clone().ok_or_else(|| {
            CredentialsError::InvalidParameters(format!(
                "no bootstrap token stored for peer {}",
                self.server_versions_url
            ))
        })?;
        self.handshake(platform, token_a, false)
    }

    /// Re-runs the handshake with the current outbound token, rotating
    /// both sides' tokens. Only valid once registered.
    pub fn update(&self) -> Result<Credentials, CredentialsError> {
        let mut platform = self.load_platform()?;
        platform.status = platform.status.transition(RegistrationEvent::BeginUpdate)?;
        let outbound = platform.outbound_token.clone().ok_or_else(|| {
            CredentialsError::InvalidParameters(format!(
                "no outbound token stored for peer {}",
                self.server_versions_url
            ))
        })?;
        self.handshake(platform, outbound, true)
    }

    /// Returns the credentials received in the last completed handshake.
    ///
    /// A pure local read: no reconciliation round-trip is made.
    pub fn get(&self) -> Result<Credentials, CredentialsError> {
        let platform = self.load_platform()?;
        if platform.status != RegistrationStatus::Registered {
            return Err(CredentialsError::InvalidParameters(format!(
                "peer {} is not registered",
                self.server_versions_url
            )));
        }
        let token = platform.outbound_token.ok_or_else(|| {
            CredentialsError::NotEnoughInformation("registered record lacks outbound token".into())
        })?;
        let url = platform.remote_version_url.ok_or_else(|| {
            CredentialsError::NotEnoughInformation("registered record lacks version URL".into())
        })?;
        Ok(Credentials {
            token,
            url,
            roles: platform.remote_roles,
        })
    }

    /// Tears the relationship down on both sides and discards all local
    /// tokens. Idempotent: deleting an unregistered relationship is a
    /// no-op.
    pub fn delete(&self) -> Result<(), CredentialsError> {
        let Some(mut platform) = self
            .platform_repository
            .find_by_url(&self.server_versions_url)?
        else {
            return Ok(());
        };
        if platform.status == RegistrationStatus::Unregistered {
            return Ok(());
        }
        platform.status = platform.status.transition(RegistrationEvent::BeginDelete)?;

        let endpoint = self.credentials_endpoint()?;
        let token = platform.outbound_token.clone().ok_or_else(|| {
            CredentialsError::NotEnoughInformation("registered record lacks outbound token".into())
        })?;
        let envelope = self.credentials_client.delete(&endpoint, &token)?;
        if !envelope.status_code.is_success() {
            return Err(CredentialsError::from_envelope(
                envelope.status_code,
                envelope.status_message,
            ));
        }

        platform.invalidate();
        debug_assert_eq!(platform.status, RegistrationStatus::Unregistered);
        self.platform_repository.upsert(&platform)?;
        tracing::info!(peer = %self.server_versions_url, "credentials relationship deleted");
        Ok(())
    }
}
