//! Client side of version negotiation: discovering what a counterparty
//! supports.

use crate::validation::pick_latest_common;
use std::sync::Arc;
use voltlink_store::{PlatformRepository, StoreError};
use voltlink_transport::{HttpClient, HttpMethod, HttpRequest, TransportError};
use voltlink_types::{Envelope, Status, Version, VersionDetails, VersionNumber};

/// Failures below the protocol envelope: store access, transport faults,
/// or a peer reply that is not a valid envelope at all.
#[derive(Debug, thiserror::Error)]
pub enum VersionsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed envelope from peer: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Queries a counterparty's version-discovery endpoint.
///
/// The bearer token is resolved fresh from the platform record on every
/// call, so a token rotated by a concurrent handshake is picked up
/// immediately. A missing token is sent as no token and rejected by the
/// peer; it is never short-circuited locally.
pub struct VersionsClient {
    transport: Arc<dyn HttpClient>,
    platform_repository: Arc<dyn PlatformRepository>,
    server_versions_url: String,
    supported: Vec<VersionNumber>,
}

impl VersionsClient {
    pub fn new(
        transport: Arc<dyn HttpClient>,
        platform_repository: Arc<dyn PlatformRepository>,
        server_versions_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            platform_repository,
            server_versions_url: server_versions_url.into(),
            supported: VersionNumber::all().to_vec(),
        }
    }

    /// Restricts the set of versions this client itself implements.
    pub fn with_supported(mut self, supported: Vec<VersionNumber>) -> Self {
        self.supported = supported;
        self
    }

    fn call_token(&self) -> Result<Option<String>, VersionsError> {
        Ok(self
            .platform_repository
            .find_by_url(&self.server_versions_url)?
            .and_then(|platform| platform.call_token().map(str::to_owned)))
    }

    /// Fetches the peer's advertised version list.
    pub fn get_versions(&self) -> Result<Envelope<Vec<Version>>, VersionsError> {
        let request = HttpRequest::new(HttpMethod::Get, &self.server_versions_url)
            .with_token(self.call_token()?);
        let response = self.transport.send(&request)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetches the capability set for one version.
    ///
    /// A version outside our own supported set, or one the peer never
    /// advertised, yields `ServerUnsupportedVersion` with no payload —
    /// the request was well-formed, the two platforms simply cannot agree.
    pub fn get_version_details(
        &self,
        version: VersionNumber,
    ) -> Result<Envelope<VersionDetails>, VersionsError> {
        if !self.supported.contains(&version) {
            return Ok(Envelope::error(
                Status::ServerUnsupportedVersion,
                format!("version {version} is not supported locally"),
            ));
        }

        let versions = self.get_versions()?;
        if !versions.status_code.is_success() {
            return Ok(Envelope {
                data: None,
                status_code: versions.status_code,
                status_message: versions.status_message,
                timestamp: versions.timestamp,
            });
        }

        let advertised = versions.data.unwrap_or_default();
        let Some(entry) = advertised.iter().find(|entry| entry.version == version) else {
            return Ok(Envelope::error(
                Status::ServerUnsupportedVersion,
                format!("peer does not advertise version {version}"),
            ));
        };

        let request =
            HttpRequest::new(HttpMethod::Get, &entry.url).with_token(self.call_token()?);
        let response = self.transport.send(&request)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Negotiates the most recent mutually supported version and fetches
    /// its capability set in one go.
    pub fn negotiate(&self) -> Result<Envelope<VersionDetails>, VersionsError> {
        let versions = self.get_versions()?;
        if !versions.status_code.is_success() {
            return Ok(Envelope {
                data: None,
                status_code: versions.status_code,
                status_message: versions.status_message,
                timestamp: versions.timestamp,
            });
        }

        let advertised = versions.data.unwrap_or_default();
        match pick_latest_common(&advertised, &self.supported) {
            Some(version) => {
                tracing::debug!(%version, peer = %self.server_versions_url, "negotiated version");
                self.get_version_details(version)
            }
            None => Ok(Envelope::error(
                Status::ServerUnsupportedVersion,
                "no mutually supported protocol version",
            )),
        }
    }
}
