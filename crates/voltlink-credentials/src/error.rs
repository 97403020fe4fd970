//! Error taxonomy of the credential registration engine.

use voltlink_store::StoreError;
use voltlink_transport::TransportError;
use voltlink_types::{InvalidTransition, Status};
use voltlink_versions::VersionsError;

/// Failures surfaced by the registration engine.
///
/// Every failure leaves the platform record in its prior consistent
/// state: token rotation is all-or-nothing per attempt.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    /// A parameter detected as invalid before any delegation: missing or
    /// unknown token, missing platform record, operation invalid for the
    /// relationship's current state.
    #[error("invalid client parameters: {0}")]
    InvalidParameters(String),

    /// The request was well-formed but required information is absent.
    #[error("not enough information: {0}")]
    NotEnoughInformation(String),

    /// No mutually supported protocol version with this peer.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    /// The counterparty rejected the exchange. Carries the remote status
    /// code so callers can distinguish an authentication rejection from
    /// a generic remote fault.
    #[error("peer rejected request with status {}: {}", .status.code(), .message.as_deref().unwrap_or("<no message>"))]
    Remote {
        status: Status,
        message: Option<String>,
    },

    /// The peer replied outside the protocol's wire contract.
    #[error("protocol violation from peer: {0}")]
    Protocol(String),

    /// The requested operation is invalid for the record's current
    /// registration state.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The peer's reply was not a parseable envelope.
    #[error("malformed envelope from peer: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<VersionsError> for CredentialsError {
    fn from(error: VersionsError) -> Self {
        match error {
            VersionsError::Store(e) => Self::Store(e),
            VersionsError::Transport(e) => Self::Transport(e),
            VersionsError::Decode(e) => Self::Decode(e),
        }
    }
}

impl CredentialsError {
    /// The remote rejection for a non-success envelope.
    pub fn from_envelope(status: Status, message: Option<String>) -> Self {
        match status {
            Status::ServerUnsupportedVersion => Self::UnsupportedVersion(
                message.unwrap_or_else(|| "no mutually supported version".to_string()),
            ),
            status => Self::Remote { status, message },
        }
    }
}
