//! The per-counterparty trust record and its registration state machine.

use crate::credentials::CredentialsRole;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registration lifecycle of a trust relationship.
///
/// `Registering` and `Deleting` are transient, in-memory states held while
/// a handshake or teardown is in flight; only `Unregistered` and
/// `Registered` are ever persisted, which is what makes a failed handshake
/// all-or-nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    #[default]
    Unregistered,
    Registering,
    Registered,
    Deleting,
}

/// Events driving [`RegistrationStatus`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEvent {
    /// A first handshake begins (requires a bootstrap token).
    BeginRegister,
    /// A token-rotation handshake begins (requires an outbound token).
    BeginUpdate,
    /// The in-flight handshake completed on both sides.
    HandshakeComplete,
    /// Teardown of the relationship begins.
    BeginDelete,
    /// Teardown completed; tokens are discarded.
    DeleteComplete,
}

/// Rejected state-machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("registration state {from:?} does not accept {event:?}")]
pub struct InvalidTransition {
    pub from: RegistrationStatus,
    pub event: RegistrationEvent,
}

impl RegistrationStatus {
    /// Applies an event, returning the next state or rejecting the move.
    pub fn transition(self, event: RegistrationEvent) -> Result<Self, InvalidTransition> {
        use RegistrationEvent::*;
        use RegistrationStatus::*;
        match (self, event) {
            (Unregistered, BeginRegister) => Ok(Registering),
            (Registered, BeginUpdate) => Ok(Registering),
            (Registering, HandshakeComplete) => Ok(Registered),
            (Registered, BeginDelete) => Ok(Deleting),
            (Deleting, DeleteComplete) => Ok(Unregistered),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }
}

/// A remote counterparty's trust record, keyed by its base endpoint URL.
///
/// Owned by exactly one trust relationship and mutated only by the
/// credential registration engine. Callers running concurrent handshakes
/// against the same peer must serialize them on this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// The peer's base endpoint URL (identity key).
    pub url: String,
    /// Bootstrap token shared out of band; discarded after registration.
    pub token_a: Option<String>,
    /// Token the peer presents when calling this platform; issued here.
    pub inbound_token: Option<String>,
    /// Token this platform presents when calling the peer; issued there.
    pub outbound_token: Option<String>,
    /// The peer's version-discovery URL, learned during the handshake.
    pub remote_version_url: Option<String>,
    /// The peer's declared business roles, learned during the handshake.
    pub remote_roles: Vec<CredentialsRole>,
    /// Registration lifecycle state.
    pub status: RegistrationStatus,
}

impl Platform {
    /// A fresh unregistered record seeded with a bootstrap token.
    pub fn with_bootstrap(url: impl Into<String>, token_a: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token_a: Some(token_a.into()),
            inbound_token: None,
            outbound_token: None,
            remote_version_url: None,
            remote_roles: Vec::new(),
            status: RegistrationStatus::Unregistered,
        }
    }

    /// The token this platform should present when calling the peer:
    /// the rotating outbound token once registered, otherwise the
    /// bootstrap token.
    pub fn call_token(&self) -> Option<&str> {
        self.outbound_token
            .as_deref()
            .or(self.token_a.as_deref())
    }

    /// Whether a caller-presented token authenticates as this peer.
    ///
    /// Matches the bootstrap token (pre-registration) or the issued
    /// inbound token (post-registration).
    pub fn accepts_token(&self, token: &str) -> bool {
        self.token_a.as_deref() == Some(token) || self.inbound_token.as_deref() == Some(token)
    }

    /// Discards all tokens and handshake state, marking the record
    /// unregistered. The record itself survives so the relationship can
    /// be re-bootstrapped.
    pub fn invalidate(&mut self) {
        self.token_a = None;
        self.inbound_token = None;
        self.outbound_token = None;
        self.remote_version_url = None;
        self.remote_roles.clear();
        self.status = RegistrationStatus::Unregistered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle_transitions() {
        use RegistrationEvent::*;
        let status = RegistrationStatus::Unregistered;
        let status = status.transition(BeginRegister).unwrap();
        assert_eq!(status, RegistrationStatus::Registering);
        let status = status.transition(HandshakeComplete).unwrap();
        assert_eq!(status, RegistrationStatus::Registered);
        let status = status.transition(BeginUpdate).unwrap();
        let status = status.transition(HandshakeComplete).unwrap();
        let status = status.transition(BeginDelete).unwrap();
        assert_eq!(status, RegistrationStatus::Deleting);
        let status = status.transition(DeleteComplete).unwrap();
        assert_eq!(status, RegistrationStatus::Unregistered);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        use RegistrationEvent::*;
        // update before registration
        assert!(RegistrationStatus::Unregistered
            .transition(BeginUpdate)
            .is_err());
        // double registration
        assert!(RegistrationStatus::Registered
            .transition(BeginRegister)
            .is_err());
        // delete of an unregistered relationship
        assert!(RegistrationStatus::Unregistered
            .transition(BeginDelete)
            .is_err());
    }

    #[test]
    fn call_token_prefers_outbound_over_bootstrap() {
        let mut platform = Platform::with_bootstrap("https://peer.example", "token-a");
        assert_eq!(platform.call_token(), Some("token-a"));
        platform.outbound_token = Some("token-c".into());
        assert_eq!(platform.call_token(), Some("token-c"));
    }

    #[test]
    fn accepts_token_matches_bootstrap_or_inbound_only() {
        let mut platform = Platform::with_bootstrap("https://peer.example", "token-a");
        platform.inbound_token = Some("token-b".into());
        platform.outbound_token = Some("token-c".into());
        assert!(platform.accepts_token("token-a"));
        assert!(platform.accepts_token("token-b"));
        assert!(!platform.accepts_token("token-c"));
        assert!(!platform.accepts_token(""));
    }

    #[test]
    fn invalidate_discards_all_handshake_state() {
        let mut platform = Platform::with_bootstrap("https://peer.example", "token-a");
        platform.inbound_token = Some("token-b".into());
        platform.outbound_token = Some("token-c".into());
        platform.status = RegistrationStatus::Registered;
        platform.invalidate();
        assert_eq!(platform.status, RegistrationStatus::Unregistered);
        assert!(platform.call_token().is_none());
        assert!(!platform.accepts_token("token-b"));
        assert_eq!(platform.url, "https://peer.example");
    }
}
