//! The uniform response envelope and protocol status taxonomy.
//!
//! Every operation in the core — version discovery, credential exchange,
//! resource listings — returns the same envelope shape on the wire:
//! a `status_code`, an optional `status_message`, a `timestamp`, and the
//! payload under `data` when (and only when, for errors) the call succeeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol status codes carried in `status_code`.
///
/// The integer values are part of the wire contract and must not change:
/// counterparty platforms dispatch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Status {
    /// The request was handled successfully.
    Success,
    /// Generic client-side error.
    ClientError,
    /// The request carried invalid or missing parameters (bad identifier,
    /// bad pagination, inverted date range, unknown token).
    ClientInvalidParameters,
    /// The request was well-formed but lacked information required to act.
    ClientNotEnoughInformation,
    /// Generic server-side error.
    ServerError,
    /// No mutually supported protocol version exists for this exchange.
    ServerUnsupportedVersion,
}

impl Status {
    /// The integer wire code for this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 1000,
            Self::ClientError => 2000,
            Self::ClientInvalidParameters => 2001,
            Self::ClientNotEnoughInformation => 2002,
            Self::ServerError => 3000,
            Self::ServerUnsupportedVersion => 3002,
        }
    }

    /// Whether this status denotes success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Error for unknown wire status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown protocol status code: {0}")]
pub struct UnknownStatusCode(pub i32);

impl From<Status> for i32 {
    fn from(status: Status) -> i32 {
        status.code()
    }
}

impl TryFrom<i32> for Status {
    type Error = UnknownStatusCode;

    fn try_from(code: i32) -> Result<Self, UnknownStatusCode> {
        match code {
            1000 => Ok(Self::Success),
            2000 => Ok(Self::ClientError),
            2001 => Ok(Self::ClientInvalidParameters),
            2002 => Ok(Self::ClientNotEnoughInformation),
            3000 => Ok(Self::ServerError),
            3002 => Ok(Self::ServerUnsupportedVersion),
            other => Err(UnknownStatusCode(other)),
        }
    }
}

/// The wire envelope wrapping every protocol response.
///
/// Immutable once constructed; freely shared for reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload. Present on success (a by-id read of a missing entity may
    /// succeed with no payload); always absent on failure.
    #[serde(skip_serializing_if = "Option::is_none", default = "Option::default")]
    pub data: Option<T>,
    /// Protocol status code.
    pub status_code: Status,
    /// Optional human-readable detail, mainly for failures.
    #[serde(skip_serializing_if = "Option::is_none", default = "Option::default")]
    pub status_message: Option<String>,
    /// When this response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// A success envelope carrying a payload.
    pub fn success(data: T) -> Self {
        Self::success_opt(Some(data))
    }

    /// A success envelope with an optional payload.
    pub fn success_opt(data: Option<T>) -> Self {
        Self {
            data,
            status_code: Status::Success,
            status_message: None,
            timestamp: Utc::now(),
        }
    }

    /// A failure envelope with no payload.
    pub fn error(status: Status, message: impl Into<String>) -> Self {
        Self {
            data: None,
            status_code: status,
            status_message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a `ClientInvalidParameters` failure.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::error(Status::ClientInvalidParameters, message)
    }

    /// Maps the payload type, preserving status, message, and timestamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: self.data.map(f),
            status_code: self.status_code,
            status_message: self.status_message,
            timestamp: self.timestamp,
        }
    }
}
