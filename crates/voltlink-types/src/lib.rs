//! Shared protocol types for the voltlink federation core.
//!
//! This crate defines the wire-level vocabulary every other voltlink crate
//! speaks: the uniform response envelope and its status taxonomy, the
//! credentials handshake payloads, the version/capability types, the
//! pagination envelope, and the per-counterparty `Platform` trust record.
//!
//! No crate in the workspace depends on anything *except* `voltlink-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

mod credentials;
mod envelope;
mod platform;
mod search;
mod versions;

pub use credentials::{BusinessDetails, Credentials, CredentialsRole, PartyRole};
pub use envelope::{Envelope, Status, UnknownStatusCode};
pub use platform::{InvalidTransition, Platform, RegistrationEvent, RegistrationStatus};
pub use search::{DateRangeFilter, Pagination, SearchResult};
pub use versions::{
    Endpoint, InterfaceRole, ModuleId, Version, VersionDetails, VersionNumber,
};
