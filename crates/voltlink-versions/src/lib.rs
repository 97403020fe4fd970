//! Version and capability negotiation between federated platforms.
//!
//! A platform advertises the protocol revisions it serves and, per
//! revision, a capability set: which resource modules it exposes and at
//! which endpoint URLs. The client side discovers a counterparty's
//! advertisement and selects the most recent mutually supported revision;
//! the server side answers the mirror read operations over the local
//! capability table. Nothing on either path mutates trust state.

mod client;
mod repository;
mod validation;

pub use client::{VersionsClient, VersionsError};
pub use repository::{VersionsCacheRepository, VersionsRepository};
pub use validation::{pick_latest_common, VersionsValidationService};
