//! The parameter validation layer guarding every resource endpoint.
//!
//! A stateless pure guard: identifiers, date windows, and pagination are
//! checked against the protocol's constraints, and only then is the call
//! delegated unchanged to the resource service. Violations become
//! `ClientInvalidParameters` envelopes with no payload; the caller's
//! window is never clamped or rewritten. The rules are identical across
//! resource modules, so they live once here, behind the generic
//! [`ModuleGuard`], with the locations module as the stock instantiation.

mod guard;
mod locations;
mod params;

pub use guard::{ModuleGuard, ResourceModule};
pub use locations::{
    Connector, Evse, Location, LocationsService, LocationsValidationService,
};
pub use params::{
    validate_date_range, validate_identifier, validate_leaf_identifier, validate_pagination,
    ParamError, MAX_IDENTIFIER_LEN, MAX_LEAF_IDENTIFIER_LEN,
};
