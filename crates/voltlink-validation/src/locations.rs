//! The locations resource module: the stock instantiation of the guard,
//! including the nested device/connector identifier rules.

use crate::guard::{ModuleGuard, ResourceModule};
use crate::params::{validate_identifier, validate_leaf_identifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use voltlink_types::{DateRangeFilter, Envelope, Pagination, SearchResult};

/// A charging location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// One charging device (EVSE) at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evse {
    pub uid: String,
    pub last_updated: DateTime<Utc>,
}

/// One connector on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub last_updated: DateTime<Utc>,
}

/// Business-logic seam for the locations module. Implementations receive
/// only validated parameters.
pub trait LocationsService: Send + Sync {
    fn get_locations(&self, filter: &DateRangeFilter, page: Pagination) -> SearchResult<Location>;
    fn get_location(&self, location_id: &str) -> Option<Location>;
    fn get_evse(&self, location_id: &str, evse_uid: &str) -> Option<Evse>;
    fn get_connector(
        &self,
        location_id: &str,
        evse_uid: &str,
        connector_id: &str,
    ) -> Option<Connector>;
}

impl<S: LocationsService + ?Sized> ResourceModule for Arc<S> {
    type Entity = Location;

    fn list(&self, filter: &DateRangeFilter, page: Pagination) -> SearchResult<Location> {
        self.get_locations(filter, page)
    }

    fn get_by_id(&self, id: &str) -> Option<Location> {
        self.get_location(id)
    }
}

/// Envelope-producing front of the locations module: the shared guard for
/// listing and by-id reads, plus the nested identifier rules (location
/// and device identifiers up to 39 characters, connector identifiers up
/// to 36).
pub struct LocationsValidationService<S: LocationsService + ?Sized> {
    service: Arc<S>,
    guard: ModuleGuard<Arc<S>>,
}

impl<S: LocationsService> LocationsValidationService<S> {
    pub fn new(service: S) -> Self {
        Self::from_arc(Arc::new(service))
    }
}

impl<S: LocationsService + ?Sized> LocationsValidationService<S> {
    /// Wraps an already shared service, e.g. an `Arc<dyn LocationsService>`.
    pub fn from_arc(service: Arc<S>) -> Self {
        Self {
            guard: ModuleGuard::new(service.clone()),
            service,
        }
    }

    pub fn get_locations(
        &self,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        offset: i64,
        limit: Option<i64>,
    ) -> Envelope<SearchResult<Location>> {
        self.guard.list(
            DateRangeFilter::new(date_from, date_to),
            Pagination::new(offset, limit),
        )
    }

    pub fn get_location(&self, location_id: &str) -> Envelope<Location> {
        self.guard.get_by_id(location_id)
    }

    pub fn get_evse(&self, location_id: &str, evse_uid: &str) -> Envelope<Evse> {
        if let Err(error) = validate_identifier(location_id) {
            return error.into_envelope();
        }
        if let Err(error) = validate_identifier(evse_uid) {
            return error.into_envelope();
        }
        Envelope::success_opt(self.service.get_evse(location_id, evse_uid))
    }

    pub fn get_connector(
        &self,
        location_id: &str,
        evse_uid: &str,
        connector_id: &str,
    ) -> Envelope<Connector> {
        if let Err(error) = validate_identifier(location_id) {
            return error.into_envelope();
        }
        if let Err(error) = validate_identifier(evse_uid) {
            return error.into_envelope();
        }
        if let Err(error) = validate_leaf_identifier(connector_id) {
            return error.into_envelope();
        }
        Envelope::success_opt(
            self.service
                .get_connector(location_id, evse_uid, connector_id),
        )
    }
}
