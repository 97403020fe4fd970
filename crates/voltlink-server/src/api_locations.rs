//! Locations module routes.
//!
//! The handlers only bind query and path parameters; all validation
//! (pagination, date window, identifier lengths) lives in the validation
//! service so the rules are testable without HTTP.

use crate::{authorized, bearer_token, run_blocking, served_version, AppState};
use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use voltlink_types::{DateRangeFilter, Envelope, Pagination, SearchResult};
use voltlink_validation::{Connector, Evse, Location, LocationsService};

/// Listing window as it arrives on the query string.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

/// Handler for `GET /{version}/locations`.
pub async fn get_locations_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Json<Envelope<SearchResult<Location>>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state
                .locations
                .get_locations(query.date_from, query.date_to, query.offset, query.limit)
        })
        .await,
    )
}

/// Handler for `GET /{version}/locations/{location_id}`.
pub async fn get_location_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((version, location_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Json<Envelope<Location>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state.locations.get_location(&location_id)
        })
        .await,
    )
}

/// Handler for `GET /{version}/locations/{location_id}/{evse_uid}`.
pub async fn get_evse_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((version, location_id, evse_uid)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Json<Envelope<Evse>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state.locations.get_evse(&location_id, &evse_uid)
        })
        .await,
    )
}

/// Handler for `GET /{version}/locations/{location_id}/{evse_uid}/{connector_id}`.
pub async fn get_connector_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((version, location_id, evse_uid, connector_id)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Json<Envelope<Connector>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state
                .locations
                .get_connector(&location_id, &evse_uid, &connector_id)
        })
        .await,
    )
}

/// A locations backend with nothing behind it.
///
/// Deployments wire their own [`LocationsService`] into [`AppState`]; this
/// one keeps the routes live when no charging data source is configured.
pub struct NoLocations;

impl LocationsService for NoLocations {
    fn get_locations(&self, filter: &DateRangeFilter, page: Pagination) -> SearchResult<Location> {
        SearchResult::page(vec![], page, Some(0)).with_filter(*filter)
    }

    fn get_location(&self, _location_id: &str) -> Option<Location> {
        None
    }

    fn get_evse(&self, _location_id: &str, _evse_uid: &str) -> Option<Evse> {
        None
    }

    fn get_connector(
        &self,
        _location_id: &str,
        _evse_uid: &str,
        _connector_id: &str,
    ) -> Option<Connector> {
        None
    }
}
