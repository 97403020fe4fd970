//! HTTP binding for the voltlink federation core.
//!
//! Routes the credentials handshake, version discovery, and the locations
//! module to the synchronous services underneath. Every reply is HTTP 200
//! with the protocol envelope; protocol-level failures are carried in the
//! envelope status code, never as transport-level faults. Service calls
//! run under `spawn_blocking` because the store and the handshake engine
//! are synchronous rusqlite work.

pub mod api_credentials;
pub mod api_locations;
pub mod api_versions;
pub mod config;

use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use voltlink_credentials::{CredentialsServerService, StaticRolesRepository};
use voltlink_store::{DbPool, PlatformRepository, SqlitePlatformRepository};
use voltlink_types::{Envelope, Status};
use voltlink_validation::{LocationsService, LocationsValidationService};
use voltlink_versions::{VersionsCacheRepository, VersionsValidationService};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Counterparty trust records.
    pub platform_repository: Arc<dyn PlatformRepository>,
    /// Advertised versions and capabilities.
    pub versions: Arc<VersionsValidationService>,
    /// Receiving side of the credentials handshake.
    pub credentials: Arc<CredentialsServerService>,
    /// The locations module behind its validation front.
    pub locations: Arc<LocationsValidationService<dyn LocationsService>>,
}

impl AppState {
    /// Wires the services from configuration, a ready pool, and the
    /// deployment's locations backend.
    pub fn new(
        config: &config::Config,
        pool: DbPool,
        locations_backend: Arc<dyn LocationsService>,
    ) -> Self {
        let platform_repository: Arc<dyn PlatformRepository> =
            Arc::new(SqlitePlatformRepository::new(pool.clone()));
        let roles = Arc::new(StaticRolesRepository::new(
            config.platform.credentials_roles(),
        ));
        let versions = Arc::new(VersionsValidationService::new(Arc::new(
            VersionsCacheRepository::new(&config.platform.public_url),
        )));
        let credentials = Arc::new(CredentialsServerService::new(
            platform_repository.clone(),
            roles,
            config.platform.versions_url(),
        ));
        let locations = Arc::new(LocationsValidationService::from_arc(locations_backend));
        Self {
            pool,
            platform_repository,
            versions,
            credentials,
            locations,
        }
    }
}

/// Extracts the bearer token from the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Requires the presented token to resolve to a known counterparty.
///
/// Failure is a protocol envelope, generic over the route's payload type
/// so handlers can return it directly.
pub(crate) fn authorized<T>(state: &AppState, token: Option<&str>) -> Result<(), Envelope<T>> {
    match voltlink_store::authenticate(state.platform_repository.as_ref(), token) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(Envelope::invalid_parameters("unknown or missing token")),
        Err(error) => {
            tracing::error!(%error, "platform store failure during authentication");
            Err(Envelope::error(Status::ServerError, "store failure"))
        }
    }
}

/// Requires the path's version segment to name a version this platform
/// serves. Module routes only exist under served versions.
pub(crate) fn served_version<T>(state: &AppState, version: &str) -> Result<(), Envelope<T>> {
    let details = state.versions.get_version_details(version);
    if details.status_code == Status::Success {
        Ok(())
    } else {
        Err(Envelope {
            data: None,
            status_code: details.status_code,
            status_message: details.status_message,
            timestamp: details.timestamp,
        })
    }
}

/// Runs an envelope-producing closure on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Envelope<T>
where
    T: Send + 'static,
    F: FnOnce() -> Envelope<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::error!(%error, "blocking task failed");
            Envelope::error(Status::ServerError, "internal error")
        }
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/versions", get(api_versions::get_versions_handler))
        .route("/{version}", get(api_versions::get_version_details_handler))
        .route(
            "/{version}/credentials",
            get(api_credentials::get_credentials_handler)
                .post(api_credentials::post_credentials_handler)
                .put(api_credentials::put_credentials_handler)
                .delete(api_credentials::delete_credentials_handler),
        )
        .route(
            "/{version}/locations",
            get(api_locations::get_locations_handler),
        )
        .route(
            "/{version}/locations/{location_id}",
            get(api_locations::get_location_handler),
        )
        .route(
            "/{version}/locations/{location_id}/{evse_uid}",
            get(api_locations::get_evse_handler),
        )
        .route(
            "/{version}/locations/{location_id}/{evse_uid}/{connector_id}",
            get(api_locations::get_connector_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
