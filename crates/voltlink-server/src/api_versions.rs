//! Version discovery routes.

use crate::{authorized, bearer_token, run_blocking, AppState};
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use std::sync::Arc;
use voltlink_types::{Envelope, Version, VersionDetails};

/// Handler for `GET /versions`.
pub async fn get_versions_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Envelope<Vec<Version>>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state.versions.get_versions()
        })
        .await,
    )
}

/// Handler for `GET /{version}` — the capability set for one version.
pub async fn get_version_details_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    headers: HeaderMap,
) -> Json<Envelope<VersionDetails>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = authorized(&state, token.as_deref()) {
                return envelope;
            }
            state.versions.get_version_details(&version)
        })
        .await,
    )
}
