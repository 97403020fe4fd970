//! Credentials handshake routes, the receiving side of registration.
//!
//! Authentication is not a separate layer here: the credentials service
//! resolves the caller from the presented token itself, because which
//! token is acceptable depends on the operation (a bootstrap token may
//! register but not update).

use crate::{bearer_token, run_blocking, served_version, AppState};
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde_json::Value;
use std::sync::Arc;
use voltlink_types::{Credentials, Envelope};

/// Handler for `GET /{version}/credentials`.
pub async fn get_credentials_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    headers: HeaderMap,
) -> Json<Envelope<Credentials>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            state.credentials.get_credentials(token.as_deref())
        })
        .await,
    )
}

/// Handler for `POST /{version}/credentials` — inbound registration.
pub async fn post_credentials_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Credentials>,
) -> Json<Envelope<Credentials>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            state.credentials.post_credentials(token.as_deref(), payload)
        })
        .await,
    )
}

/// Handler for `PUT /{version}/credentials` — inbound token rotation.
pub async fn put_credentials_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Credentials>,
) -> Json<Envelope<Credentials>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            state.credentials.put_credentials(token.as_deref(), payload)
        })
        .await,
    )
}

/// Handler for `DELETE /{version}/credentials` — unregistration.
pub async fn delete_credentials_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(version): Path<String>,
    headers: HeaderMap,
) -> Json<Envelope<Value>> {
    let token = bearer_token(&headers);
    Json(
        run_blocking(move || {
            if let Err(envelope) = served_version(&state, &version) {
                return envelope;
            }
            state.credentials.delete_credentials(token.as_deref())
        })
        .await,
    )
}
