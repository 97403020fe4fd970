//! Server-side version negotiation: read-only envelope-wrapped views over
//! the local capability table.

use crate::repository::VersionsRepository;
use std::sync::Arc;
use voltlink_types::{Envelope, Status, Version, VersionDetails, VersionNumber};

/// Serves this platform's advertised versions to authenticated peers.
///
/// Authentication happens before this service is reached; nothing on this
/// path mutates state.
pub struct VersionsValidationService {
    repository: Arc<dyn VersionsRepository>,
}

impl VersionsValidationService {
    pub fn new(repository: Arc<dyn VersionsRepository>) -> Self {
        Self { repository }
    }

    /// The advertised version list.
    pub fn get_versions(&self) -> Envelope<Vec<Version>> {
        Envelope::success(self.repository.versions())
    }

    /// The capability set for one requested version string.
    ///
    /// An unparseable or unserved version is a negotiation mismatch, not a
    /// malformed request: the reply is `ServerUnsupportedVersion` with no
    /// payload.
    pub fn get_version_details(&self, version: &str) -> Envelope<VersionDetails> {
        let Some(parsed) = VersionNumber::parse(version) else {
            return Envelope::error(
                Status::ServerUnsupportedVersion,
                format!("unknown protocol version '{version}'"),
            );
        };
        match self.repository.version_details(parsed) {
            Some(details) => Envelope::success(details),
            None => Envelope::error(
                Status::ServerUnsupportedVersion,
                format!("version {parsed} is not served by this platform"),
            ),
        }
    }
}

/// Max-common-version selection: the most recent revision present both in
/// the peer's advertisement and in our own supported set.
pub fn pick_latest_common(
    advertised: &[Version],
    supported: &[VersionNumber],
) -> Option<VersionNumber> {
    advertised
        .iter()
        .map(|version| version.version)
        .filter(|version| supported.contains(version))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::VersionsCacheRepository;

    fn service() -> VersionsValidationService {
        VersionsValidationService::new(Arc::new(VersionsCacheRepository::new(
            "https://local.example",
        )))
    }

    #[test]
    fn versions_wrapped_in_success_envelope() {
        let envelope = service().get_versions();
        assert_eq!(envelope.status_code, Status::Success);
        assert_eq!(envelope.data.unwrap().len(), 2);
    }

    #[test]
    fn details_for_served_version() {
        let envelope = service().get_version_details("2.2.1");
        assert_eq!(envelope.status_code, Status::Success);
        assert_eq!(envelope.data.unwrap().version, VersionNumber::V2_2_1);
    }

    #[test]
    fn unserved_version_is_negotiation_mismatch_not_client_error() {
        for requested in ["2.2", "9.9", ""] {
            let envelope = service().get_version_details(requested);
            assert_eq!(envelope.status_code, Status::ServerUnsupportedVersion);
            assert!(envelope.data.is_none());
        }
    }

    #[test]
    fn latest_common_version_selection() {
        let advertised = vec![
            Version {
                version: VersionNumber::V2_1_1,
                url: "https://peer.example/2.1.1".into(),
            },
            Version {
                version: VersionNumber::V2_2_1,
                url: "https://peer.example/2.2.1".into(),
            },
        ];

        assert_eq!(
            pick_latest_common(&advertised, VersionNumber::all()),
            Some(VersionNumber::V2_2_1)
        );
        // Our side only speaks 2.1.1: the max common drops back.
        assert_eq!(
            pick_latest_common(&advertised, &[VersionNumber::V2_1_1]),
            Some(VersionNumber::V2_1_1)
        );
        // No overlap at all.
        assert_eq!(
            pick_latest_common(&advertised, &[VersionNumber::V2_2]),
            None
        );
    }
}
