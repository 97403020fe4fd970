//! The version table provider: this platform's own advertised capabilities.

use voltlink_types::{
    Endpoint, InterfaceRole, ModuleId, Version, VersionDetails, VersionNumber,
};

/// Read-only source of the versions and capability sets this platform
/// advertises to its peers. An external collaborator supplies the real
/// table; [`VersionsCacheRepository`] is the stock in-process one.
pub trait VersionsRepository: Send + Sync {
    /// Advertised versions, each with its detail URL.
    fn versions(&self) -> Vec<Version>;

    /// The capability set for one version, or `None` if this platform
    /// does not serve it.
    fn version_details(&self, version: VersionNumber) -> Option<VersionDetails>;
}

/// In-process capability table derived from the platform's public base URL.
///
/// Advertises the revisions this library fully serves (2.1.1 and 2.2.1)
/// with credentials and the sample locations module.
pub struct VersionsCacheRepository {
    base_url: String,
}

impl VersionsCacheRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn served() -> &'static [VersionNumber] {
        &[VersionNumber::V2_1_1, VersionNumber::V2_2_1]
    }
}

impl VersionsRepository for VersionsCacheRepository {
    fn versions(&self) -> Vec<Version> {
        Self::served()
            .iter()
            .map(|version| Version {
                version: *version,
                url: format!("{}/{}", self.base_url, version),
            })
            .collect()
    }

    fn version_details(&self, version: VersionNumber) -> Option<VersionDetails> {
        if !Self::served().contains(&version) {
            return None;
        }
        Some(VersionDetails {
            version,
            endpoints: vec![
                Endpoint {
                    identifier: ModuleId::Credentials,
                    role: InterfaceRole::Receiver,
                    url: format!("{}/{}/credentials", self.base_url, version),
                },
                Endpoint {
                    identifier: ModuleId::Locations,
                    role: InterfaceRole::Sender,
                    url: format!("{}/{}/locations", self.base_url, version),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_served_versions_with_detail_urls() {
        let repository = VersionsCacheRepository::new("https://local.example");
        let versions = repository.versions();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].version, VersionNumber::V2_1_1);
        assert_eq!(versions[1].url, "https://local.example/2.2.1");
    }

    #[test]
    fn details_absent_for_unserved_version() {
        let repository = VersionsCacheRepository::new("https://local.example");
        assert!(repository.version_details(VersionNumber::V2_2).is_none());

        let details = repository
            .version_details(VersionNumber::V2_2_1)
            .expect("2.2.1 is served");
        assert_eq!(
            details.endpoint_for(ModuleId::Credentials, InterfaceRole::Receiver),
            Some("https://local.example/2.2.1/credentials")
        );
    }
}
