//! Protocol versions and the per-version capability set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported protocol revisions, oldest first.
///
/// The derived ordering follows protocol recency, so `max()` over a set of
/// versions picks the most recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VersionNumber {
    #[serde(rename = "2.1.1")]
    V2_1_1,
    #[serde(rename = "2.2")]
    V2_2,
    #[serde(rename = "2.2.1")]
    V2_2_1,
}

impl VersionNumber {
    /// The wire string for this version.
    pub fn value(self) -> &'static str {
        match self {
            Self::V2_1_1 => "2.1.1",
            Self::V2_2 => "2.2",
            Self::V2_2_1 => "2.2.1",
        }
    }

    /// Parses a wire version string. Returns `None` for unknown revisions.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "2.1.1" => Some(Self::V2_1_1),
            "2.2" => Some(Self::V2_2),
            "2.2.1" => Some(Self::V2_2_1),
            _ => None,
        }
    }

    /// Every revision this library knows about, oldest first.
    pub fn all() -> &'static [VersionNumber] {
        &[Self::V2_1_1, Self::V2_2, Self::V2_2_1]
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Resource modules a platform can expose for a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Credentials,
    Locations,
    Sessions,
    Tariffs,
    Cdrs,
    Tokens,
    Commands,
}

/// Which side of a module's interface an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterfaceRole {
    Sender,
    Receiver,
}

/// One advertised version: the revision and where its details live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: VersionNumber,
    pub url: String,
}

/// One module endpoint within a version's capability set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub identifier: ModuleId,
    pub role: InterfaceRole,
    pub url: String,
}

/// The capability set advertised for one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetails {
    pub version: VersionNumber,
    pub endpoints: Vec<Endpoint>,
}

impl VersionDetails {
    /// Looks up the endpoint URL for a module, if advertised.
    pub fn endpoint_for(&self, module: ModuleId, role: InterfaceRole) -> Option<&str> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.identifier == module && endpoint.role == role)
            .map(|endpoint| endpoint.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering_follows_recency() {
        assert!(VersionNumber::V2_1_1 < VersionNumber::V2_2);
        assert!(VersionNumber::V2_2 < VersionNumber::V2_2_1);
        assert_eq!(
            VersionNumber::all().iter().max(),
            Some(&VersionNumber::V2_2_1)
        );
    }

    #[test]
    fn version_parse_round_trip() {
        for version in VersionNumber::all() {
            assert_eq!(VersionNumber::parse(version.value()), Some(*version));
        }
        assert_eq!(VersionNumber::parse("3.0"), None);
        assert_eq!(VersionNumber::parse(""), None);
    }

    #[test]
    fn version_list_wire_shape() {
        let versions = vec![Version {
            version: VersionNumber::V2_2_1,
            url: "https://peer.example/2.2.1".into(),
        }];
        let json = serde_json::to_value(&versions).unwrap();
        assert_eq!(json[0]["version"], "2.2.1");
        assert_eq!(json[0]["url"], "https://peer.example/2.2.1");
    }

    #[test]
    fn endpoint_lookup_matches_module_and_role() {
        let details = VersionDetails {
            version: VersionNumber::V2_2_1,
            endpoints: vec![
                Endpoint {
                    identifier: ModuleId::Credentials,
                    role: InterfaceRole::Receiver,
                    url: "https://peer.example/2.2.1/credentials".into(),
                },
                Endpoint {
                    identifier: ModuleId::Locations,
                    role: InterfaceRole::Sender,
                    url: "https://peer.example/2.2.1/locations".into(),
                },
            ],
        };

        assert_eq!(
            details.endpoint_for(ModuleId::Credentials, InterfaceRole::Receiver),
            Some("https://peer.example/2.2.1/credentials")
        );
        assert_eq!(
            details.endpoint_for(ModuleId::Credentials, InterfaceRole::Sender),
            None
        );

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["endpoints"][0]["identifier"], "credentials");
        assert_eq!(json["endpoints"][0]["role"], "RECEIVER");
    }
}
