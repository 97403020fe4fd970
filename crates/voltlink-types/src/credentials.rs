//! Credentials handshake payloads and business-role declarations.

use serde::{Deserialize, Serialize};

/// Business roles a counterparty platform may declare.
///
/// Closed enumeration; a platform may declare several roles at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyRole {
    /// Charge point operator.
    Cpo,
    /// E-mobility service provider.
    Emsp,
    /// Roaming hub.
    Hub,
    /// National access point.
    Nap,
    /// Navigation service provider.
    Nsp,
    /// Smart charging service provider.
    Scsp,
    /// Any other party role.
    Other,
}

/// Display metadata for a declared role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    /// Display name of the party.
    pub name: String,
    /// Optional public website URL.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub website: Option<String>,
    /// Optional logo URL.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub logo: Option<String>,
}

impl BusinessDetails {
    /// Details with a name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
            logo: None,
        }
    }
}

/// One declared business-role identity.
///
/// Immutable once presented in a handshake message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsRole {
    /// The role kind.
    pub role: PartyRole,
    /// Display metadata.
    pub business_details: BusinessDetails,
    /// Short party identifier (e.g. "ABC").
    pub party_id: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

/// The payload exchanged during a credential handshake.
///
/// `token` is the token the *recipient* must present on subsequent calls
/// to the sender. Each exchange supersedes the previous payload entirely;
/// payloads are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Token the recipient must use when calling the sender.
    pub token: String,
    /// The sender's version-discovery URL.
    pub url: String,
    /// The sender's declared business roles.
    pub roles: Vec<CredentialsRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_wire_shape() {
        let credentials = Credentials {
            token: "tok".into(),
            url: "https://sender.example/versions".into(),
            roles: vec![CredentialsRole {
                role: PartyRole::Cpo,
                business_details: BusinessDetails::named("Sender"),
                party_id: "ABC".into(),
                country_code: "FR".into(),
            }],
        };

        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json["token"], "tok");
        assert_eq!(json["roles"][0]["role"], "CPO");
        assert_eq!(json["roles"][0]["business_details"]["name"], "Sender");
        assert!(json["roles"][0]["business_details"]
            .get("website")
            .is_none());
        assert_eq!(json["roles"][0]["party_id"], "ABC");
        assert_eq!(json["roles"][0]["country_code"], "FR");

        let back: Credentials = serde_json::from_value(json).unwrap();
        assert_eq!(back, credentials);
    }
}
