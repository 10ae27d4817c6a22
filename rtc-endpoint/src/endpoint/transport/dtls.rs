use crate::endpoint::configuration::UNSPECIFIED_STR;
use crate::endpoint::sdp::ATTR_KEY_CONNECTION_SETUP;
use sdp::description::session::SessionDescription;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash of the local DTLS certificate, announced in `a=fingerprint`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCDtlsFingerprint {
    /// Hash function name, e.g. `sha-256`.
    pub algorithm: String,

    /// Colon separated upper case hex bytes.
    pub value: String,
}

/// DTLS role of this endpoint.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RTCDtlsRole {
    #[default]
    Unspecified = 0,

    /// Let the remote peer pick; written as `a=setup:actpass`.
    #[serde(rename = "auto")]
    Auto = 1,

    /// Initiate the handshake; written as `a=setup:active`.
    #[serde(rename = "client")]
    Client = 2,

    /// Wait for the handshake; written as `a=setup:passive`.
    #[serde(rename = "server")]
    Server = 3,
}

/// Role used in answers when the offer leaves the choice to us.
pub(crate) const DEFAULT_DTLS_ROLE_ANSWER: RTCDtlsRole = RTCDtlsRole::Client;

impl fmt::Display for RTCDtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCDtlsRole::Auto => write!(f, "auto"),
            RTCDtlsRole::Client => write!(f, "client"),
            RTCDtlsRole::Server => write!(f, "server"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

/// Reads the role the remote description asks for from its first
/// `a=setup` attribute. Anything but an explicit active or passive is `Auto`.
impl From<&SessionDescription> for RTCDtlsRole {
    fn from(session_description: &SessionDescription) -> Self {
        session_description
            .media_descriptions
            .iter()
            .flat_map(|media| media.attributes.iter())
            .find(|attribute| attribute.key == ATTR_KEY_CONNECTION_SETUP)
            .map(|attribute| match attribute.value.as_deref() {
                Some("active") => RTCDtlsRole::Client,
                Some("passive") => RTCDtlsRole::Server,
                _ => RTCDtlsRole::Auto,
            })
            .unwrap_or(RTCDtlsRole::Auto)
    }
}

impl RTCDtlsRole {
    /// Value of the `a=setup` attribute for this role.
    pub(crate) fn to_connection_role(self) -> &'static str {
        match self {
            RTCDtlsRole::Client => "active",
            RTCDtlsRole::Server => "passive",
            _ => "actpass",
        }
    }

    /// The role to answer with, given the role the remote offer asked for.
    pub(crate) fn answering(remote: RTCDtlsRole, configured: RTCDtlsRole) -> RTCDtlsRole {
        match remote {
            RTCDtlsRole::Client => RTCDtlsRole::Server,
            RTCDtlsRole::Server => RTCDtlsRole::Client,
            _ => match configured {
                RTCDtlsRole::Client | RTCDtlsRole::Server => configured,
                _ => DEFAULT_DTLS_ROLE_ANSWER,
            },
        }
    }
}
