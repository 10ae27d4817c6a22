use super::UNSPECIFIED_STR;
use std::fmt;

/// Which side of the offer/answer exchange this endpoint takes.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCNegotiationRole {
    #[default]
    Unspecified,

    /// Waits for the remote peer's offer and answers it.
    Answerer,

    /// Sends its own offer once local credentials and fingerprint are known.
    Offerer,
}

const NEGOTIATION_ROLE_ANSWERER_STR: &str = "answerer";
const NEGOTIATION_ROLE_OFFERER_STR: &str = "offerer";

impl From<&str> for RTCNegotiationRole {
    fn from(raw: &str) -> Self {
        match raw {
            NEGOTIATION_ROLE_ANSWERER_STR => RTCNegotiationRole::Answerer,
            NEGOTIATION_ROLE_OFFERER_STR => RTCNegotiationRole::Offerer,
            _ => RTCNegotiationRole::Unspecified,
        }
    }
}

impl fmt::Display for RTCNegotiationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCNegotiationRole::Answerer => write!(f, "{NEGOTIATION_ROLE_ANSWERER_STR}"),
            RTCNegotiationRole::Offerer => write!(f, "{NEGOTIATION_ROLE_OFFERER_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}
