use crate::endpoint::configuration::UNSPECIFIED_STR;
use std::fmt;

/// Direction attribute of one media section, as written by the side that
/// produced the description.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCMediaDirection {
    #[default]
    Unspecified,
    Sendrecv,
    Sendonly,
    Recvonly,
    Inactive,
}

const MEDIA_DIRECTION_SENDRECV_STR: &str = "sendrecv";
const MEDIA_DIRECTION_SENDONLY_STR: &str = "sendonly";
const MEDIA_DIRECTION_RECVONLY_STR: &str = "recvonly";
const MEDIA_DIRECTION_INACTIVE_STR: &str = "inactive";

impl From<&str> for RTCMediaDirection {
    fn from(raw: &str) -> Self {
        match raw {
            MEDIA_DIRECTION_SENDRECV_STR => RTCMediaDirection::Sendrecv,
            MEDIA_DIRECTION_SENDONLY_STR => RTCMediaDirection::Sendonly,
            MEDIA_DIRECTION_RECVONLY_STR => RTCMediaDirection::Recvonly,
            MEDIA_DIRECTION_INACTIVE_STR => RTCMediaDirection::Inactive,
            _ => RTCMediaDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTCMediaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCMediaDirection::Sendrecv => MEDIA_DIRECTION_SENDRECV_STR,
            RTCMediaDirection::Sendonly => MEDIA_DIRECTION_SENDONLY_STR,
            RTCMediaDirection::Recvonly => MEDIA_DIRECTION_RECVONLY_STR,
            RTCMediaDirection::Inactive => MEDIA_DIRECTION_INACTIVE_STR,
            RTCMediaDirection::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl RTCMediaDirection {
    /// The direction seen from the other side of the session.
    pub fn reverse(&self) -> RTCMediaDirection {
        match *self {
            RTCMediaDirection::Sendonly => RTCMediaDirection::Recvonly,
            RTCMediaDirection::Recvonly => RTCMediaDirection::Sendonly,
            _ => *self,
        }
    }

    pub fn from_send_recv(send: bool, recv: bool) -> RTCMediaDirection {
        match (send, recv) {
            (true, true) => Self::Sendrecv,
            (true, false) => Self::Sendonly,
            (false, true) => Self::Recvonly,
            (false, false) => Self::Inactive,
        }
    }

    pub fn has_send(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Sendonly)
    }

    pub fn has_recv(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Recvonly)
    }
}
