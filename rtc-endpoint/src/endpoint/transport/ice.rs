use serde::{Deserialize, Serialize};
use std::fmt;

/// ICE username fragment and password of one side of the session.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceParameters {
    pub username_fragment: String,
    pub password: String,
    pub ice_lite: bool,
}

impl fmt::Display for RTCIceParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.username_fragment, self.password)
    }
}

/// ICECandidateInit is used to serialize ice candidates
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceCandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u16>,
    pub username_fragment: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ice_candidate_init_json() {
        let init = RTCIceCandidateInit {
            candidate: "candidate:1 1 udp 2130706431 10.0.0.1 5000 typ host".to_owned(),
            sdp_mid: Some("0".to_owned()),
            sdp_mline_index: Some(0),
            username_fragment: None,
        };

        let json = serde_json::to_string(&init).unwrap();
        assert_eq!(
            json,
            r#"{"candidate":"candidate:1 1 udp 2130706431 10.0.0.1 5000 typ host","sdpMid":"0","sdpMLineIndex":0,"usernameFragment":null}"#
        );

        let parsed: RTCIceCandidateInit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, init);
    }

    #[test]
    fn test_ice_parameters_string() {
        let params = RTCIceParameters {
            username_fragment: "ufrag".to_owned(),
            password: "pwd".to_owned(),
            ice_lite: false,
        };
        assert_eq!(params.to_string(), "ufrag pwd");
    }
}
