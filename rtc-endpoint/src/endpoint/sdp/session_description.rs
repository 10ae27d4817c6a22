use std::fmt::Display;
use std::io::Cursor;

use sdp::description::session::SessionDescription;
use serde::{Deserialize, Serialize};

use super::sdp_type::RTCSdpType;
use shared::error::{Error, Result};

/// A session description together with its type, in the JSON shape
/// browsers exchange over signaling channels:
///
/// ```json
/// {"type":"offer","sdp":"v=0\r\n..."}
/// ```
///
/// The constructors validate the SDP text and keep the parsed form around,
/// so a description that exists was parsable.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RTCSessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,

    pub sdp: String,

    /// Parsed form of `sdp`, never serialized.
    #[serde(skip)]
    pub(crate) parsed: Option<SessionDescription>,
}

impl Display for RTCSessionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type: {}, sdp:\n{}",
            self.sdp_type,
            self.sdp.replace("\r\n", "\n")
        )
    }
}

impl RTCSessionDescription {
    /// Wraps and validates an answer.
    pub fn answer(sdp: String) -> Result<RTCSessionDescription> {
        Self::new(RTCSdpType::Answer, sdp)
    }

    /// Wraps and validates an offer.
    pub fn offer(sdp: String) -> Result<RTCSessionDescription> {
        Self::new(RTCSdpType::Offer, sdp)
    }

    pub(crate) fn from_parsed(
        sdp_type: RTCSdpType,
        parsed: SessionDescription,
    ) -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type,
            sdp: parsed.marshal(),
            parsed: Some(parsed),
        }
    }

    fn new(sdp_type: RTCSdpType, sdp: String) -> Result<RTCSessionDescription> {
        let mut desc = RTCSessionDescription {
            sdp,
            sdp_type,
            parsed: None,
        };

        let parsed = desc.unmarshal()?;
        desc.parsed = Some(parsed);

        Ok(desc)
    }

    /// Parses the SDP text. Descriptions built by the constructors return
    /// their cached parse.
    pub fn unmarshal(&self) -> Result<SessionDescription> {
        if let Some(parsed) = &self.parsed {
            return Ok(parsed.clone());
        }

        let mut reader = Cursor::new(self.sdp.as_bytes());
        SessionDescription::unmarshal(&mut reader)
            .map_err(|err| Error::SdpInvalidSyntax(err.to_string()))
    }

    pub(crate) fn parsed(&self) -> Option<&SessionDescription> {
        self.parsed.as_ref()
    }
}
