//! Messages exchanged with the application, the remote peer and the
//! collaborators driven by the endpoint.

use crate::endpoint::transport::{RTCIceCandidateInit, RTCIceParameters};
use crate::media::codec::RTCRtpHeaderExtensionParameters;
use crate::media::stage::PayloadStage;
use crate::track::{RTCTrack, SSRC, TrackId};
use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};
use std::collections::HashMap;

/// Signaling exchanged with the remote peer, in the JSON shape browsers use:
///
/// ```json
/// {"type":"offer","sdp":"v=0\r\n..."}
/// {"type":"candidate","candidate":{"candidate":"candidate:...","sdpMid":"0","sdpMLineIndex":0,"usernameFragment":null}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RTCSignal {
    #[serde(rename = "offer")]
    SdpOffer { sdp: String },
    #[serde(rename = "answer")]
    SdpAnswer { sdp: String },
    Candidate { candidate: RTCIceCandidateInit },
}

impl RTCSignal {
    pub fn offer(sdp: impl Into<String>) -> Self {
        RTCSignal::SdpOffer { sdp: sdp.into() }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        RTCSignal::SdpAnswer { sdp: sdp.into() }
    }

    pub fn candidate(candidate: RTCIceCandidateInit) -> Self {
        RTCSignal::Candidate { candidate }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| Error::ErrInvalidSignal(err.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::ErrInvalidSignal(err.to_string()))
    }
}

/// Input of `handle_read`: application intents and remote signaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCEndpointMessage {
    Signal(RTCSignal),
    AddTracks(Vec<RTCTrack>),
    RemoveTracks(Vec<TrackId>),
    EnableTrack(TrackId),
    DisableTrack(TrackId),
}

/// Output of `poll_read`: signaling for the remote peer and track lifecycle
/// notifications for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCEndpointNotification {
    Signal(RTCSignal),
    /// An inbound track was attributed to a detected stream, with its encoding.
    NewTrack(TrackId, String),
    /// Inbound tracks discovered in a remote offer.
    NewTracks(Vec<RTCTrack>),
    /// mid to track id of the round that just completed.
    MidToTrack(HashMap<String, TrackId>),
    VoiceActivity(TrackId, u8),
}

/// Input of `handle_write`: wire a track to the media session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCPortRequest {
    Inbound(TrackId),
    Outbound(TrackId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCTransportCommand {
    /// Start gathering local candidates for the current round.
    GatherCandidates,
    SetRemoteCredentials(RTCIceParameters),
    /// A remote candidate with the m-line index it was signaled for.
    SetRemoteCandidate(String, u16),
    /// Restart ICE and DTLS; a new round follows.
    RestartStream,
}

#[derive(Debug)]
pub enum RTCMediaCommand {
    /// Route media received on `ssrc` to the track, through `stage` when the
    /// encoding needs one.
    LinkInbound {
        track_id: TrackId,
        ssrc: SSRC,
        encoding: String,
        stage: Option<Box<dyn PayloadStage>>,
    },
    /// Configure the media session output of the track's SSRC.
    LinkOutbound {
        track_id: TrackId,
        ssrc: SSRC,
        payload_type: u8,
        clock_rate: u32,
        encoding: String,
        extensions: Vec<RTCRtpHeaderExtensionParameters>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCGateCommand {
    Create { enabled: bool },
    Enable,
    Disable,
    Remove,
}

/// Output of `poll_write`.
#[derive(Debug)]
pub enum RTCEndpointCommand {
    Transport(RTCTransportCommand),
    Media(RTCMediaCommand),
    Gate(TrackId, RTCGateCommand),
}

impl From<RTCTransportCommand> for RTCEndpointCommand {
    fn from(command: RTCTransportCommand) -> Self {
        RTCEndpointCommand::Transport(command)
    }
}

impl From<RTCMediaCommand> for RTCEndpointCommand {
    fn from(command: RTCMediaCommand) -> Self {
        RTCEndpointCommand::Media(command)
    }
}
