//! Tracks, their negotiated mappings and the registry that owns them.

pub(crate) mod mapping;
pub(crate) mod registry;

use crate::endpoint::configuration::UNSPECIFIED_STR;
use std::fmt;

pub use mapping::RTCTrackMapping;
pub use registry::TrackRegistry;

/// Application-assigned track identifier.
pub type TrackId = String;

/// Transport-level stream identifier.
pub type SSRC = u32;

/// RtpCodecKind determines the type of media a track carries.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RtpCodecKind {
    #[default]
    Unspecified = 0,
    Audio = 1,
    Video = 2,
}

impl From<&str> for RtpCodecKind {
    fn from(raw: &str) -> Self {
        match raw {
            "audio" => RtpCodecKind::Audio,
            "video" => RtpCodecKind::Video,
            _ => RtpCodecKind::Unspecified,
        }
    }
}

impl fmt::Display for RtpCodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RtpCodecKind::Audio => "audio",
            RtpCodecKind::Video => "video",
            RtpCodecKind::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// Direction of a track relative to this endpoint.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RTCTrackDirection {
    #[default]
    Unspecified,
    /// Media sent by the remote peer and received here.
    Inbound,
    /// Media produced here and sent to the remote peer.
    Outbound,
}

const TRACK_DIRECTION_INBOUND_STR: &str = "inbound";
const TRACK_DIRECTION_OUTBOUND_STR: &str = "outbound";

impl From<&str> for RTCTrackDirection {
    fn from(raw: &str) -> Self {
        match raw {
            TRACK_DIRECTION_INBOUND_STR => RTCTrackDirection::Inbound,
            TRACK_DIRECTION_OUTBOUND_STR => RTCTrackDirection::Outbound,
            _ => RTCTrackDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTCTrackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCTrackDirection::Inbound => write!(f, "{TRACK_DIRECTION_INBOUND_STR}"),
            RTCTrackDirection::Outbound => write!(f, "{TRACK_DIRECTION_OUTBOUND_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

/// A unidirectional media flow.
///
/// The `id` is stable for the lifetime of the track. `ssrc` and `encoding`
/// start out unknown for inbound tracks and are filled in once negotiation
/// or stream detection resolves them. Outbound tracks receive their `ssrc`
/// from the registry when they are registered, unless one was provided.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCTrack {
    id: TrackId,
    kind: RtpCodecKind,
    direction: RTCTrackDirection,
    encoding: Option<String>,
    ssrc: Option<SSRC>,
    stream_id: String,
    mid: Option<String>,
    enabled: bool,
}

impl RTCTrack {
    /// Creates a track produced by this endpoint, e.g. `("audio-1", Audio, "OPUS", "stream-1")`.
    pub fn new_outbound(
        id: impl Into<TrackId>,
        kind: RtpCodecKind,
        encoding: impl Into<String>,
        stream_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            direction: RTCTrackDirection::Outbound,
            encoding: Some(encoding.into()),
            stream_id: stream_id.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Creates a track expected from the remote peer. The encoding is resolved
    /// once the remote side announces or starts sending the stream.
    pub fn new_inbound(
        id: impl Into<TrackId>,
        kind: RtpCodecKind,
        stream_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            direction: RTCTrackDirection::Inbound,
            stream_id: stream_id.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Pins the SSRC instead of letting the registry allocate one.
    pub fn with_ssrc(mut self, ssrc: SSRC) -> Self {
        self.ssrc = Some(ssrc);
        self
    }

    /// Sets the initial state of the track's gate.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn kind(&self) -> RtpCodecKind {
        self.kind
    }

    pub fn direction(&self) -> RTCTrackDirection {
        self.direction
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn ssrc(&self) -> Option<SSRC> {
        self.ssrc
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Media section the track was last placed in.
    pub fn mid(&self) -> Option<&str> {
        self.mid.as_deref()
    }

    /// Initial state of the track's gate.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_ssrc(&mut self, ssrc: SSRC) {
        self.ssrc = Some(ssrc);
    }

    pub(crate) fn set_encoding(&mut self, encoding: String) {
        self.encoding = Some(encoding);
    }

    pub(crate) fn set_mid(&mut self, mid: String) {
        self.mid = Some(mid);
    }

    pub(crate) fn set_direction(&mut self, direction: RTCTrackDirection) {
        self.direction = direction;
    }
}
