//! Events flowing into and out of the endpoint.
//!
//! [`RTCEvent`] is what the transport adapter and the media session report
//! back through `handle_event`. [`RTCEndpointEvent`] is what the application
//! polls with `poll_event`.
//!
//! ```no_run
//! use rtc_endpoint::endpoint::event::RTCEndpointEvent;
//!
//! # fn handle_event(event: RTCEndpointEvent) {
//! match event {
//!     RTCEndpointEvent::OnNegotiationNeededEvent => println!("a new round is needed"),
//!     RTCEndpointEvent::OnNegotiationStateChangeEvent(state) => println!("negotiation {state}"),
//!     RTCEndpointEvent::OnUnresolvedStreamEvent { ssrc, .. } => println!("unknown ssrc {ssrc}"),
//!     _ => {}
//! }
//! # }
//! ```

use crate::endpoint::state::{RTCIceGatheringState, RTCNegotiationState};
use crate::endpoint::transport::{RTCDtlsFingerprint, RTCIceParameters};
use crate::track::SSRC;

/// Reported by the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCTransportEvent {
    /// Local ICE parameters for the current round are available.
    LocalCredentialsReady(RTCIceParameters),
    /// The local DTLS certificate fingerprint is available.
    FingerprintReady(RTCDtlsFingerprint),
    /// A local candidate was discovered, as an `a=candidate` value.
    CandidateDiscovered(String),
    GatheringComplete,
}

/// Reported by the media session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCMediaEvent {
    /// RTP arrived on an SSRC not seen before.
    NewStreamDetected { ssrc: SSRC, payload_type: u8 },
    /// Audio level of an inbound stream, in -dBov.
    VoiceActivity { ssrc: SSRC, level: u8 },
}

/// Input of `handle_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCEvent {
    Transport(RTCTransportEvent),
    Media(RTCMediaEvent),
}

impl From<RTCTransportEvent> for RTCEvent {
    fn from(event: RTCTransportEvent) -> Self {
        RTCEvent::Transport(event)
    }
}

impl From<RTCMediaEvent> for RTCEvent {
    fn from(event: RTCMediaEvent) -> Self {
        RTCEvent::Media(event)
    }
}

/// Output of `poll_event`.
#[allow(clippy::enum_variant_names)]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum RTCEndpointEvent {
    /// Tracks changed and the transport was restarted; a new round follows.
    #[default]
    OnNegotiationNeededEvent,
    OnNegotiationStateChangeEvent(RTCNegotiationState),
    OnIceGatheringStateChangeEvent(RTCIceGatheringState),
    /// Media arrived for an SSRC that no negotiated media section announced.
    /// The stream stays unattributed until a later round resolves it.
    OnUnresolvedStreamEvent { ssrc: SSRC, payload_type: u8 },
}
