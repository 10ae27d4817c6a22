//! The endpoint controller.
//!
//! [`RTCEndpoint`] owns the track registry, the negotiation state machine and
//! the identifier tables. It is driven through [`sansio::Protocol`]:
//!
//! - `handle_read` takes application intents and remote signaling
//!   ([`RTCEndpointMessage`](message::RTCEndpointMessage)); `poll_read`
//!   yields signaling for the remote peer and track notifications.
//! - `handle_write` takes media-port activation requests; `poll_write` yields
//!   commands for the transport adapter, the media session and track gates.
//! - `handle_event` takes what those collaborators report; `poll_event`
//!   yields state changes and diagnostics.
//!
//! Nothing blocks and nothing runs in the background: every output is
//! produced while one input is handled, in production order.
//!
//! ```
//! use rtc_endpoint::endpoint::RTCEndpoint;
//! use rtc_endpoint::endpoint::configuration::RTCConfigurationBuilder;
//! use rtc_endpoint::endpoint::event::{RTCEvent, RTCTransportEvent};
//! use rtc_endpoint::endpoint::transport::{RTCDtlsFingerprint, RTCIceParameters};
//! use rtc_endpoint::sansio::Protocol;
//! use rtc_endpoint::track::{RTCTrack, RtpCodecKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RTCConfigurationBuilder::new()
//!     .with_outbound_tracks(vec![RTCTrack::new_outbound(
//!         "audio-1",
//!         RtpCodecKind::Audio,
//!         "opus",
//!         "stream-1",
//!     )])
//!     .build();
//! let mut endpoint = RTCEndpoint::new(config)?;
//!
//! endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::LocalCredentialsReady(
//!     RTCIceParameters {
//!         username_fragment: "ufrag".to_owned(),
//!         password: "password".to_owned(),
//!         ice_lite: false,
//!     },
//! )))?;
//! endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::FingerprintReady(
//!     RTCDtlsFingerprint {
//!         algorithm: "sha-256".to_owned(),
//!         value: "AB:CD".to_owned(),
//!     },
//! )))?;
//!
//! // an answerer waits for the remote offer
//! assert!(endpoint.poll_read().is_none());
//! # Ok(())
//! # }
//! ```

pub mod configuration;
pub mod event;
pub mod message;
pub mod sdp;
pub mod state;
pub mod transport;

pub(crate) mod candidate;
pub(crate) mod handler;
pub(crate) mod internal;
pub(crate) mod negotiation;
pub(crate) mod routing;

use crate::media::codec::RTCRtpHeaderExtensionParameters;
use crate::track::{RTCTrack, RTCTrackDirection, TrackId, TrackRegistry};
use configuration::RTCConfiguration;
use configuration::negotiation_role::RTCNegotiationRole;
use event::RTCEndpointEvent;
use internal::PendingOffer;
use log::{debug, info};
use message::{RTCEndpointCommand, RTCEndpointNotification};
use sdp::RTCSessionDescription;
use shared::error::{Error, Result};
use shared::util::math_rand_alpha_number;
use state::{RTCIceGatheringState, RTCNegotiationState};
use std::collections::{HashMap, HashSet, VecDeque};
use transport::{RTCDtlsFingerprint, RTCIceParameters};

/// Output queues, drained by the `poll_*` methods.
#[derive(Default, Debug)]
pub(crate) struct EndpointContext {
    pub(crate) read_outs: VecDeque<RTCEndpointNotification>,
    pub(crate) write_outs: VecDeque<RTCEndpointCommand>,
    pub(crate) event_outs: VecDeque<RTCEndpointEvent>,
}

/// Signaling and track-consistency core of one media session.
#[derive(Debug)]
pub struct RTCEndpoint {
    pub(crate) configuration: RTCConfiguration,
    pub(crate) registry: TrackRegistry,
    pub(crate) cname: String,

    pub(crate) negotiation_state: RTCNegotiationState,
    pub(crate) ice_gathering_state: RTCIceGatheringState,

    pub(crate) local_credentials: Option<RTCIceParameters>,
    pub(crate) fingerprint: Option<RTCDtlsFingerprint>,

    /// Offerer: the local offer of the current round went out.
    pub(crate) offer_sent: bool,
    /// Offerer: the offer awaiting its answer.
    pub(crate) pending_local_offer: Option<PendingOffer>,
    /// Offerer: a restart dropped an outstanding offer, so its answer may
    /// still arrive and must be ignored.
    pub(crate) stale_offer: bool,
    /// Answerer: a validated remote offer waiting for local credentials or
    /// the fingerprint.
    pub(crate) pending_remote_offer: Option<RTCSessionDescription>,

    pub(crate) current_local_description: Option<RTCSessionDescription>,
    pub(crate) current_remote_description: Option<RTCSessionDescription>,

    /// Local candidates of the current round not yet safe to disclose, or
    /// kept for re-disclosure.
    pub(crate) buffered_candidates: Vec<String>,

    /// Offerer: every mid put in an offer so far.
    pub(crate) used_mids: HashSet<String>,

    /// Header extensions negotiated per mid in the last completed round.
    pub(crate) negotiated_extensions: HashMap<String, Vec<RTCRtpHeaderExtensionParameters>>,

    /// Tracks whose gate was created.
    pub(crate) gates: HashSet<TrackId>,

    pub(crate) context: EndpointContext,
}

impl RTCEndpoint {
    /// Creates an endpoint and registers the configured tracks. A media
    /// engine without codecs is given the default ones.
    pub fn new(mut configuration: RTCConfiguration) -> Result<Self> {
        if configuration.media_engine.audio_codecs.is_empty()
            && configuration.media_engine.video_codecs.is_empty()
        {
            configuration.media_engine.register_default_codecs()?;
        }

        let cname = if configuration.setting_engine.cname.is_empty() {
            math_rand_alpha_number(16)
        } else {
            configuration.setting_engine.cname.clone()
        };

        let inbound_tracks = std::mem::take(&mut configuration.inbound_tracks);
        let outbound_tracks = std::mem::take(&mut configuration.outbound_tracks);

        let mut endpoint = Self {
            configuration,
            registry: TrackRegistry::new(),
            cname,
            negotiation_state: RTCNegotiationState::Idle,
            ice_gathering_state: RTCIceGatheringState::New,
            local_credentials: None,
            fingerprint: None,
            offer_sent: false,
            pending_local_offer: None,
            stale_offer: false,
            pending_remote_offer: None,
            current_local_description: None,
            current_remote_description: None,
            buffered_candidates: vec![],
            used_mids: HashSet::new(),
            negotiated_extensions: HashMap::new(),
            gates: HashSet::new(),
            context: EndpointContext::default(),
        };

        endpoint.check_outbound_codecs(&outbound_tracks)?;
        endpoint
            .registry
            .register_tracks(RTCTrackDirection::Inbound, inbound_tracks)?;
        endpoint
            .registry
            .register_tracks(RTCTrackDirection::Outbound, outbound_tracks)?;

        info!(
            "new {} endpoint with {} inbound and {} outbound tracks",
            endpoint.configuration.role,
            endpoint.registry.inbound_tracks().len(),
            endpoint.registry.outbound_tracks().len()
        );

        Ok(endpoint)
    }

    pub fn role(&self) -> RTCNegotiationRole {
        self.configuration.role
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn negotiation_state(&self) -> RTCNegotiationState {
        self.negotiation_state
    }

    pub fn ice_gathering_state(&self) -> RTCIceGatheringState {
        self.ice_gathering_state
    }

    /// Description this endpoint sent in the last completed round.
    pub fn current_local_description(&self) -> Option<&RTCSessionDescription> {
        self.current_local_description.as_ref()
    }

    /// Description the remote peer sent in the last completed round.
    pub fn current_remote_description(&self) -> Option<&RTCSessionDescription> {
        self.current_remote_description.as_ref()
    }

    /// Outbound tracks must name an encoding the media engine can send.
    pub(crate) fn check_outbound_codecs(&self, tracks: &[RTCTrack]) -> Result<()> {
        for track in tracks {
            let codecs = self
                .configuration
                .media_engine
                .codecs_for_encoding(track.kind(), track.encoding());
            if codecs.is_empty() {
                debug!(
                    "no {} codec for encoding {:?} of track {}",
                    track.kind(),
                    track.encoding(),
                    track.id()
                );
                return Err(Error::ErrCodecNotFound);
            }
        }
        Ok(())
    }

    pub(crate) fn set_negotiation_state(&mut self, state: RTCNegotiationState) {
        if self.negotiation_state != state {
            info!("negotiation state changed to {state}");
            self.negotiation_state = state;
            self.context
                .event_outs
                .push_back(RTCEndpointEvent::OnNegotiationStateChangeEvent(state));
        }
    }

    pub(crate) fn set_ice_gathering_state(&mut self, state: RTCIceGatheringState) {
        if self.ice_gathering_state != state {
            info!("ice gathering state changed to {state}");
            self.ice_gathering_state = state;
            self.context
                .event_outs
                .push_back(RTCEndpointEvent::OnIceGatheringStateChangeEvent(state));
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.negotiation_state == RTCNegotiationState::Closed
    }
}
