//! Endpoint configuration.
//!
//! ```
//! use rtc_endpoint::endpoint::configuration::RTCConfigurationBuilder;
//! use rtc_endpoint::endpoint::configuration::negotiation_role::RTCNegotiationRole;
//! use rtc_endpoint::track::{RTCTrack, RtpCodecKind};
//!
//! let config = RTCConfigurationBuilder::new()
//!     .with_role(RTCNegotiationRole::Offerer)
//!     .with_outbound_tracks(vec![RTCTrack::new_outbound(
//!         "audio-1",
//!         RtpCodecKind::Audio,
//!         "opus",
//!         "stream-1",
//!     )])
//!     .build();
//! assert_eq!(config.role(), RTCNegotiationRole::Offerer);
//! ```

pub mod media_engine;
pub mod negotiation_role;
pub mod setting_engine;

use crate::media::stage::PayloadStageRegistry;
use crate::track::RTCTrack;
use media_engine::MediaEngine;
use negotiation_role::RTCNegotiationRole;
use setting_engine::SettingEngine;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

/// A Configuration defines how an endpoint negotiates and which tracks it
/// starts with. Configurations are treated as readonly once built.
#[derive(Default, Debug, Clone)]
pub struct RTCConfiguration {
    /// role selects whether the endpoint answers remote offers or sends its own.
    pub(crate) role: RTCNegotiationRole,

    /// inbound_tracks are the tracks expected from the remote peer at startup.
    pub(crate) inbound_tracks: Vec<RTCTrack>,

    /// outbound_tracks are the tracks this endpoint sends at startup.
    pub(crate) outbound_tracks: Vec<RTCTrack>,

    /// media_engine lists the codecs and header extensions to negotiate. The
    /// default codecs are used when it has none.
    pub(crate) media_engine: MediaEngine,

    pub(crate) setting_engine: SettingEngine,

    /// payload_stages maps encodings to the stage their inbound media needs.
    pub(crate) payload_stages: PayloadStageRegistry,
}

impl RTCConfiguration {
    pub fn role(&self) -> RTCNegotiationRole {
        self.role
    }

    pub fn inbound_tracks(&self) -> &[RTCTrack] {
        &self.inbound_tracks
    }

    pub fn outbound_tracks(&self) -> &[RTCTrack] {
        &self.outbound_tracks
    }

    pub fn media_engine(&self) -> &MediaEngine {
        &self.media_engine
    }

    pub fn setting_engine(&self) -> &SettingEngine {
        &self.setting_engine
    }
}

#[derive(Default)]
pub struct RTCConfigurationBuilder {
    role: RTCNegotiationRole,
    inbound_tracks: Vec<RTCTrack>,
    outbound_tracks: Vec<RTCTrack>,
    media_engine: MediaEngine,
    setting_engine: SettingEngine,
    payload_stages: Option<PayloadStageRegistry>,
}

impl RTCConfigurationBuilder {
    pub fn new() -> Self {
        RTCConfigurationBuilder::default()
    }

    pub fn with_role(mut self, role: RTCNegotiationRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_inbound_tracks(mut self, inbound_tracks: Vec<RTCTrack>) -> Self {
        self.inbound_tracks = inbound_tracks;
        self
    }

    pub fn with_outbound_tracks(mut self, outbound_tracks: Vec<RTCTrack>) -> Self {
        self.outbound_tracks = outbound_tracks;
        self
    }

    pub fn with_media_engine(mut self, media_engine: MediaEngine) -> Self {
        self.media_engine = media_engine;
        self
    }

    pub fn with_setting_engine(mut self, setting_engine: SettingEngine) -> Self {
        self.setting_engine = setting_engine;
        self
    }

    pub fn with_payload_stages(mut self, payload_stages: PayloadStageRegistry) -> Self {
        self.payload_stages = Some(payload_stages);
        self
    }

    /// Builds the configuration. An unspecified role means `Answerer`.
    pub fn build(self) -> RTCConfiguration {
        let role = match self.role {
            RTCNegotiationRole::Unspecified => RTCNegotiationRole::Answerer,
            role => role,
        };

        RTCConfiguration {
            role,
            inbound_tracks: self.inbound_tracks,
            outbound_tracks: self.outbound_tracks,
            media_engine: self.media_engine,
            setting_engine: self.setting_engine,
            payload_stages: self.payload_stages.unwrap_or_default(),
        }
    }
}
