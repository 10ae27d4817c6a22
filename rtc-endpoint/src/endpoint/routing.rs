use super::RTCEndpoint;
use crate::endpoint::event::{RTCEndpointEvent, RTCMediaEvent};
use crate::endpoint::message::{
    RTCEndpointCommand, RTCEndpointNotification, RTCGateCommand, RTCMediaCommand,
    RTCTransportCommand,
};
use crate::endpoint::state::{RTCIceGatheringState, RTCNegotiationState};
use crate::track::{RTCTrack, RTCTrackDirection, TrackId};
use log::{debug, info, warn};
use shared::error::{Error, Result};

impl RTCEndpoint {
    pub(crate) fn add_tracks(&mut self, tracks: Vec<RTCTrack>) -> Result<()> {
        if tracks.is_empty() {
            debug!("ignore empty track batch");
            return Ok(());
        }

        self.check_outbound_codecs(&tracks)?;
        let count = tracks.len();
        self.registry
            .register_tracks(RTCTrackDirection::Outbound, tracks)?;
        info!("added {count} outbound tracks");

        self.restart_stream();
        Ok(())
    }

    pub(crate) fn remove_tracks(&mut self, ids: Vec<TrackId>) -> Result<()> {
        let removed = self.registry.remove_tracks(&ids);
        if removed.is_empty() {
            debug!("no track removed, keep the current round");
            return Ok(());
        }

        for track in &removed {
            if self.gates.remove(track.id()) {
                self.context.write_outs.push_back(RTCEndpointCommand::Gate(
                    track.id().clone(),
                    RTCGateCommand::Remove,
                ));
            }
        }
        info!("removed {} outbound tracks", removed.len());

        self.restart_stream();
        Ok(())
    }

    pub(crate) fn set_track_enabled(&mut self, id: TrackId, enabled: bool) -> Result<()> {
        if !self.gates.contains(&id) {
            debug!("track {id} has no gate");
        }
        let command = if enabled {
            RTCGateCommand::Enable
        } else {
            RTCGateCommand::Disable
        };
        self.context
            .write_outs
            .push_back(RTCEndpointCommand::Gate(id, command));
        Ok(())
    }

    /// Restarts ICE and DTLS so the next offer/answer exchange starts from
    /// scratch. Whatever the previous round left in flight is dropped.
    pub(crate) fn restart_stream(&mut self) {
        self.context
            .write_outs
            .push_back(RTCTransportCommand::RestartStream.into());

        if self.pending_local_offer.take().is_some() {
            self.stale_offer = true;
        }
        self.offer_sent = false;
        self.pending_remote_offer = None;
        self.buffered_candidates.clear();
        self.local_credentials = None;

        self.set_ice_gathering_state(RTCIceGatheringState::New);
        if self.negotiation_state == RTCNegotiationState::Negotiated {
            self.set_negotiation_state(RTCNegotiationState::Pending);
        }
        self.context
            .event_outs
            .push_back(RTCEndpointEvent::OnNegotiationNeededEvent);
    }

    pub(crate) fn activate_inbound_port(&mut self, id: TrackId) -> Result<()> {
        let track = self
            .registry
            .track(RTCTrackDirection::Inbound, &id)
            .ok_or_else(|| Error::ErrTrackNotFound(id.clone()))?;
        let (ssrc, encoding) = match (track.ssrc(), track.encoding()) {
            (Some(ssrc), Some(encoding)) => (ssrc, encoding.to_owned()),
            _ => return Err(Error::ErrTrackSsrcUnresolved(id)),
        };
        let enabled = track.enabled();
        let stage = self.configuration.payload_stages.stage_for(&encoding);
        if let Some(stage) = &stage {
            debug!("track {id} goes through {}", stage.name());
        }

        self.context.write_outs.push_back(
            RTCMediaCommand::LinkInbound {
                track_id: id.clone(),
                ssrc,
                encoding,
                stage,
            }
            .into(),
        );
        self.create_gate(id, enabled);
        Ok(())
    }

    pub(crate) fn activate_outbound_port(&mut self, id: TrackId) -> Result<()> {
        let track = self
            .registry
            .track(RTCTrackDirection::Outbound, &id)
            .ok_or_else(|| Error::ErrTrackNotFound(id.clone()))?;
        let enabled = track.enabled();
        let ssrc = track
            .ssrc()
            .ok_or_else(|| Error::ErrTrackSsrcUnresolved(id.clone()))?;
        let mapping = self
            .registry
            .current_mapping_for(&id)
            .ok_or_else(|| Error::ErrTrackNotNegotiated(id.clone()))?;
        let extensions = self
            .negotiated_extensions
            .get(&mapping.mid)
            .cloned()
            .unwrap_or_default();

        let command = RTCMediaCommand::LinkOutbound {
            track_id: id.clone(),
            ssrc,
            payload_type: mapping.payload_type,
            clock_rate: mapping.clock_rate,
            encoding: mapping.encoding_name.clone(),
            extensions,
        };
        self.context.write_outs.push_back(command.into());
        self.create_gate(id, enabled);
        Ok(())
    }

    fn create_gate(&mut self, id: TrackId, enabled: bool) {
        self.gates.insert(id.clone());
        self.context
            .write_outs
            .push_back(RTCEndpointCommand::Gate(id, RTCGateCommand::Create { enabled }));
    }

    pub(crate) fn handle_media_event(&mut self, event: RTCMediaEvent) -> Result<()> {
        match event {
            RTCMediaEvent::NewStreamDetected { ssrc, payload_type } => {
                match self.registry.resolve_inbound_stream(ssrc, payload_type) {
                    Ok(track) => {
                        let notification = RTCEndpointNotification::NewTrack(
                            track.id().clone(),
                            track.encoding().unwrap_or_default().to_owned(),
                        );
                        self.context.read_outs.push_back(notification);
                    }
                    Err(err) => {
                        warn!("stream {ssrc} with payload type {payload_type}: {err}");
                        self.context
                            .event_outs
                            .push_back(RTCEndpointEvent::OnUnresolvedStreamEvent {
                                ssrc,
                                payload_type,
                            });
                    }
                }
            }
            RTCMediaEvent::VoiceActivity { ssrc, level } => {
                match self.registry.inbound_track_by_ssrc(ssrc) {
                    Some(track) => {
                        let notification =
                            RTCEndpointNotification::VoiceActivity(track.id().clone(), level);
                        self.context.read_outs.push_back(notification);
                    }
                    None => debug!("voice activity on unknown ssrc {ssrc}"),
                }
            }
        }
        Ok(())
    }
}
