use super::RTCEndpoint;
use crate::endpoint::event::{RTCEndpointEvent, RTCEvent};
use crate::endpoint::message::{
    RTCEndpointCommand, RTCEndpointMessage, RTCEndpointNotification, RTCGateCommand,
    RTCPortRequest, RTCSignal,
};
use crate::endpoint::state::RTCNegotiationState;
use log::{info, trace};
use shared::error::{Error, Result};
use std::time::Instant;

impl sansio::Protocol<RTCEndpointMessage, RTCPortRequest, RTCEvent> for RTCEndpoint {
    type Rout = RTCEndpointNotification;
    type Wout = RTCEndpointCommand;
    type Eout = RTCEndpointEvent;
    type Error = Error;
    type Time = Instant;

    fn handle_read(&mut self, msg: RTCEndpointMessage) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        trace!("handle_read {msg:?}");

        match msg {
            RTCEndpointMessage::Signal(RTCSignal::SdpOffer { sdp }) => {
                self.handle_remote_offer(sdp)
            }
            RTCEndpointMessage::Signal(RTCSignal::SdpAnswer { sdp }) => {
                self.handle_remote_answer(sdp)
            }
            RTCEndpointMessage::Signal(RTCSignal::Candidate { candidate }) => {
                self.handle_remote_candidate(candidate)
            }
            RTCEndpointMessage::AddTracks(tracks) => self.add_tracks(tracks),
            RTCEndpointMessage::RemoveTracks(ids) => self.remove_tracks(ids),
            RTCEndpointMessage::EnableTrack(id) => self.set_track_enabled(id, true),
            RTCEndpointMessage::DisableTrack(id) => self.set_track_enabled(id, false),
        }
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        self.context.read_outs.pop_front()
    }

    fn handle_write(&mut self, msg: RTCPortRequest) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        trace!("handle_write {msg:?}");

        match msg {
            RTCPortRequest::Inbound(id) => self.activate_inbound_port(id),
            RTCPortRequest::Outbound(id) => self.activate_outbound_port(id),
        }
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        self.context.write_outs.pop_front()
    }

    fn handle_event(&mut self, evt: RTCEvent) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        trace!("handle_event {evt:?}");

        match evt {
            RTCEvent::Transport(event) => self.handle_transport_event(event),
            RTCEvent::Media(event) => self.handle_media_event(event),
        }
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        self.context.event_outs.pop_front()
    }

    fn handle_timeout(&mut self, _now: Instant) -> Result<()> {
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Instant> {
        None
    }

    /// Removes every gate created so far and moves to `Closed`. Outputs
    /// already queued can still be polled.
    fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }

        let mut gates: Vec<_> = self.gates.drain().collect();
        gates.sort();
        for id in gates {
            self.context
                .write_outs
                .push_back(RTCEndpointCommand::Gate(id, RTCGateCommand::Remove));
        }

        self.pending_local_offer = None;
        self.pending_remote_offer = None;
        self.buffered_candidates.clear();
        self.set_negotiation_state(RTCNegotiationState::Closed);
        info!("endpoint closed");

        Ok(())
    }
}
