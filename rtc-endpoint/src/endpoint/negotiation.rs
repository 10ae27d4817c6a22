use super::RTCEndpoint;
use crate::endpoint::configuration::negotiation_role::RTCNegotiationRole;
use crate::endpoint::internal::AnswerPlan;
use crate::endpoint::message::{RTCEndpointNotification, RTCSignal, RTCTransportCommand};
use crate::endpoint::sdp::{
    RTCSdpType, RTCSessionDescription, extract_candidates, extract_ice_credentials,
    get_mid_value,
};
use crate::endpoint::state::{RTCIceGatheringState, RTCNegotiationState};
use crate::endpoint::state::negotiation_state::{StateChangeOp, check_next_negotiation_state};
use crate::track::RTCTrackDirection;
use log::{debug, info, warn};
use shared::error::{Error, Result};

impl RTCEndpoint {
    /// Validates a remote description before anything is applied: every
    /// media section needs a mid and the ICE credentials must be consistent.
    fn validate_remote_description(&self, description: &RTCSessionDescription) -> Result<()> {
        let parsed = match description.parsed() {
            Some(parsed) => parsed,
            None => return Err(Error::SdpInvalidValue("description was not parsed".to_owned())),
        };
        if parsed
            .media_descriptions
            .iter()
            .any(|media| get_mid_value(media).is_none())
        {
            return Err(Error::ErrRemoteDescriptionWithoutMidValue);
        }
        extract_ice_credentials(parsed)?;
        Ok(())
    }

    pub(crate) fn handle_remote_offer(&mut self, sdp: String) -> Result<()> {
        check_next_negotiation_state(
            self.configuration.role,
            self.negotiation_state,
            StateChangeOp::SetRemote,
            RTCSdpType::Offer,
        )?;

        let offer = RTCSessionDescription::offer(sdp)?;
        self.validate_remote_description(&offer)?;
        self.check_answer_plan(&offer)?;

        info!("accept remote offer");
        self.set_negotiation_state(RTCNegotiationState::Pending);
        self.pending_remote_offer = Some(offer);

        self.maybe_negotiate()
    }

    pub(crate) fn handle_remote_answer(&mut self, sdp: String) -> Result<()> {
        if self.configuration.role == RTCNegotiationRole::Offerer
            && self.pending_local_offer.is_none()
            && self.stale_offer
        {
            warn!("discard answer to an offer superseded by a restart");
            return Ok(());
        }

        check_next_negotiation_state(
            self.configuration.role,
            self.negotiation_state,
            StateChangeOp::SetRemote,
            RTCSdpType::Answer,
        )?;
        let pending = match self.pending_local_offer.as_ref() {
            Some(pending) => pending,
            None => return Err(Error::ErrIncorrectSignalingState),
        };

        let answer = RTCSessionDescription::answer(sdp)?;
        self.validate_remote_description(&answer)?;
        if !answer
            .parsed()
            .is_some_and(|parsed| pending.is_answered_by(parsed))
        {
            warn!("discard answer whose media sections do not match the outstanding offer");
            return Ok(());
        }
        let plan = self.apply_answer_sections(pending, &answer)?;

        let offer = match self.pending_local_offer.take() {
            Some(pending) => pending.description,
            None => return Err(Error::ErrIncorrectSignalingState),
        };
        self.commit_plan(&plan);
        self.current_local_description = Some(offer);
        self.set_negotiation_state(RTCNegotiationState::Negotiated);

        self.context
            .read_outs
            .push_back(RTCEndpointNotification::MidToTrack(plan.mid_to_track.clone()));
        self.apply_remote_transport(&answer)?;
        self.current_remote_description = Some(answer);

        Ok(())
    }

    /// Produces the local description of the round once credentials and the
    /// fingerprint are both known.
    pub(crate) fn maybe_negotiate(&mut self) -> Result<()> {
        if self.local_credentials.is_none() || self.fingerprint.is_none() {
            debug!("local description waits for ice credentials and fingerprint");
            return Ok(());
        }

        match self.configuration.role {
            RTCNegotiationRole::Offerer => self.maybe_offer(),
            _ => self.maybe_answer(),
        }
    }

    fn maybe_offer(&mut self) -> Result<()> {
        if self.offer_sent {
            return Ok(());
        }
        if self.registry.is_empty() {
            debug!("nothing to offer yet");
            return Ok(());
        }

        let next = check_next_negotiation_state(
            self.configuration.role,
            self.negotiation_state,
            StateChangeOp::SetLocal,
            RTCSdpType::Offer,
        )?;
        let pending = self.generate_offer()?;

        info!("send offer");
        self.context
            .read_outs
            .push_back(RTCEndpointNotification::Signal(RTCSignal::offer(
                pending.description.sdp.clone(),
            )));
        for section in &pending.sections {
            if let Some(track_id) = &section.track_id {
                let direction = if section.direction.has_send() {
                    RTCTrackDirection::Outbound
                } else {
                    RTCTrackDirection::Inbound
                };
                self.registry
                    .set_mid(direction, track_id, section.mid.clone());
            }
        }
        self.used_mids
            .extend(pending.sections.iter().map(|s| s.mid.clone()));
        self.pending_local_offer = Some(pending);
        self.offer_sent = true;
        self.stale_offer = false;
        self.set_negotiation_state(next);

        self.flush_candidates();
        self.maybe_start_gathering();
        Ok(())
    }

    fn maybe_answer(&mut self) -> Result<()> {
        let offer = match self.pending_remote_offer.take() {
            Some(offer) => offer,
            None => return Ok(()),
        };

        let next = check_next_negotiation_state(
            self.configuration.role,
            self.negotiation_state,
            StateChangeOp::SetLocal,
            RTCSdpType::Answer,
        )?;
        let plan = self.generate_answer(&offer)?;
        self.registry
            .register_tracks(RTCTrackDirection::Inbound, plan.new_tracks.clone())?;
        self.commit_answer(plan, offer, next)
    }

    fn commit_answer(
        &mut self,
        plan: AnswerPlan,
        offer: RTCSessionDescription,
        next: RTCNegotiationState,
    ) -> Result<()> {
        self.commit_plan(&plan);
        self.set_negotiation_state(next);

        if !plan.new_tracks.is_empty() {
            let new_tracks = plan
                .new_tracks
                .iter()
                .filter_map(|t| self.registry.track(RTCTrackDirection::Inbound, t.id()))
                .cloned()
                .collect();
            self.context
                .read_outs
                .push_back(RTCEndpointNotification::NewTracks(new_tracks));
        }
        info!("send answer");
        self.context
            .read_outs
            .push_back(RTCEndpointNotification::Signal(RTCSignal::answer(
                plan.description.sdp.clone(),
            )));
        self.context
            .read_outs
            .push_back(RTCEndpointNotification::MidToTrack(plan.mid_to_track));
        self.current_local_description = Some(plan.description);

        self.apply_remote_transport(&offer)?;
        self.current_remote_description = Some(offer);

        self.maybe_start_gathering();
        if self.ice_gathering_state.has_started() {
            self.flush_candidates();
        }
        Ok(())
    }

    /// Hands the remote credentials and embedded candidates to the transport.
    fn apply_remote_transport(&mut self, remote: &RTCSessionDescription) -> Result<()> {
        let parsed = remote.unmarshal()?;
        if let Some(credentials) = extract_ice_credentials(&parsed)? {
            self.context
                .write_outs
                .push_back(RTCTransportCommand::SetRemoteCredentials(credentials).into());
        }
        for candidate in extract_candidates(&parsed) {
            self.context.write_outs.push_back(
                RTCTransportCommand::SetRemoteCandidate(
                    candidate.candidate,
                    candidate.sdp_mline_index.unwrap_or(0),
                )
                .into(),
            );
        }
        Ok(())
    }

    /// Starts gathering once per round, when there is something to negotiate.
    pub(crate) fn maybe_start_gathering(&mut self) {
        if self.registry.is_empty() || self.ice_gathering_state != RTCIceGatheringState::New {
            return;
        }
        self.context
            .write_outs
            .push_back(RTCTransportCommand::GatherCandidates.into());
        self.set_ice_gathering_state(RTCIceGatheringState::Gathering);
    }
}
