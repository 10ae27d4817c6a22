use super::RTCEndpoint;
use crate::endpoint::configuration::negotiation_role::RTCNegotiationRole;
use crate::endpoint::event::RTCTransportEvent;
use crate::endpoint::message::{RTCEndpointNotification, RTCSignal, RTCTransportCommand};
use crate::endpoint::sdp::{ATTR_KEY_CANDIDATE, get_mid_value};
use crate::endpoint::state::RTCIceGatheringState;
use crate::endpoint::transport::RTCIceCandidateInit;
use log::{debug, trace};
use shared::error::Result;

impl RTCEndpoint {
    pub(crate) fn handle_transport_event(&mut self, event: RTCTransportEvent) -> Result<()> {
        match event {
            RTCTransportEvent::LocalCredentialsReady(credentials) => {
                trace!("local ice ufrag {}", credentials.username_fragment);
                self.local_credentials = Some(credentials);
                self.maybe_negotiate()
            }
            RTCTransportEvent::FingerprintReady(fingerprint) => {
                trace!("local fingerprint {} {}", fingerprint.algorithm, fingerprint.value);
                self.fingerprint = Some(fingerprint);
                self.maybe_negotiate()
            }
            RTCTransportEvent::CandidateDiscovered(candidate) => {
                self.handle_local_candidate(candidate);
                Ok(())
            }
            RTCTransportEvent::GatheringComplete => {
                self.set_ice_gathering_state(RTCIceGatheringState::Complete);
                Ok(())
            }
        }
    }

    /// Discloses a local candidate when it is safe for the current round,
    /// otherwise keeps it for the next flush.
    fn handle_local_candidate(&mut self, candidate: String) {
        let disclose = match self.configuration.role {
            RTCNegotiationRole::Offerer => self.offer_sent,
            _ => self.ice_gathering_state.has_started(),
        };

        if disclose {
            self.disclose_candidate(candidate);
        } else {
            trace!("buffer local candidate {candidate}");
            self.buffered_candidates.push(candidate);
        }
    }

    /// Discloses every buffered candidate, in discovery order.
    pub(crate) fn flush_candidates(&mut self) {
        let candidates = std::mem::take(&mut self.buffered_candidates);
        if !candidates.is_empty() {
            debug!("flush {} buffered candidates", candidates.len());
        }
        for candidate in candidates {
            self.disclose_candidate(candidate);
        }
    }

    fn disclose_candidate(&mut self, candidate: String) {
        let prefix = format!("{ATTR_KEY_CANDIDATE}:");
        let candidate = if candidate.starts_with(&prefix) {
            candidate
        } else {
            format!("{prefix}{candidate}")
        };

        let init = RTCIceCandidateInit {
            candidate,
            sdp_mid: self.candidate_mid(),
            sdp_mline_index: Some(0),
            username_fragment: self
                .local_credentials
                .as_ref()
                .map(|c| c.username_fragment.clone()),
        };
        self.context
            .read_outs
            .push_back(RTCEndpointNotification::Signal(RTCSignal::candidate(init)));
    }

    /// Every section is bundled, so candidates are signaled against the
    /// first accepted one.
    fn candidate_mid(&self) -> Option<String> {
        if let Some(pending) = &self.pending_local_offer {
            return pending.sections.first().map(|s| s.mid.clone());
        }

        self.current_local_description
            .as_ref()
            .and_then(|d| d.parsed())
            .and_then(|d| {
                d.media_descriptions
                    .iter()
                    .filter(|m| m.media_name.port.value != 0)
                    .find_map(get_mid_value)
                    .map(|mid| mid.to_owned())
            })
    }

    pub(crate) fn handle_remote_candidate(&mut self, candidate: RTCIceCandidateInit) -> Result<()> {
        trace!("remote candidate {}", candidate.candidate);
        self.context.write_outs.push_back(
            RTCTransportCommand::SetRemoteCandidate(
                candidate.candidate,
                candidate.sdp_mline_index.unwrap_or(0),
            )
            .into(),
        );
        Ok(())
    }
}
