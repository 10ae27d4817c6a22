use crate::endpoint::configuration::UNSPECIFIED_STR;
use crate::endpoint::configuration::negotiation_role::RTCNegotiationRole;
use crate::endpoint::sdp::RTCSdpType;
use shared::error::{Error, Result};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum StateChangeOp {
    SetLocal,
    SetRemote,
}

impl fmt::Display for StateChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StateChangeOp::SetLocal => write!(f, "SetLocal"),
            StateChangeOp::SetRemote => write!(f, "SetRemote"),
        }
    }
}

/// Progress of the offer/answer exchange.
///
/// An answerer moves `Idle → Pending` when it accepts a remote offer and
/// `Pending → Negotiated` once its answer is out. An offerer moves
/// `Idle → Pending` when its offer is out and `Pending → Negotiated` when the
/// remote answer is applied. Adding or removing tracks after a completed
/// round moves back to `Pending`.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCNegotiationState {
    #[default]
    Unspecified,

    /// No description has been exchanged yet.
    Idle,

    /// A round is under way: a description is outstanding, or track changes
    /// are waiting for the next round.
    Pending,

    /// The last round completed; mappings are current.
    Negotiated,

    /// The endpoint was closed.
    Closed,
}

const NEGOTIATION_STATE_IDLE_STR: &str = "idle";
const NEGOTIATION_STATE_PENDING_STR: &str = "pending";
const NEGOTIATION_STATE_NEGOTIATED_STR: &str = "negotiated";
const NEGOTIATION_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCNegotiationState {
    fn from(raw: &str) -> Self {
        match raw {
            NEGOTIATION_STATE_IDLE_STR => RTCNegotiationState::Idle,
            NEGOTIATION_STATE_PENDING_STR => RTCNegotiationState::Pending,
            NEGOTIATION_STATE_NEGOTIATED_STR => RTCNegotiationState::Negotiated,
            NEGOTIATION_STATE_CLOSED_STR => RTCNegotiationState::Closed,
            _ => RTCNegotiationState::Unspecified,
        }
    }
}

impl fmt::Display for RTCNegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCNegotiationState::Idle => NEGOTIATION_STATE_IDLE_STR,
            RTCNegotiationState::Pending => NEGOTIATION_STATE_PENDING_STR,
            RTCNegotiationState::Negotiated => NEGOTIATION_STATE_NEGOTIATED_STR,
            RTCNegotiationState::Closed => NEGOTIATION_STATE_CLOSED_STR,
            RTCNegotiationState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// Validates applying a description of `sdp_type` in `cur` for the given role
/// and returns the state to move to.
pub(crate) fn check_next_negotiation_state(
    role: RTCNegotiationRole,
    cur: RTCNegotiationState,
    op: StateChangeOp,
    sdp_type: RTCSdpType,
) -> Result<RTCNegotiationState> {
    if cur == RTCNegotiationState::Closed {
        return Err(Error::ErrConnectionClosed);
    }

    match (role, op, sdp_type) {
        // answerer: SetRemote(offer) from any open state, SetLocal(answer) while pending
        (RTCNegotiationRole::Answerer, StateChangeOp::SetRemote, RTCSdpType::Offer) => {
            return Ok(RTCNegotiationState::Pending);
        }
        (RTCNegotiationRole::Answerer, StateChangeOp::SetLocal, RTCSdpType::Answer)
            if cur == RTCNegotiationState::Pending =>
        {
            return Ok(RTCNegotiationState::Negotiated);
        }
        // offerer: SetLocal(offer) from any open state, SetRemote(answer) while pending
        (RTCNegotiationRole::Offerer, StateChangeOp::SetLocal, RTCSdpType::Offer) => {
            return Ok(RTCNegotiationState::Pending);
        }
        (RTCNegotiationRole::Offerer, StateChangeOp::SetRemote, RTCSdpType::Answer)
            if cur == RTCNegotiationState::Pending =>
        {
            return Ok(RTCNegotiationState::Negotiated);
        }
        _ => {}
    }

    log::debug!("{role} rejects {op}({sdp_type}) in state {cur}");
    Err(Error::ErrIncorrectSignalingState)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_negotiation_state() {
        let tests = vec![
            ("Unspecified", RTCNegotiationState::Unspecified),
            ("idle", RTCNegotiationState::Idle),
            ("pending", RTCNegotiationState::Pending),
            ("negotiated", RTCNegotiationState::Negotiated),
            ("closed", RTCNegotiationState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(RTCNegotiationState::from(state_string), expected_state);
            assert_eq!(expected_state.to_string(), state_string);
        }
    }

    #[test]
    fn test_negotiation_state_transitions() {
        use RTCNegotiationRole::*;
        use RTCNegotiationState::*;
        use StateChangeOp::*;

        let tests = vec![
            (
                "answerer accepts offer",
                Answerer,
                Idle,
                SetRemote,
                RTCSdpType::Offer,
                Ok(Pending),
            ),
            (
                "answerer accepts renegotiation",
                Answerer,
                Negotiated,
                SetRemote,
                RTCSdpType::Offer,
                Ok(Pending),
            ),
            (
                "answerer answers",
                Answerer,
                Pending,
                SetLocal,
                RTCSdpType::Answer,
                Ok(Negotiated),
            ),
            (
                "answerer receives answer",
                Answerer,
                Idle,
                SetRemote,
                RTCSdpType::Answer,
                Err(Error::ErrIncorrectSignalingState),
            ),
            (
                "offerer offers",
                Offerer,
                Idle,
                SetLocal,
                RTCSdpType::Offer,
                Ok(Pending),
            ),
            (
                "offerer applies answer",
                Offerer,
                Pending,
                SetRemote,
                RTCSdpType::Answer,
                Ok(Negotiated),
            ),
            (
                "offerer receives offer",
                Offerer,
                Idle,
                SetRemote,
                RTCSdpType::Offer,
                Err(Error::ErrIncorrectSignalingState),
            ),
            (
                "offerer receives answer without offer",
                Offerer,
                Idle,
                SetRemote,
                RTCSdpType::Answer,
                Err(Error::ErrIncorrectSignalingState),
            ),
            (
                "closed",
                Offerer,
                Closed,
                SetLocal,
                RTCSdpType::Offer,
                Err(Error::ErrConnectionClosed),
            ),
        ];

        for (desc, role, cur, op, sdp_type, expected) in tests {
            let result = check_next_negotiation_state(role, cur, op, sdp_type);
            assert_eq!(result, expected, "{desc} failed");
        }
    }
}
