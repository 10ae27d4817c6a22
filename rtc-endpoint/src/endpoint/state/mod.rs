//! Endpoint state types.
//!
//! Two independent state machines are tracked per endpoint:
//!
//! - **[`RTCNegotiationState`]** - progress of the current offer/answer round
//! - **[`RTCIceGatheringState`]** - progress of local candidate gathering for the round
//!
//! Both are reported through
//! [`RTCEndpointEvent`](crate::endpoint::event::RTCEndpointEvent) whenever they change.
//!
//! ```text
//! Idle → Pending → Negotiated
//!          ↑           │
//!          └─ restart ─┘
//!
//! New → Gathering → Complete
//! ```

pub(crate) mod ice_gathering_state;
pub(crate) mod negotiation_state;

pub use ice_gathering_state::RTCIceGatheringState;
pub use negotiation_state::RTCNegotiationState;
