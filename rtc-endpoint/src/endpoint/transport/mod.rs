//! Parameters exchanged with the transport adapter: ICE credentials and
//! candidates, DTLS fingerprint and role.

pub(crate) mod dtls;
pub(crate) mod ice;

pub use dtls::{RTCDtlsFingerprint, RTCDtlsRole};
pub use ice::{RTCIceCandidateInit, RTCIceParameters};
