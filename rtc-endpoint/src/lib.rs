//! # RTC Endpoint - Sans-I/O WebRTC signaling core
//!
//! The negotiation core of a server-side WebRTC endpoint. It answers or
//! originates SDP offers, keeps track of the media flows ("tracks") in each
//! direction and keeps three identifier spaces consistent across
//! renegotiations: the media section id (mid), the RTP stream id (SSRC) and
//! the application track id.
//!
//! ICE, DTLS, SRTP and RTP forwarding are performed by collaborators. The
//! endpoint only tells them what to do through commands and learns what they
//! did through events, all through [`sansio::Protocol`]:
//!
//! ```no_run
//! use rtc_endpoint::endpoint::RTCEndpoint;
//! use rtc_endpoint::endpoint::configuration::RTCConfigurationBuilder;
//! use rtc_endpoint::endpoint::event::{RTCEvent, RTCTransportEvent};
//! use rtc_endpoint::endpoint::message::{RTCEndpointMessage, RTCEndpointNotification, RTCSignal};
//! use rtc_endpoint::sansio::Protocol;
//!
//! # fn example(offer_sdp: String) -> Result<(), Box<dyn std::error::Error>> {
//! let mut endpoint = RTCEndpoint::new(RTCConfigurationBuilder::new().build())?;
//!
//! // remote signaling goes in through handle_read
//! endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::offer(offer_sdp)))?;
//!
//! // the transport adapter reports through handle_event
//! # let credentials = Default::default();
//! # let fingerprint = Default::default();
//! endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::LocalCredentialsReady(credentials)))?;
//! endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::FingerprintReady(fingerprint)))?;
//!
//! // signaling for the remote peer and track notifications
//! while let Some(notification) = endpoint.poll_read() {
//!     if let RTCEndpointNotification::Signal(signal) = notification {
//!         println!("send to remote: {}", signal.to_json()?);
//!     }
//! }
//! // commands for the transport adapter, the media session and track gates
//! while let Some(command) = endpoint.poll_write() {
//!     println!("{command:?}");
//! }
//! // state changes and diagnostics
//! while let Some(event) = endpoint.poll_event() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod endpoint;
pub mod media;
pub mod track;

pub use {sansio, sdp, shared};
