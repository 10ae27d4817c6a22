//! Codec descriptions and the per-encoding payload stages used when media
//! ports are activated.

pub mod codec;
pub mod stage;

pub use codec::{RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters, RTCRtpHeaderExtensionParameters};
pub use stage::{
    H264NalParser, H265NalParser, PayloadStage, PayloadStageFactory, PayloadStageRegistry,
    RTCStreamAlignment,
};
