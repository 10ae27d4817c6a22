use super::TrackId;
use crate::media::codec::RTCRtpCodecParameters;

/// Ties a negotiated media section to the codec parameters agreed for it.
///
/// A fresh set of mappings is produced by every completed negotiation round
/// and replaces the previous set as a whole.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCTrackMapping {
    pub track_id: TrackId,
    pub mid: String,
    pub payload_type: u8,
    pub clock_rate: u32,
    pub encoding_name: String,
}

impl RTCTrackMapping {
    pub(crate) fn new(track_id: TrackId, mid: String, codec: &RTCRtpCodecParameters) -> Self {
        Self {
            track_id,
            mid,
            payload_type: codec.payload_type,
            clock_rate: codec.rtp_codec.clock_rate,
            encoding_name: codec.rtp_codec.encoding_name().to_owned(),
        }
    }

    /// Value of the `a=rtpmap` attribute describing this mapping, without channels.
    pub fn rtpmap(&self) -> String {
        format!(
            "{} {}/{}",
            self.payload_type, self.encoding_name, self.clock_rate
        )
    }
}
