use unicase::UniCase;

/// RTCPFeedback signals the connection to use additional RTCP packet types.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCPFeedback {
    /// Valid values: `ack`, `ccm`, `nack`, `goog-remb`, `transport-cc`
    pub typ: String,
    /// For example `type="nack" parameter="pli"` asks for Picture Loss Indicator packets.
    pub parameter: String,
}

/// RTCRtpCodec represents a codec supported by the endpoint.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCRtpCodec {
    /// MIME type of the codec (e.g., "video/VP8", "audio/opus")
    pub mime_type: String,
    pub clock_rate: u32,
    /// Number of audio channels (0 for video codecs)
    pub channels: u16,
    pub sdp_fmtp_line: String,
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCRtpCodec {
    /// Subtype of the MIME type, which is what SDP calls the encoding name.
    pub fn encoding_name(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map_or(self.mime_type.as_str(), |(_, name)| name)
    }

    /// Whether both codecs name the same encoding at the same clock rate,
    /// ignoring case.
    pub fn same_encoding(&self, other: &RTCRtpCodec) -> bool {
        UniCase::new(self.encoding_name()) == UniCase::new(other.encoding_name())
            && self.clock_rate == other.clock_rate
    }
}

/// RTCRtpCodecParameters is a codec bound to the payload type it is sent with.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCRtpCodecParameters {
    pub rtp_codec: RTCRtpCodec,
    pub payload_type: u8,
}

/// A header extension negotiated for a media section.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCRtpHeaderExtensionParameters {
    pub uri: String,
    pub id: u16,
}

/// Codec match quality result from the search below.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CodecMatch {
    #[default]
    None = 0,
    /// Encoding name and clock rate match
    Partial = 1,
    /// Format parameters match as well
    Exact = 2,
}

/// Looks for `needle` in `haystack`, first on encoding and fmtp line, then
/// on encoding alone.
pub(crate) fn codec_parameters_search(
    needle: &RTCRtpCodec,
    haystack: &[RTCRtpCodecParameters],
) -> (Option<RTCRtpCodecParameters>, CodecMatch) {
    for c in haystack {
        if c.rtp_codec.same_encoding(needle) && c.rtp_codec.sdp_fmtp_line == needle.sdp_fmtp_line
        {
            return (Some(c.clone()), CodecMatch::Exact);
        }
    }

    for c in haystack {
        if c.rtp_codec.same_encoding(needle) {
            return (Some(c.clone()), CodecMatch::Partial);
        }
    }

    (None, CodecMatch::None)
}

/// Parses the value of an `a=rtpmap` attribute, e.g. `111 opus/48000/2`,
/// into payload type, encoding name, clock rate and channels.
pub(crate) fn parse_rtpmap(value: &str) -> Option<(u8, String, u32, u16)> {
    let (payload_type, rest) = value.trim().split_once(' ')?;
    let payload_type = payload_type.parse::<u8>().ok()?;

    let mut split = rest.trim().split('/');
    let name = split.next()?.to_owned();
    let clock_rate = split.next()?.parse::<u32>().ok()?;
    let channels = match split.next() {
        Some(channels) => channels.parse::<u16>().ok()?,
        None => 0,
    };

    Some((payload_type, name, clock_rate, channels))
}
