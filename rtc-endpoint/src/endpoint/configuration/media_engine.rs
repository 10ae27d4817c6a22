//! Codecs and RTP header extensions this endpoint can negotiate.
//!
//! ```
//! use rtc_endpoint::endpoint::configuration::media_engine::MediaEngine;
//! use rtc_endpoint::track::RtpCodecKind;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut media_engine = MediaEngine::default();
//! media_engine.register_default_codecs()?;
//! media_engine.register_header_extension(
//!     "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
//!     RtpCodecKind::Audio,
//! )?;
//! # Ok(())
//! # }
//! ```

use crate::media::codec::{
    CodecMatch, RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters,
    RTCRtpHeaderExtensionParameters, codec_parameters_search,
};
use crate::track::RtpCodecKind;
use shared::error::{Error, Result};
use std::ops::Range;
use unicase::UniCase;

/// H.264 video codec MIME type.
pub const MIME_TYPE_H264: &str = "video/H264";
/// H.265/HEVC video codec MIME type.
pub const MIME_TYPE_HEVC: &str = "video/H265";
/// Opus audio codec MIME type.
pub const MIME_TYPE_OPUS: &str = "audio/opus";
/// VP8 video codec MIME type.
pub const MIME_TYPE_VP8: &str = "video/VP8";
/// VP9 video codec MIME type.
pub const MIME_TYPE_VP9: &str = "video/VP9";
/// AV1 video codec MIME type.
pub const MIME_TYPE_AV1: &str = "video/AV1";
/// G.722 audio codec MIME type.
pub const MIME_TYPE_G722: &str = "audio/G722";
/// PCMU (G.711 μ-law) audio codec MIME type.
pub const MIME_TYPE_PCMU: &str = "audio/PCMU";
/// PCMA (G.711 A-law) audio codec MIME type.
pub const MIME_TYPE_PCMA: &str = "audio/PCMA";

// Encodings that protect or repair another stream and never carry a track.
const AUXILIARY_ENCODINGS: [&str; 5] = ["rtx", "red", "ulpfec", "flexfec", "flexfec-03"];

const VALID_EXT_IDS: Range<u16> = 1..15;

#[derive(Default, Debug, Clone)]
pub(crate) struct MediaEngineHeaderExtension {
    pub(crate) uri: String,
    pub(crate) is_audio: bool,
    pub(crate) is_video: bool,
}

impl MediaEngineHeaderExtension {
    fn is_kind(&self, typ: RtpCodecKind) -> bool {
        match typ {
            RtpCodecKind::Audio => self.is_audio,
            RtpCodecKind::Video => self.is_video,
            RtpCodecKind::Unspecified => false,
        }
    }
}

/// A MediaEngine defines the codecs supported by an endpoint, and the
/// configuration of those codecs.
#[derive(Default, Debug, Clone)]
pub struct MediaEngine {
    pub(crate) audio_codecs: Vec<RTCRtpCodecParameters>,
    pub(crate) video_codecs: Vec<RTCRtpCodecParameters>,
    pub(crate) header_extensions: Vec<MediaEngineHeaderExtension>,
}

impl MediaEngine {
    /// Registers the codecs supported by common browsers: Opus, G722, PCMU
    /// and PCMA for audio; VP8, VP9, H264, AV1 and H265 for video.
    pub fn register_default_codecs(&mut self) -> Result<()> {
        // Default Audio Codecs
        for codec in [
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48000,
                    channels: 2,
                    sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                    rtcp_feedback: vec![],
                },
                payload_type: 111,
            },
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: MIME_TYPE_G722.to_owned(),
                    clock_rate: 8000,
                    ..Default::default()
                },
                payload_type: 9,
            },
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: MIME_TYPE_PCMU.to_owned(),
                    clock_rate: 8000,
                    ..Default::default()
                },
                payload_type: 0,
            },
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: MIME_TYPE_PCMA.to_owned(),
                    clock_rate: 8000,
                    ..Default::default()
                },
                payload_type: 8,
            },
        ] {
            self.register_codec(codec, RtpCodecKind::Audio)?;
        }

        let video_rtcp_feedback = vec![
            RTCPFeedback {
                typ: "goog-remb".to_owned(),
                parameter: "".to_owned(),
            },
            RTCPFeedback {
                typ: "ccm".to_owned(),
                parameter: "fir".to_owned(),
            },
            RTCPFeedback {
                typ: "nack".to_owned(),
                parameter: "".to_owned(),
            },
            RTCPFeedback {
                typ: "nack".to_owned(),
                parameter: "pli".to_owned(),
            },
        ];
        let video_codec = |mime_type: &str, sdp_fmtp_line: &str, payload_type: u8| {
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: mime_type.to_owned(),
                    clock_rate: 90000,
                    channels: 0,
                    sdp_fmtp_line: sdp_fmtp_line.to_owned(),
                    rtcp_feedback: video_rtcp_feedback.clone(),
                },
                payload_type,
            }
        };
        for codec in [
            video_codec(MIME_TYPE_VP8, "", 96),
            video_codec(MIME_TYPE_VP9, "profile-id=0", 98),
            video_codec(
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
                102,
            ),
            video_codec(
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
                125,
            ),
            video_codec(MIME_TYPE_AV1, "profile-id=0", 41),
            video_codec(MIME_TYPE_HEVC, "", 126),
        ] {
            self.register_codec(codec, RtpCodecKind::Video)?;
        }

        Ok(())
    }

    /// add_codec will append codec if it not exists
    fn add_codec(codecs: &mut Vec<RTCRtpCodecParameters>, codec: RTCRtpCodecParameters) {
        for c in codecs.iter() {
            if c.rtp_codec.mime_type == codec.rtp_codec.mime_type
                && c.payload_type == codec.payload_type
            {
                return;
            }
        }
        codecs.push(codec);
    }

    /// Registers a codec. Only registered codecs are offered or accepted.
    pub fn register_codec(
        &mut self,
        codec: RTCRtpCodecParameters,
        typ: RtpCodecKind,
    ) -> Result<()> {
        match typ {
            RtpCodecKind::Audio => {
                MediaEngine::add_codec(&mut self.audio_codecs, codec);
                Ok(())
            }
            RtpCodecKind::Video => {
                MediaEngine::add_codec(&mut self.video_codecs, codec);
                Ok(())
            }
            _ => Err(Error::ErrUnknownType),
        }
    }

    /// Adds a header extension for media sections of the given kind. Local ids
    /// follow registration order, starting at 1.
    pub fn register_header_extension(&mut self, uri: &str, typ: RtpCodecKind) -> Result<()> {
        if typ == RtpCodecKind::Unspecified {
            return Err(Error::ErrUnknownType);
        }

        let index = match self.header_extensions.iter().position(|ext| ext.uri == uri) {
            Some(index) => index,
            None => {
                if self.header_extensions.len() >= VALID_EXT_IDS.len() {
                    return Err(Error::ErrRegisterHeaderExtensionNoFreeID);
                }
                self.header_extensions.push(MediaEngineHeaderExtension {
                    uri: uri.to_owned(),
                    ..Default::default()
                });
                self.header_extensions.len() - 1
            }
        };

        let ext = &mut self.header_extensions[index];
        if typ == RtpCodecKind::Audio {
            ext.is_audio = true;
        } else {
            ext.is_video = true;
        }

        Ok(())
    }

    /// register_feedback adds feedback mechanism to already registered codecs.
    pub fn register_feedback(&mut self, feedback: RTCPFeedback, typ: RtpCodecKind) {
        match typ {
            RtpCodecKind::Video => {
                for v in &mut self.video_codecs {
                    v.rtp_codec.rtcp_feedback.push(feedback.clone());
                }
            }
            RtpCodecKind::Audio => {
                for a in &mut self.audio_codecs {
                    a.rtp_codec.rtcp_feedback.push(feedback.clone());
                }
            }
            _ => {}
        }
    }

    pub(crate) fn get_codecs_by_kind(&self, typ: RtpCodecKind) -> &[RTCRtpCodecParameters] {
        match typ {
            RtpCodecKind::Audio => &self.audio_codecs,
            RtpCodecKind::Video => &self.video_codecs,
            RtpCodecKind::Unspecified => &[],
        }
    }

    /// Registered codecs of a kind whose encoding name is `encoding`, or all
    /// of them when no encoding is given.
    pub(crate) fn codecs_for_encoding(
        &self,
        typ: RtpCodecKind,
        encoding: Option<&str>,
    ) -> Vec<RTCRtpCodecParameters> {
        self.get_codecs_by_kind(typ)
            .iter()
            .filter(|c| match encoding {
                Some(encoding) => {
                    UniCase::new(c.rtp_codec.encoding_name()) == UniCase::new(encoding)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Picks the codec to answer with among the remote ones, in remote
    /// order, keeping the remote payload type. A supported codec named
    /// `preferred` wins over the first supported one.
    pub(crate) fn match_remote_codec(
        &self,
        typ: RtpCodecKind,
        remote_codecs: &[RTCRtpCodecParameters],
        preferred: Option<&str>,
    ) -> Option<RTCRtpCodecParameters> {
        let local_codecs = self.get_codecs_by_kind(typ);
        let supported: Vec<&RTCRtpCodecParameters> = remote_codecs
            .iter()
            .filter(|remote| {
                let name = remote.rtp_codec.encoding_name();
                !AUXILIARY_ENCODINGS
                    .iter()
                    .any(|aux| UniCase::new(*aux) == UniCase::new(name))
            })
            .filter(|remote| {
                let (_, codec_match) = codec_parameters_search(&remote.rtp_codec, local_codecs);
                codec_match != CodecMatch::None
            })
            .collect();

        preferred
            .and_then(|preferred| {
                supported.iter().find(|remote| {
                    UniCase::new(remote.rtp_codec.encoding_name()) == UniCase::new(preferred)
                })
            })
            .or_else(|| supported.first())
            .map(|remote| (*remote).clone())
    }

    /// Header extensions to offer for a kind, with local ids.
    pub(crate) fn header_extensions_by_kind(
        &self,
        typ: RtpCodecKind,
    ) -> Vec<RTCRtpHeaderExtensionParameters> {
        self.header_extensions
            .iter()
            .enumerate()
            .filter(|(_, ext)| ext.is_kind(typ))
            .map(|(index, ext)| RTCRtpHeaderExtensionParameters {
                uri: ext.uri.clone(),
                id: VALID_EXT_IDS.start + index as u16,
            })
            .collect()
    }

    /// Remote header extensions this engine supports for a kind, keeping the
    /// remote ids.
    pub(crate) fn negotiate_header_extensions(
        &self,
        typ: RtpCodecKind,
        remote: &[RTCRtpHeaderExtensionParameters],
    ) -> Vec<RTCRtpHeaderExtensionParameters> {
        remote
            .iter()
            .filter(|r| {
                self.header_extensions
                    .iter()
                    .any(|ext| ext.uri == r.uri && ext.is_kind(typ))
            })
            .cloned()
            .collect()
    }
}
