//! Structural reading of parsed session descriptions.
//!
//! Text parsing and serialization belong to the `sdp` crate; this module only
//! interprets what a parsed document says about mids, directions, codecs,
//! SSRCs and ICE parameters.

pub(crate) mod direction;
pub(crate) mod sdp_type;
pub(crate) mod session_description;

pub use direction::RTCMediaDirection;
pub use sdp_type::RTCSdpType;
pub use session_description::RTCSessionDescription;

use crate::endpoint::transport::{RTCDtlsFingerprint, RTCIceCandidateInit, RTCIceParameters};
use crate::media::codec::{
    RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters, RTCRtpHeaderExtensionParameters,
    parse_rtpmap,
};
use crate::track::{RtpCodecKind, SSRC, TrackId};
use sdp::description::media::{MediaDescription, RangedPort};
use sdp::description::session::SessionDescription;
use shared::error::{Error, Result};
use std::collections::HashSet;

pub(crate) const ATTR_KEY_MID: &str = "mid";
pub(crate) const ATTR_KEY_MSID: &str = "msid";
pub(crate) const ATTR_KEY_SSRC: &str = "ssrc";
pub(crate) const ATTR_KEY_SSRC_GROUP: &str = "ssrc-group";
pub(crate) const ATTR_KEY_GROUP: &str = "group";
pub(crate) const ATTR_KEY_RTPMAP: &str = "rtpmap";
pub(crate) const ATTR_KEY_FMTP: &str = "fmtp";
pub(crate) const ATTR_KEY_RTCP_FB: &str = "rtcp-fb";
pub(crate) const ATTR_KEY_EXTMAP: &str = "extmap";
pub(crate) const ATTR_KEY_RTCP_MUX: &str = "rtcp-mux";
pub(crate) const ATTR_KEY_RTCP_RSIZE: &str = "rtcp-rsize";
pub(crate) const ATTR_KEY_CONNECTION_SETUP: &str = "setup";
pub(crate) const ATTR_KEY_ICE_UFRAG: &str = "ice-ufrag";
pub(crate) const ATTR_KEY_ICE_PWD: &str = "ice-pwd";
pub(crate) const ATTR_KEY_ICE_OPTIONS: &str = "ice-options";
pub(crate) const ATTR_KEY_ICE_LITE: &str = "ice-lite";
pub(crate) const ATTR_KEY_CANDIDATE: &str = "candidate";
pub(crate) const ATTR_KEY_MSID_SEMANTIC: &str = "msid-semantic";

pub(crate) const SEMANTIC_TOKEN_BUNDLE: &str = "BUNDLE";
pub(crate) const SEMANTIC_TOKEN_FID: &str = "FID";
pub(crate) const SEMANTIC_TOKEN_WEBRTC_MEDIA_STREAMS: &str = "WMS";

/// Outbound stream announced in a media section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaSource {
    pub(crate) ssrc: SSRC,
    pub(crate) stream_id: String,
    pub(crate) track_id: TrackId,
}

/// One m= section of a local description.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaSection {
    pub(crate) mid: String,
    /// Media type of the m= line, e.g. `audio`.
    pub(crate) media: String,
    pub(crate) direction: RTCMediaDirection,
    pub(crate) track_id: Option<TrackId>,
    pub(crate) source: Option<MediaSource>,
    pub(crate) codecs: Vec<RTCRtpCodecParameters>,
    pub(crate) extensions: Vec<RTCRtpHeaderExtensionParameters>,
    /// Rejected sections are written with port 0 and echo the remote
    /// `protos` and `formats`.
    pub(crate) rejected: bool,
    pub(crate) protos: Vec<String>,
    pub(crate) formats: Vec<String>,
}

pub(crate) struct PopulateSdpParams<'a> {
    pub(crate) ice_params: &'a RTCIceParameters,
    pub(crate) fingerprint: &'a RTCDtlsFingerprint,
    /// Value of `a=setup`.
    pub(crate) connection_role: &'static str,
    pub(crate) is_ice_lite: bool,
    pub(crate) cname: &'a str,
}

fn add_media_section(section: &MediaSection, params: &PopulateSdpParams<'_>) -> MediaDescription {
    let mut media = MediaDescription::new_jsep_media_description(section.media.clone(), vec![])
        .with_value_attribute(
            ATTR_KEY_CONNECTION_SETUP.to_owned(),
            params.connection_role.to_owned(),
        )
        .with_value_attribute(ATTR_KEY_MID.to_owned(), section.mid.clone())
        .with_ice_credentials(
            params.ice_params.username_fragment.clone(),
            params.ice_params.password.clone(),
        )
        .with_fingerprint(
            params.fingerprint.algorithm.clone(),
            params.fingerprint.value.clone(),
        )
        .with_property_attribute(ATTR_KEY_RTCP_MUX.to_owned())
        .with_property_attribute(ATTR_KEY_RTCP_RSIZE.to_owned());

    for codec in &section.codecs {
        media = media.with_codec(
            codec.payload_type,
            codec.rtp_codec.encoding_name().to_owned(),
            codec.rtp_codec.clock_rate,
            codec.rtp_codec.channels,
            codec.rtp_codec.sdp_fmtp_line.clone(),
        );

        for feedback in &codec.rtp_codec.rtcp_feedback {
            let value = format!(
                "{} {} {}",
                codec.payload_type, feedback.typ, feedback.parameter
            );
            media = media.with_value_attribute(
                ATTR_KEY_RTCP_FB.to_owned(),
                value.trim_end().to_owned(),
            );
        }
    }

    for extension in &section.extensions {
        media = media.with_value_attribute(
            ATTR_KEY_EXTMAP.to_owned(),
            format!("{} {}", extension.id, extension.uri),
        );
    }

    media = media.with_property_attribute(section.direction.to_string());

    if let Some(source) = &section.source {
        media = media
            .with_value_attribute(
                ATTR_KEY_MSID.to_owned(),
                format!("{} {}", source.stream_id, source.track_id),
            )
            .with_media_source(
                source.ssrc,
                params.cname.to_owned(),
                source.stream_id.clone(),
                source.track_id.clone(),
            );
    }

    media
}

fn add_rejected_media_section(section: &MediaSection) -> MediaDescription {
    let mut media = MediaDescription::new_jsep_media_description(section.media.clone(), vec![]);
    media.media_name.port = RangedPort {
        value: 0,
        range: None,
    };
    if !section.protos.is_empty() {
        media.media_name.protos = section.protos.clone();
    }
    media.media_name.formats = section.formats.clone();

    media.with_value_attribute(ATTR_KEY_MID.to_owned(), section.mid.clone())
}

/// Writes `media_sections` into `d`, bundling every accepted section.
pub(crate) fn populate_sdp(
    mut d: SessionDescription,
    media_sections: &[MediaSection],
    params: PopulateSdpParams<'_>,
) -> SessionDescription {
    let mut bundle_mids = vec![];

    for section in media_sections {
        let media = if section.rejected {
            add_rejected_media_section(section)
        } else {
            bundle_mids.push(section.mid.as_str());
            add_media_section(section, &params)
        };
        d = d.with_media(media);
    }

    if !bundle_mids.is_empty() {
        d = d.with_value_attribute(
            ATTR_KEY_GROUP.to_owned(),
            format!("{} {}", SEMANTIC_TOKEN_BUNDLE, bundle_mids.join(" ")),
        );
    }
    if params.is_ice_lite {
        d = d.with_property_attribute(ATTR_KEY_ICE_LITE.to_owned());
    }

    d.with_value_attribute(
        ATTR_KEY_MSID_SEMANTIC.to_owned(),
        format!("{SEMANTIC_TOKEN_WEBRTC_MEDIA_STREAMS} *"),
    )
}

/// Returns the value of the `a=mid` attribute of a media section.
pub(crate) fn get_mid_value(media: &MediaDescription) -> Option<&str> {
    media
        .attributes
        .iter()
        .find(|a| a.key == ATTR_KEY_MID)
        .and_then(|a| a.value.as_deref())
}

/// Returns the direction a media section was declared with. A rejected
/// section is inactive; a section without direction attribute is sendrecv.
pub(crate) fn get_peer_direction(media: &MediaDescription) -> RTCMediaDirection {
    if media.media_name.port.value == 0 {
        return RTCMediaDirection::Inactive;
    }

    media
        .attributes
        .iter()
        .map(|a| RTCMediaDirection::from(a.key.as_str()))
        .find(|d| *d != RTCMediaDirection::Unspecified)
        .unwrap_or(RTCMediaDirection::Sendrecv)
}

/// Returns the media kind of a section, `Unspecified` for anything that is
/// neither audio nor video.
pub(crate) fn get_media_kind(media: &MediaDescription) -> RtpCodecKind {
    RtpCodecKind::from(media.media_name.media.as_str())
}

fn attribute_values<'a>(
    media: &'a MediaDescription,
    key: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    media
        .attributes
        .iter()
        .filter(move |a| a.key == key)
        .filter_map(|a| a.value.as_deref())
}

/// Lists the codecs of a media section in the order of its format list.
/// Formats without a usable `a=rtpmap` are skipped, except for the static
/// payload types of G.711 and G.722.
pub(crate) fn codecs_from_media_description(
    media: &MediaDescription,
) -> Vec<RTCRtpCodecParameters> {
    let kind = media.media_name.media.as_str();
    let mut codecs = vec![];

    for format in &media.media_name.formats {
        let payload_type = match format.parse::<u8>() {
            Ok(payload_type) => payload_type,
            Err(_) => continue,
        };

        let rtpmap = attribute_values(media, ATTR_KEY_RTPMAP)
            .filter_map(parse_rtpmap)
            .find(|(pt, _, _, _)| *pt == payload_type)
            .map(|(_, name, clock_rate, channels)| (name, clock_rate, channels))
            .or_else(|| static_payload_type(payload_type));
        let (name, clock_rate, channels) = match rtpmap {
            Some(rtpmap) => rtpmap,
            None => continue,
        };

        let prefix = format!("{payload_type} ");
        let sdp_fmtp_line = attribute_values(media, ATTR_KEY_FMTP)
            .find_map(|v| v.strip_prefix(&prefix))
            .unwrap_or_default()
            .to_owned();
        let rtcp_feedback = attribute_values(media, ATTR_KEY_RTCP_FB)
            .filter_map(|v| v.strip_prefix(&prefix))
            .map(|fb| {
                let (typ, parameter) = fb.split_once(' ').unwrap_or((fb, ""));
                RTCPFeedback {
                    typ: typ.to_owned(),
                    parameter: parameter.to_owned(),
                }
            })
            .collect();

        codecs.push(RTCRtpCodecParameters {
            rtp_codec: RTCRtpCodec {
                mime_type: format!("{kind}/{name}"),
                clock_rate,
                channels,
                sdp_fmtp_line,
                rtcp_feedback,
            },
            payload_type,
        });
    }

    codecs
}

fn static_payload_type(payload_type: u8) -> Option<(String, u32, u16)> {
    match payload_type {
        0 => Some(("PCMU".to_owned(), 8000, 0)),
        8 => Some(("PCMA".to_owned(), 8000, 0)),
        9 => Some(("G722".to_owned(), 8000, 0)),
        _ => None,
    }
}

/// Lists the primary SSRCs announced by a media section, in order.
/// Retransmission SSRCs paired through `a=ssrc-group:FID` are left out.
pub(crate) fn ssrcs_from_media_description(media: &MediaDescription) -> Vec<SSRC> {
    let mut secondaries = HashSet::new();
    for group in attribute_values(media, ATTR_KEY_SSRC_GROUP) {
        let mut fields = group.split_whitespace();
        if fields.next() == Some(SEMANTIC_TOKEN_FID) {
            secondaries.extend(fields.skip(1).filter_map(|s| s.parse::<SSRC>().ok()));
        }
    }

    let mut ssrcs = vec![];
    for value in attribute_values(media, ATTR_KEY_SSRC) {
        let ssrc = match value
            .split_whitespace()
            .next()
            .and_then(|s| s.parse::<SSRC>().ok())
        {
            Some(ssrc) => ssrc,
            None => continue,
        };
        if !secondaries.contains(&ssrc) && !ssrcs.contains(&ssrc) {
            ssrcs.push(ssrc);
        }
    }

    ssrcs
}

/// Returns `(stream id, track id)` of a media section, from `a=msid` or,
/// for older peers, from an `a=ssrc:<ssrc> msid:` line.
pub(crate) fn msid_from_media_description(media: &MediaDescription) -> Option<(String, String)> {
    let split = |value: &str| {
        let mut fields = value.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(stream_id), Some(track_id)) => Some((stream_id.to_owned(), track_id.to_owned())),
            _ => None,
        }
    };

    attribute_values(media, ATTR_KEY_MSID)
        .find_map(split)
        .or_else(|| {
            attribute_values(media, ATTR_KEY_SSRC).find_map(|value| {
                value
                    .split_once(' ')
                    .and_then(|(_, rest)| rest.strip_prefix("msid:"))
                    .and_then(split)
            })
        })
}

/// Lists the `a=extmap` entries of a media section.
pub(crate) fn extmaps_from_media_description(
    media: &MediaDescription,
) -> Vec<RTCRtpHeaderExtensionParameters> {
    attribute_values(media, ATTR_KEY_EXTMAP)
        .filter_map(|value| {
            let (id, uri) = value.split_once(' ')?;
            // the id may carry a direction, as in "2/sendonly"
            let id = id.split('/').next()?.parse::<u16>().ok()?;
            let uri = uri.split_whitespace().next()?;
            Some(RTCRtpHeaderExtensionParameters {
                uri: uri.to_owned(),
                id,
            })
        })
        .collect()
}

/// Extracts the remote ICE credentials, looking at session level first and
/// then at every media section. A description without media sections may
/// carry no credentials at all.
pub(crate) fn extract_ice_credentials(
    desc: &SessionDescription,
) -> Result<Option<RTCIceParameters>> {
    let mut remote_ufrags = vec![];
    let mut remote_pwds = vec![];

    if let Some(ufrag) = desc.attribute(ATTR_KEY_ICE_UFRAG) {
        remote_ufrags.push(ufrag.clone());
    }
    if let Some(pwd) = desc.attribute(ATTR_KEY_ICE_PWD) {
        remote_pwds.push(pwd.clone());
    }

    for media in &desc.media_descriptions {
        if let Some(ufrag) = attribute_values(media, ATTR_KEY_ICE_UFRAG).next() {
            remote_ufrags.push(ufrag.to_owned());
        }
        if let Some(pwd) = attribute_values(media, ATTR_KEY_ICE_PWD).next() {
            remote_pwds.push(pwd.to_owned());
        }
    }

    if remote_ufrags.is_empty() && remote_pwds.is_empty() && desc.media_descriptions.is_empty() {
        return Ok(None);
    }

    let username_fragment = match remote_ufrags.first() {
        Some(ufrag) => ufrag.clone(),
        None => return Err(Error::ErrSessionDescriptionMissingIceUfrag),
    };
    let password = match remote_pwds.first() {
        Some(pwd) => pwd.clone(),
        None => return Err(Error::ErrSessionDescriptionMissingIcePwd),
    };

    if remote_ufrags.iter().any(|u| *u != username_fragment) {
        return Err(Error::ErrSessionDescriptionConflictingIceUfrag);
    }
    if remote_pwds.iter().any(|p| *p != password) {
        return Err(Error::ErrSessionDescriptionConflictingIcePwd);
    }

    Ok(Some(RTCIceParameters {
        username_fragment,
        password,
        ice_lite: desc.attributes.iter().any(|a| a.key == ATTR_KEY_ICE_LITE),
    }))
}

/// Collects the candidates embedded in a description, tagged with the
/// media section they appeared in.
pub(crate) fn extract_candidates(desc: &SessionDescription) -> Vec<RTCIceCandidateInit> {
    let mut candidates = vec![];

    for (index, media) in desc.media_descriptions.iter().enumerate() {
        let sdp_mid = get_mid_value(media).map(|mid| mid.to_owned());
        for value in attribute_values(media, ATTR_KEY_CANDIDATE) {
            candidates.push(RTCIceCandidateInit {
                candidate: format!("{ATTR_KEY_CANDIDATE}:{value}"),
                sdp_mid: sdp_mid.clone(),
                sdp_mline_index: Some(index as u16),
                username_fragment: None,
            });
        }
    }

    candidates
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn parse(sdp: &str) -> SessionDescription {
        let mut reader = Cursor::new(sdp.as_bytes());
        SessionDescription::unmarshal(&mut reader).unwrap()
    }

    const OFFER: &str = "v=0\r\n\
o=- 4215775240449105457 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
a=group:BUNDLE 0 1\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111 0\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=candidate:1 1 udp 2130706431 10.0.0.1 5000 typ host\r\n\
a=extmap:1 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r\n\
a=mid:0\r\n\
a=msid:stream-a audio-a\r\n\
a=sendonly\r\n\
a=rtpmap:111 opus/48000/2\r\n\
a=fmtp:111 minptime=10;useinbandfec=1\r\n\
a=ssrc:1111 cname:remote\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 102 103\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=extmap:3/sendonly urn:ietf:params:rtp-hdrext:toffset\r\n\
a=mid:1\r\n\
a=rtpmap:102 H264/90000\r\n\
a=rtcp-fb:102 nack pli\r\n\
a=fmtp:102 packetization-mode=1\r\n\
a=rtpmap:103 rtx/90000\r\n\
a=ssrc-group:FID 2222 3333\r\n\
a=ssrc:2222 msid:stream-v video-v\r\n\
a=ssrc:3333 msid:stream-v video-v\r\n";

    #[test]
    fn test_media_section_details() {
        let desc = parse(OFFER);
        let audio = &desc.media_descriptions[0];
        let video = &desc.media_descriptions[1];

        assert_eq!(get_mid_value(audio), Some("0"));
        assert_eq!(get_peer_direction(audio), RTCMediaDirection::Sendonly);
        assert_eq!(get_peer_direction(video), RTCMediaDirection::Sendrecv);
        assert_eq!(get_media_kind(video), RtpCodecKind::Video);

        assert_eq!(ssrcs_from_media_description(audio), vec![1111]);
        assert_eq!(ssrcs_from_media_description(video), vec![2222]);

        assert_eq!(
            msid_from_media_description(audio),
            Some(("stream-a".to_owned(), "audio-a".to_owned()))
        );
        assert_eq!(
            msid_from_media_description(video),
            Some(("stream-v".to_owned(), "video-v".to_owned()))
        );

        let extmaps = extmaps_from_media_description(video);
        assert_eq!(extmaps.len(), 1);
        assert_eq!(extmaps[0].id, 3);
        assert_eq!(extmaps[0].uri, "urn:ietf:params:rtp-hdrext:toffset");
    }

    #[test]
    fn test_codecs_from_media_description() {
        let desc = parse(OFFER);

        let audio = codecs_from_media_description(&desc.media_descriptions[0]);
        assert_eq!(audio.len(), 2);
        assert_eq!(audio[0].payload_type, 111);
        assert_eq!(audio[0].rtp_codec.mime_type, "audio/opus");
        assert_eq!(audio[0].rtp_codec.channels, 2);
        assert_eq!(audio[0].rtp_codec.sdp_fmtp_line, "minptime=10;useinbandfec=1");
        assert_eq!(audio[1].payload_type, 0);
        assert_eq!(audio[1].rtp_codec.mime_type, "audio/PCMU");

        let video = codecs_from_media_description(&desc.media_descriptions[1]);
        assert_eq!(video.len(), 2);
        assert_eq!(video[0].rtp_codec.mime_type, "video/H264");
        assert_eq!(
            video[0].rtp_codec.rtcp_feedback,
            vec![RTCPFeedback {
                typ: "nack".to_owned(),
                parameter: "pli".to_owned(),
            }]
        );
        assert_eq!(video[1].rtp_codec.encoding_name(), "rtx");
    }

    #[test]
    fn test_extract_ice_credentials() {
        let desc = parse(OFFER);
        let credentials = extract_ice_credentials(&desc).unwrap().unwrap();
        assert_eq!(credentials.username_fragment, "remoteufrag");
        assert_eq!(credentials.password, "remotepwd");
        assert!(!credentials.ice_lite);

        let empty = parse("v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\n");
        assert_eq!(extract_ice_credentials(&empty), Ok(None));

        let tests = vec![
            (
                OFFER.replace("a=ice-ufrag:remoteufrag\r\n", ""),
                Error::ErrSessionDescriptionMissingIceUfrag,
            ),
            (
                OFFER.replace("a=ice-pwd:remotepwd\r\n", ""),
                Error::ErrSessionDescriptionMissingIcePwd,
            ),
            (
                OFFER.replacen("a=ice-ufrag:remoteufrag", "a=ice-ufrag:other", 1),
                Error::ErrSessionDescriptionConflictingIceUfrag,
            ),
            (
                OFFER.replacen("a=ice-pwd:remotepwd", "a=ice-pwd:other", 1),
                Error::ErrSessionDescriptionConflictingIcePwd,
            ),
        ];

        for (sdp, expected) in tests {
            assert_eq!(extract_ice_credentials(&parse(&sdp)), Err(expected));
        }
    }

    #[test]
    fn test_populate_sdp() {
        let ice_params = RTCIceParameters {
            username_fragment: "localufrag".to_owned(),
            password: "localpwd".to_owned(),
            ice_lite: true,
        };
        let fingerprint = RTCDtlsFingerprint {
            algorithm: "sha-256".to_owned(),
            value: "AB:CD".to_owned(),
        };
        let opus = RTCRtpCodecParameters {
            rtp_codec: RTCRtpCodec {
                mime_type: "audio/opus".to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            payload_type: 111,
        };

        let sections = vec![
            MediaSection {
                mid: "0".to_owned(),
                media: "audio".to_owned(),
                direction: RTCMediaDirection::Sendonly,
                track_id: Some("audio-1".to_owned()),
                source: Some(MediaSource {
                    ssrc: 4242,
                    stream_id: "stream-1".to_owned(),
                    track_id: "audio-1".to_owned(),
                }),
                codecs: vec![opus],
                extensions: vec![RTCRtpHeaderExtensionParameters {
                    uri: "urn:ietf:params:rtp-hdrext:ssrc-audio-level".to_owned(),
                    id: 1,
                }],
                ..Default::default()
            },
            MediaSection {
                mid: "1".to_owned(),
                media: "application".to_owned(),
                rejected: true,
                protos: vec!["UDP".to_owned(), "DTLS".to_owned(), "SCTP".to_owned()],
                formats: vec!["webrtc-datachannel".to_owned()],
                ..Default::default()
            },
        ];

        let d = populate_sdp(
            SessionDescription::new_jsep_session_description(false),
            &sections,
            PopulateSdpParams {
                ice_params: &ice_params,
                fingerprint: &fingerprint,
                connection_role: "actpass",
                is_ice_lite: true,
                cname: "cname",
            },
        );

        // what is written must read back the same way
        let d = parse(&d.marshal());
        assert_eq!(d.media_descriptions.len(), 2);
        assert!(
            d.attributes
                .iter()
                .any(|a| a.key == ATTR_KEY_GROUP && a.value.as_deref() == Some("BUNDLE 0"))
        );

        let credentials = extract_ice_credentials(&d).unwrap().unwrap();
        assert_eq!(credentials.username_fragment, "localufrag");
        assert!(credentials.ice_lite);

        let audio = &d.media_descriptions[0];
        assert_eq!(get_mid_value(audio), Some("0"));
        assert_eq!(get_peer_direction(audio), RTCMediaDirection::Sendonly);
        assert_eq!(ssrcs_from_media_description(audio), vec![4242]);
        assert_eq!(
            msid_from_media_description(audio),
            Some(("stream-1".to_owned(), "audio-1".to_owned()))
        );
        let codecs = codecs_from_media_description(audio);
        assert_eq!(codecs.len(), 1);
        assert_eq!(codecs[0].payload_type, 111);
        assert_eq!(codecs[0].rtp_codec.clock_rate, 48000);
        assert_eq!(extmaps_from_media_description(audio).len(), 1);

        let rejected = &d.media_descriptions[1];
        assert_eq!(rejected.media_name.port.value, 0);
        assert_eq!(get_mid_value(rejected), Some("1"));
        assert_eq!(get_peer_direction(rejected), RTCMediaDirection::Inactive);
        assert_eq!(
            rejected.media_name.formats,
            vec!["webrtc-datachannel".to_owned()]
        );
    }

    #[test]
    fn test_extract_candidates() {
        let desc = parse(OFFER);
        let candidates = extract_candidates(&desc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].candidate,
            "candidate:1 1 udp 2130706431 10.0.0.1 5000 typ host"
        );
        assert_eq!(candidates[0].sdp_mid.as_deref(), Some("0"));
        assert_eq!(candidates[0].sdp_mline_index, Some(0));
    }
}
