use super::RTCEndpoint;
use crate::endpoint::sdp::{
    MediaSection, MediaSource, PopulateSdpParams, RTCMediaDirection, RTCSdpType,
    RTCSessionDescription, codecs_from_media_description, extmaps_from_media_description,
    get_media_kind, get_mid_value, get_peer_direction, msid_from_media_description,
    populate_sdp, ssrcs_from_media_description,
};
use crate::endpoint::transport::{RTCDtlsFingerprint, RTCDtlsRole, RTCIceParameters};
use crate::media::codec::{RTCRtpCodecParameters, RTCRtpHeaderExtensionParameters};
use crate::track::{RTCTrack, RTCTrackDirection, RTCTrackMapping, RtpCodecKind, SSRC, TrackId};
use log::{debug, trace};
use sdp::description::session::SessionDescription;
use shared::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use unicase::UniCase;

/// A local offer waiting for its answer, with the sections it was built from.
#[derive(Debug, Clone)]
pub(crate) struct PendingOffer {
    pub(crate) description: RTCSessionDescription,
    pub(crate) sections: Vec<MediaSection>,
}

impl PendingOffer {
    /// Whether `answer` has one media section per offered section, carrying
    /// the offered mids in offer order.
    pub(crate) fn is_answered_by(&self, answer: &SessionDescription) -> bool {
        answer.media_descriptions.len() == self.sections.len()
            && answer
                .media_descriptions
                .iter()
                .zip(&self.sections)
                .all(|(media, section)| get_mid_value(media) == Some(section.mid.as_str()))
    }
}

/// Inbound stream announced by the remote offer for a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InboundStream {
    pub(crate) track_id: TrackId,
    pub(crate) ssrc: Option<SSRC>,
    pub(crate) encoding: String,
    pub(crate) mid: String,
}

/// Everything a computed answer changes once it is committed.
#[derive(Debug)]
pub(crate) struct AnswerPlan {
    pub(crate) description: RTCSessionDescription,
    /// Inbound tracks discovered in the offer, not registered yet.
    pub(crate) new_tracks: Vec<RTCTrack>,
    pub(crate) inbound_streams: Vec<InboundStream>,
    /// Outbound track id to the mid it was placed in.
    pub(crate) outbound_mids: Vec<(TrackId, String)>,
    pub(crate) mappings: Vec<RTCTrackMapping>,
    pub(crate) ssrc_to_mid: HashMap<SSRC, String>,
    pub(crate) extensions: HashMap<String, Vec<RTCRtpHeaderExtensionParameters>>,
    pub(crate) mid_to_track: HashMap<String, TrackId>,
}

/// Hands out mids, reusing a preferred one while it is free.
#[derive(Default)]
struct MidAllocator {
    used: HashSet<String>,
    next: u64,
}

impl MidAllocator {
    fn reserve(&mut self, mid: &str) {
        if let Ok(n) = mid.parse::<u64>() {
            self.next = self.next.max(n + 1);
        }
        self.used.insert(mid.to_owned());
    }

    /// Takes `mid` if nobody uses it yet.
    fn claim(&mut self, mid: &str) -> bool {
        if self.used.contains(mid) {
            return false;
        }
        self.reserve(mid);
        true
    }

    fn allocate(&mut self, preferred: Option<&str>) -> String {
        if let Some(mid) = preferred
            && self.claim(mid)
        {
            return mid.to_owned();
        }

        loop {
            let mid = self.next.to_string();
            self.next += 1;
            if self.used.insert(mid.clone()) {
                return mid;
            }
        }
    }
}

fn same_encoding(a: &str, b: &str) -> bool {
    UniCase::new(a) == UniCase::new(b)
}

fn media_name(kind: RtpCodecKind) -> String {
    kind.to_string()
}

impl RTCEndpoint {
    fn local_parameters(&self) -> Result<(&RTCIceParameters, &RTCDtlsFingerprint)> {
        match (&self.local_credentials, &self.fingerprint) {
            (Some(credentials), Some(fingerprint)) => Ok((credentials, fingerprint)),
            _ => Err(Error::Other(
                "local description needs ice credentials and a fingerprint".to_owned(),
            )),
        }
    }

    fn build_description(
        &self,
        sdp_type: RTCSdpType,
        sections: &[MediaSection],
        connection_role: &'static str,
    ) -> Result<RTCSessionDescription> {
        let (ice_params, fingerprint) = self.local_parameters()?;
        let d = populate_sdp(
            SessionDescription::new_jsep_session_description(false),
            sections,
            PopulateSdpParams {
                ice_params,
                fingerprint,
                connection_role,
                is_ice_lite: self.configuration.setting_engine.ice_lite,
                cname: &self.cname,
            },
        );
        Ok(RTCSessionDescription::from_parsed(sdp_type, d))
    }

    fn outbound_section(
        &self,
        track: &RTCTrack,
        mid: String,
        codecs: Vec<RTCRtpCodecParameters>,
        extensions: Vec<RTCRtpHeaderExtensionParameters>,
    ) -> MediaSection {
        MediaSection {
            mid,
            media: media_name(track.kind()),
            direction: RTCMediaDirection::Sendonly,
            track_id: Some(track.id().clone()),
            source: track.ssrc().map(|ssrc| MediaSource {
                ssrc,
                stream_id: track.stream_id().to_owned(),
                track_id: track.id().clone(),
            }),
            codecs,
            extensions,
            ..Default::default()
        }
    }

    /// Builds an offer with one sendonly section per outbound track followed by
    /// one recvonly section per inbound track.
    pub(crate) fn generate_offer(&self) -> Result<PendingOffer> {
        let media_engine = &self.configuration.media_engine;
        let outbound_tracks = self.registry.outbound_tracks();
        let inbound_tracks = self.registry.inbound_tracks();

        // tracks keep the mid of the previous round, new ones get fresh mids
        let mut mids = MidAllocator::default();
        let claimed: Vec<Option<String>> = outbound_tracks
            .iter()
            .chain(inbound_tracks.iter())
            .map(|t| t.mid().filter(|mid| mids.claim(mid)).map(str::to_owned))
            .collect();
        // mids of earlier rounds are never handed to another track
        for mid in &self.used_mids {
            mids.reserve(mid);
        }
        let mut claimed = claimed.into_iter();
        let mut next_mid = |mids: &mut MidAllocator| match claimed.next().flatten() {
            Some(mid) => mid,
            None => mids.allocate(None),
        };

        let mut sections = vec![];
        for track in outbound_tracks {
            let mid = next_mid(&mut mids);
            let codecs = media_engine.codecs_for_encoding(track.kind(), track.encoding());
            let extensions = media_engine.header_extensions_by_kind(track.kind());
            sections.push(self.outbound_section(track, mid, codecs, extensions));
        }

        for track in inbound_tracks {
            let mid = next_mid(&mut mids);
            sections.push(MediaSection {
                mid,
                media: media_name(track.kind()),
                direction: RTCMediaDirection::Recvonly,
                track_id: Some(track.id().clone()),
                codecs: media_engine.codecs_for_encoding(track.kind(), track.encoding()),
                extensions: media_engine.header_extensions_by_kind(track.kind()),
                ..Default::default()
            });
        }

        trace!("offer with {} media sections", sections.len());
        let description = self.build_description(
            RTCSdpType::Offer,
            &sections,
            RTCDtlsRole::Auto.to_connection_role(),
        )?;

        Ok(PendingOffer {
            description,
            sections,
        })
    }

    /// Computes the answer to `offer` without touching the registry.
    pub(crate) fn generate_answer(&self, offer: &RTCSessionDescription) -> Result<AnswerPlan> {
        let (mut plan, sections, connection_role) = self.plan_answer(offer)?;
        plan.description = self.build_description(RTCSdpType::Answer, &sections, connection_role)?;
        Ok(plan)
    }

    /// Checks that `offer` can be answered with the current registry, before
    /// anything about the round changes.
    pub(crate) fn check_answer_plan(&self, offer: &RTCSessionDescription) -> Result<()> {
        let (plan, _, _) = self.plan_answer(offer)?;
        let mut registry = self.registry.clone();
        registry.register_tracks(RTCTrackDirection::Inbound, plan.new_tracks)
    }

    /// Plans the media sections of the answer to `offer`. The returned plan
    /// has no description yet.
    ///
    /// Offered sections are answered in order. Outbound tracks that found no
    /// recvonly section are appended as sendonly sections with fresh mids.
    fn plan_answer(
        &self,
        offer: &RTCSessionDescription,
    ) -> Result<(AnswerPlan, Vec<MediaSection>, &'static str)> {
        let remote = offer.unmarshal()?;
        let media_engine = &self.configuration.media_engine;

        let mut mids = MidAllocator::default();
        for media in &remote.media_descriptions {
            if let Some(mid) = get_mid_value(media) {
                mids.reserve(mid);
            }
        }

        let mut sections = vec![];
        let mut new_tracks: Vec<RTCTrack> = vec![];
        let mut inbound_streams = vec![];
        let mut outbound_mids = vec![];
        let mut mappings = vec![];
        let mut ssrc_to_mid = HashMap::new();
        let mut extensions = HashMap::new();
        let mut mid_to_track = HashMap::new();
        let mut placed: HashSet<TrackId> = HashSet::new();

        for media in &remote.media_descriptions {
            let mid = get_mid_value(media)
                .ok_or(Error::ErrRemoteDescriptionWithoutMidValue)?
                .to_owned();
            let kind = get_media_kind(media);
            let direction = get_peer_direction(media);
            let remote_codecs = codecs_from_media_description(media);
            let negotiated_extensions = media_engine
                .negotiate_header_extensions(kind, &extmaps_from_media_description(media));

            let rejected = MediaSection {
                mid: mid.clone(),
                media: media.media_name.media.clone(),
                rejected: true,
                protos: media.media_name.protos.clone(),
                formats: media.media_name.formats.clone(),
                ..Default::default()
            };

            if kind == RtpCodecKind::Unspecified || media.media_name.port.value == 0 {
                debug!("reject media section {mid} ({})", media.media_name.media);
                sections.push(rejected);
                continue;
            }

            if direction.has_send() {
                let ssrcs = ssrcs_from_media_description(media);
                let msid = msid_from_media_description(media);
                let existing = self.match_inbound_track(kind, &mid, &ssrcs, msid.as_ref(), &placed);

                let codec = match media_engine.match_remote_codec(
                    kind,
                    &remote_codecs,
                    existing.and_then(|t| t.encoding()),
                ) {
                    Some(codec) => codec,
                    None => {
                        debug!("no common {kind} codec in media section {mid}");
                        sections.push(rejected);
                        continue;
                    }
                };
                let encoding = codec.rtp_codec.encoding_name().to_owned();

                let track_id = match existing {
                    Some(track) => track.id().clone(),
                    None => {
                        let fallback = format!("remote-{kind}-{mid}");
                        let (stream_id, track_id) =
                            msid.clone().unwrap_or_else(|| (mid.clone(), fallback.clone()));
                        let track_id = if self.is_inbound_id_taken(&track_id, &new_tracks) {
                            self.free_inbound_id(&fallback, &new_tracks)
                        } else {
                            track_id
                        };
                        let mut track = RTCTrack::new_inbound(track_id, kind, stream_id)
                            .with_encoding(encoding.clone());
                        if let Some(ssrc) = ssrcs.first() {
                            track = track.with_ssrc(*ssrc);
                        }
                        track.set_mid(mid.clone());
                        let track_id = track.id().clone();
                        new_tracks.push(track);
                        track_id
                    }
                };
                placed.insert(track_id.clone());

                for ssrc in &ssrcs {
                    ssrc_to_mid.insert(*ssrc, mid.clone());
                }
                inbound_streams.push(InboundStream {
                    track_id: track_id.clone(),
                    ssrc: ssrcs.first().copied(),
                    encoding,
                    mid: mid.clone(),
                });
                mappings.push(RTCTrackMapping::new(track_id.clone(), mid.clone(), &codec));
                mid_to_track.insert(mid.clone(), track_id.clone());
                extensions.insert(mid.clone(), negotiated_extensions.clone());

                sections.push(MediaSection {
                    mid,
                    media: media.media_name.media.clone(),
                    direction: RTCMediaDirection::Recvonly,
                    track_id: Some(track_id),
                    codecs: vec![codec],
                    extensions: negotiated_extensions,
                    ..Default::default()
                });
            } else if direction == RTCMediaDirection::Recvonly {
                match self.match_outbound_track(kind, &mid, &remote_codecs, &placed) {
                    Some((track, codec)) => {
                        placed.insert(track.id().clone());
                        outbound_mids.push((track.id().clone(), mid.clone()));
                        mappings.push(RTCTrackMapping::new(track.id().clone(), mid.clone(), &codec));
                        mid_to_track.insert(mid.clone(), track.id().clone());
                        extensions.insert(mid.clone(), negotiated_extensions.clone());
                        sections.push(self.outbound_section(
                            track,
                            mid,
                            vec![codec],
                            negotiated_extensions,
                        ));
                    }
                    None => match media_engine.match_remote_codec(kind, &remote_codecs, None) {
                        Some(codec) => sections.push(MediaSection {
                            mid,
                            media: media.media_name.media.clone(),
                            direction: RTCMediaDirection::Inactive,
                            codecs: vec![codec],
                            extensions: negotiated_extensions,
                            ..Default::default()
                        }),
                        None => sections.push(rejected),
                    },
                }
            } else {
                match media_engine.match_remote_codec(kind, &remote_codecs, None) {
                    Some(codec) => sections.push(MediaSection {
                        mid,
                        media: media.media_name.media.clone(),
                        direction: RTCMediaDirection::Inactive,
                        codecs: vec![codec],
                        extensions: negotiated_extensions,
                        ..Default::default()
                    }),
                    None => sections.push(rejected),
                }
            }
        }

        for track in self.registry.outbound_tracks() {
            if placed.contains(track.id()) {
                continue;
            }
            let codecs = media_engine.codecs_for_encoding(track.kind(), track.encoding());
            let codec = match codecs.first() {
                Some(codec) => codec.clone(),
                None => {
                    debug!("no codec to send track {}", track.id());
                    continue;
                }
            };
            let mid = mids.allocate(track.mid());
            let local_extensions = media_engine.header_extensions_by_kind(track.kind());

            outbound_mids.push((track.id().clone(), mid.clone()));
            mappings.push(RTCTrackMapping::new(track.id().clone(), mid.clone(), &codec));
            mid_to_track.insert(mid.clone(), track.id().clone());
            extensions.insert(mid.clone(), local_extensions.clone());
            sections.push(self.outbound_section(track, mid, codecs, local_extensions));
        }

        let dtls_role = RTCDtlsRole::answering(
            RTCDtlsRole::from(&remote),
            self.configuration.setting_engine.answering_dtls_role,
        );
        trace!(
            "answer with {} media sections as {dtls_role}",
            sections.len()
        );

        let plan = AnswerPlan {
            description: RTCSessionDescription::default(),
            new_tracks,
            inbound_streams,
            outbound_mids,
            mappings,
            ssrc_to_mid,
            extensions,
            mid_to_track,
        };
        Ok((plan, sections, dtls_role.to_connection_role()))
    }

    fn is_inbound_id_taken(&self, id: &str, new_tracks: &[RTCTrack]) -> bool {
        new_tracks.iter().any(|t| t.id() == id)
            || self.registry.track(RTCTrackDirection::Inbound, id).is_some()
    }

    /// `base`, or `base` with the first numeric suffix no inbound track uses.
    fn free_inbound_id(&self, base: &str, new_tracks: &[RTCTrack]) -> TrackId {
        if !self.is_inbound_id_taken(base, new_tracks) {
            return base.to_owned();
        }
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|id| !self.is_inbound_id_taken(id, new_tracks))
            .unwrap_or_else(|| base.to_owned())
    }

    /// Finds the registered inbound track a remote sending section belongs
    /// to: by SSRC, then by msid track id, then by mid, then the first
    /// inbound track of the kind no section claimed yet.
    fn match_inbound_track(
        &self,
        kind: RtpCodecKind,
        mid: &str,
        ssrcs: &[SSRC],
        msid: Option<&(String, String)>,
        placed: &HashSet<TrackId>,
    ) -> Option<&RTCTrack> {
        let candidates: Vec<&RTCTrack> = self
            .registry
            .inbound_tracks()
            .iter()
            .filter(|t| t.kind() == kind && !placed.contains(t.id()))
            .collect();

        candidates
            .iter()
            .find(|t| t.ssrc().is_some_and(|ssrc| ssrcs.contains(&ssrc)))
            .or_else(|| {
                msid.and_then(|(_, track_id)| candidates.iter().find(|t| t.id() == track_id))
            })
            .or_else(|| candidates.iter().find(|t| t.mid() == Some(mid)))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|t| t.ssrc().is_none() && t.mid().is_none())
            })
            .copied()
    }

    /// Finds an unplaced outbound track of `kind` the remote can receive,
    /// preferring the one last placed in `mid`, with the codec to send it in.
    fn match_outbound_track(
        &self,
        kind: RtpCodecKind,
        mid: &str,
        remote_codecs: &[RTCRtpCodecParameters],
        placed: &HashSet<TrackId>,
    ) -> Option<(&RTCTrack, RTCRtpCodecParameters)> {
        let media_engine = &self.configuration.media_engine;
        let mut candidates: Vec<&RTCTrack> = self
            .registry
            .outbound_tracks()
            .iter()
            .filter(|t| t.kind() == kind && !placed.contains(t.id()))
            .collect();
        candidates.sort_by_key(|t| t.mid() != Some(mid));

        candidates.into_iter().find_map(|track| {
            let codec = media_engine.match_remote_codec(kind, remote_codecs, track.encoding())?;
            match track.encoding() {
                Some(encoding) if !same_encoding(encoding, codec.rtp_codec.encoding_name()) => {
                    None
                }
                _ => Some((track, codec)),
            }
        })
    }

    /// Reads what the remote answer agreed to for the sections of `offer`.
    pub(crate) fn apply_answer_sections(
        &self,
        offer: &PendingOffer,
        answer: &RTCSessionDescription,
    ) -> Result<AnswerPlan> {
        let remote = answer.unmarshal()?;

        let mut inbound_streams = vec![];
        let mut outbound_mids = vec![];
        let mut mappings = vec![];
        let mut ssrc_to_mid = HashMap::new();
        let mut extensions = HashMap::new();
        let mut mid_to_track = HashMap::new();

        for media in &remote.media_descriptions {
            let mid = get_mid_value(media).ok_or(Error::ErrRemoteDescriptionWithoutMidValue)?;
            let section = match offer.sections.iter().find(|s| s.mid == mid) {
                Some(section) => section,
                None => {
                    debug!("ignore answered media section {mid} that was never offered");
                    continue;
                }
            };
            let track_id = match &section.track_id {
                Some(track_id) => track_id.clone(),
                None => continue,
            };

            let direction = get_peer_direction(media);
            let codec = codecs_from_media_description(media).into_iter().find(|remote| {
                section
                    .codecs
                    .iter()
                    .any(|local| local.rtp_codec.same_encoding(&remote.rtp_codec))
            });
            let codec = match codec {
                Some(codec) => codec,
                None => {
                    debug!("media section {mid} answered without an offered codec");
                    continue;
                }
            };
            let agreed_extensions: Vec<RTCRtpHeaderExtensionParameters> =
                extmaps_from_media_description(media)
                    .into_iter()
                    .filter(|ext| section.extensions.iter().any(|e| e.uri == ext.uri))
                    .collect();

            if section.direction == RTCMediaDirection::Sendonly && direction.has_recv() {
                outbound_mids.push((track_id.clone(), mid.to_owned()));
            } else if section.direction == RTCMediaDirection::Recvonly && direction.has_send() {
                let ssrcs = ssrcs_from_media_description(media);
                for ssrc in &ssrcs {
                    ssrc_to_mid.insert(*ssrc, mid.to_owned());
                }
                inbound_streams.push(InboundStream {
                    track_id: track_id.clone(),
                    ssrc: ssrcs.first().copied(),
                    encoding: codec.rtp_codec.encoding_name().to_owned(),
                    mid: mid.to_owned(),
                });
            } else {
                debug!("media section {mid} answered {direction}, not negotiated");
                continue;
            }

            mappings.push(RTCTrackMapping::new(track_id.clone(), mid.to_owned(), &codec));
            mid_to_track.insert(mid.to_owned(), track_id);
            extensions.insert(mid.to_owned(), agreed_extensions);
        }

        Ok(AnswerPlan {
            description: answer.clone(),
            new_tracks: vec![],
            inbound_streams,
            outbound_mids,
            mappings,
            ssrc_to_mid,
            extensions,
            mid_to_track,
        })
    }

    /// Installs the tables of a completed round.
    pub(crate) fn commit_plan(&mut self, plan: &AnswerPlan) {
        for stream in &plan.inbound_streams {
            self.registry
                .set_inbound_stream(&stream.track_id, stream.ssrc, stream.encoding.clone());
            self.registry
                .set_mid(RTCTrackDirection::Inbound, &stream.track_id, stream.mid.clone());
        }
        for (track_id, mid) in &plan.outbound_mids {
            self.registry
                .set_mid(RTCTrackDirection::Outbound, track_id, mid.clone());
        }
        self.registry.replace_mappings(plan.mappings.clone());
        self.registry.replace_ssrc_to_mid(plan.ssrc_to_mid.clone());
        self.negotiated_extensions = plan.extensions.clone();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mid_allocator() {
        let mut mids = MidAllocator::default();
        mids.reserve("0");
        mids.reserve("audio");

        let tests = vec![
            (None, "1"),
            (Some("0"), "2"),
            (Some("video"), "video"),
            (Some("7"), "7"),
            (None, "8"),
            (Some("audio"), "9"),
        ];

        for (preferred, expected) in tests {
            assert_eq!(mids.allocate(preferred), expected, "preferred {preferred:?}");
        }
    }
}
