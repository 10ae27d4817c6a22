use super::{RTCTrack, RTCTrackDirection, RTCTrackMapping, RtpCodecKind, SSRC, TrackId};
use log::{debug, trace};
use shared::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Single source of truth for the tracks of both directions and for the
/// identifier tables tying them to negotiated media sections.
#[derive(Default, Debug, Clone)]
pub struct TrackRegistry {
    inbound_tracks: Vec<RTCTrack>,
    outbound_tracks: Vec<RTCTrack>,
    mappings: Vec<RTCTrackMapping>,
    ssrc_to_mid: HashMap<SSRC, String>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `tracks` into the set of the given direction.
    ///
    /// Outbound tracks without an SSRC get one drawn disjoint from every SSRC
    /// already in the registry. Inbound SSRCs are chosen by the remote peer
    /// and only need to be distinct among inbound streams. Nothing is
    /// registered when any track fails validation.
    pub fn register_tracks(
        &mut self,
        direction: RTCTrackDirection,
        tracks: Vec<RTCTrack>,
    ) -> Result<()> {
        if direction == RTCTrackDirection::Unspecified {
            return Err(Error::ErrUnspecifiedTrackDirection);
        }

        let mut used = self.used_ssrcs(direction);
        {
            let mut ids: HashSet<&str> = self
                .tracks(direction)
                .iter()
                .map(|t| t.id().as_str())
                .collect();
            for track in &tracks {
                if !ids.insert(track.id().as_str()) {
                    return Err(Error::ErrDuplicateTrackId(track.id().clone()));
                }
                if track.kind() == RtpCodecKind::Unspecified {
                    return Err(Error::ErrUnknownCodecKind(track.id().clone()));
                }
                if let Some(ssrc) = track.ssrc()
                    && !used.insert(ssrc)
                {
                    return Err(Error::ErrDuplicateSsrc(ssrc));
                }
            }
        }

        for mut track in tracks {
            track.set_direction(direction);
            if direction == RTCTrackDirection::Outbound && track.ssrc().is_none() {
                let ssrc = allocate_ssrc(&used);
                used.insert(ssrc);
                track.set_ssrc(ssrc);
            }
            trace!(
                "register {} track {} with ssrc {:?}",
                direction,
                track.id(),
                track.ssrc()
            );
            self.tracks_mut(direction).push(track);
        }

        Ok(())
    }

    /// Removes the outbound tracks named in `ids` and returns them. Ids that
    /// are not registered are ignored.
    pub fn remove_tracks(&mut self, ids: &[TrackId]) -> Vec<RTCTrack> {
        let (removed, kept): (Vec<RTCTrack>, Vec<RTCTrack>) = self
            .outbound_tracks
            .drain(..)
            .partition(|t| ids.contains(t.id()));
        self.outbound_tracks = kept;

        for id in ids {
            if !removed.iter().any(|t| t.id() == id) {
                debug!("ignore removal of unknown track {id}");
            }
        }
        self.mappings
            .retain(|m| !removed.iter().any(|t| t.id() == &m.track_id));

        removed
    }

    /// Attributes a newly detected inbound SSRC to the track negotiated for
    /// its media section and stamps the track's `ssrc` and `encoding`.
    ///
    /// Fails with [`Error::ErrUnresolvedSsrc`] when no negotiated media
    /// section announced the SSRC; the registry is left unchanged then.
    pub fn resolve_inbound_stream(&mut self, ssrc: SSRC, payload_type: u8) -> Result<&RTCTrack> {
        let mid = self
            .ssrc_to_mid
            .get(&ssrc)
            .ok_or(Error::ErrUnresolvedSsrc(ssrc))?;
        let index = self
            .inbound_tracks
            .iter()
            .position(|t| t.mid() == Some(mid.as_str()))
            .ok_or(Error::ErrUnresolvedSsrc(ssrc))?;

        let encoding = match self
            .mappings
            .iter()
            .find(|m| &m.track_id == self.inbound_tracks[index].id())
        {
            Some(mapping) => {
                if mapping.payload_type != payload_type {
                    debug!(
                        "ssrc {ssrc} uses payload type {payload_type}, negotiated {}",
                        mapping.payload_type
                    );
                }
                Some(mapping.encoding_name.clone())
            }
            None => None,
        };

        let track = &mut self.inbound_tracks[index];
        track.set_ssrc(ssrc);
        if let Some(encoding) = encoding {
            track.set_encoding(encoding);
        }

        Ok(&self.inbound_tracks[index])
    }

    /// Mapping of the last completed negotiation round for `track_id`.
    pub fn current_mapping_for(&self, track_id: &str) -> Option<&RTCTrackMapping> {
        self.mappings.iter().find(|m| m.track_id == track_id)
    }

    pub fn mappings(&self) -> &[RTCTrackMapping] {
        &self.mappings
    }

    pub fn mid_for_ssrc(&self, ssrc: SSRC) -> Option<&str> {
        self.ssrc_to_mid.get(&ssrc).map(|mid| mid.as_str())
    }

    pub fn tracks(&self, direction: RTCTrackDirection) -> &[RTCTrack] {
        match direction {
            RTCTrackDirection::Inbound => &self.inbound_tracks,
            RTCTrackDirection::Outbound => &self.outbound_tracks,
            RTCTrackDirection::Unspecified => &[],
        }
    }

    pub fn inbound_tracks(&self) -> &[RTCTrack] {
        &self.inbound_tracks
    }

    pub fn outbound_tracks(&self) -> &[RTCTrack] {
        &self.outbound_tracks
    }

    pub fn track(&self, direction: RTCTrackDirection, id: &str) -> Option<&RTCTrack> {
        self.tracks(direction).iter().find(|t| t.id() == id)
    }

    /// Looks a track up by id in either direction.
    pub fn find_track(&self, id: &str) -> Option<&RTCTrack> {
        self.track(RTCTrackDirection::Outbound, id)
            .or_else(|| self.track(RTCTrackDirection::Inbound, id))
    }

    pub fn inbound_track_by_ssrc(&self, ssrc: SSRC) -> Option<&RTCTrack> {
        self.inbound_tracks.iter().find(|t| t.ssrc() == Some(ssrc))
    }

    /// Whether no track is registered in either direction.
    pub fn is_empty(&self) -> bool {
        self.inbound_tracks.is_empty() && self.outbound_tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inbound_tracks.len() + self.outbound_tracks.len()
    }

    pub(crate) fn set_mid(&mut self, direction: RTCTrackDirection, id: &str, mid: String) {
        if let Some(track) = self.tracks_mut(direction).iter_mut().find(|t| t.id() == id) {
            track.set_mid(mid);
        }
    }

    /// Stamps an inbound track with the stream a remote offer announced for it.
    pub(crate) fn set_inbound_stream(&mut self, id: &str, ssrc: Option<SSRC>, encoding: String) {
        if let Some(track) = self.inbound_tracks.iter_mut().find(|t| t.id() == id) {
            if let Some(ssrc) = ssrc {
                track.set_ssrc(ssrc);
            }
            track.set_encoding(encoding);
        }
    }

    /// Installs the mappings of a completed round, dropping the previous ones.
    /// Only the first mapping of a track is kept.
    pub(crate) fn replace_mappings(&mut self, mappings: Vec<RTCTrackMapping>) {
        let mut seen = HashSet::new();
        self.mappings = mappings
            .into_iter()
            .filter(|m| seen.insert(m.track_id.clone()))
            .collect();
    }

    /// Installs the SSRC to mid table of a completed round, dropping the previous one.
    pub(crate) fn replace_ssrc_to_mid(&mut self, ssrc_to_mid: HashMap<SSRC, String>) {
        self.ssrc_to_mid = ssrc_to_mid;
    }

    fn tracks_mut(&mut self, direction: RTCTrackDirection) -> &mut Vec<RTCTrack> {
        match direction {
            RTCTrackDirection::Inbound => &mut self.inbound_tracks,
            _ => &mut self.outbound_tracks,
        }
    }

    /// SSRCs a track registered in `direction` must not reuse.
    fn used_ssrcs(&self, direction: RTCTrackDirection) -> HashSet<SSRC> {
        match direction {
            RTCTrackDirection::Inbound => self
                .inbound_tracks
                .iter()
                .filter_map(|t| t.ssrc())
                .collect(),
            _ => self
                .inbound_tracks
                .iter()
                .chain(self.outbound_tracks.iter())
                .filter_map(|t| t.ssrc())
                .chain(self.ssrc_to_mid.keys().copied())
                .collect(),
        }
    }
}

fn allocate_ssrc(used: &HashSet<SSRC>) -> SSRC {
    loop {
        let ssrc = rand::random::<u32>();
        if ssrc != 0 && !used.contains(&ssrc) {
            return ssrc;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn outbound(id: &str, kind: RtpCodecKind) -> RTCTrack {
        let encoding = if kind == RtpCodecKind::Audio { "OPUS" } else { "VP8" };
        RTCTrack::new_outbound(id, kind, encoding, "stream")
    }

    #[test]
    fn test_register_outbound_allocates_distinct_ssrcs() -> Result<()> {
        let mut registry = TrackRegistry::new();
        let tracks: Vec<RTCTrack> = (0..64)
            .map(|i| outbound(&format!("t{i}"), RtpCodecKind::Video))
            .collect();
        registry.register_tracks(RTCTrackDirection::Outbound, tracks)?;

        let ssrcs: HashSet<SSRC> = registry
            .outbound_tracks()
            .iter()
            .map(|t| t.ssrc().unwrap_or(0))
            .collect();
        assert_eq!(ssrcs.len(), 64);
        assert!(!ssrcs.contains(&0));

        Ok(())
    }

    #[test]
    fn test_register_keeps_inbound_ssrc_unresolved() -> Result<()> {
        let mut registry = TrackRegistry::new();
        registry.register_tracks(
            RTCTrackDirection::Inbound,
            vec![RTCTrack::new_inbound("in", RtpCodecKind::Audio, "s")],
        )?;

        let track = registry.track(RTCTrackDirection::Inbound, "in");
        assert_eq!(track.map(|t| t.ssrc()), Some(None));
        assert_eq!(
            track.map(|t| t.direction()),
            Some(RTCTrackDirection::Inbound)
        );

        Ok(())
    }

    #[test]
    fn test_register_rejects_duplicates() -> Result<()> {
        let mut registry = TrackRegistry::new();
        registry.register_tracks(
            RTCTrackDirection::Outbound,
            vec![outbound("a", RtpCodecKind::Audio).with_ssrc(1000)],
        )?;

        let tests = vec![
            (
                vec![outbound("a", RtpCodecKind::Audio)],
                Error::ErrDuplicateTrackId("a".to_owned()),
            ),
            (
                vec![
                    outbound("b", RtpCodecKind::Audio),
                    outbound("b", RtpCodecKind::Video),
                ],
                Error::ErrDuplicateTrackId("b".to_owned()),
            ),
            (
                vec![outbound("c", RtpCodecKind::Video).with_ssrc(1000)],
                Error::ErrDuplicateSsrc(1000),
            ),
            (
                vec![outbound("d", RtpCodecKind::Unspecified)],
                Error::ErrUnknownCodecKind("d".to_owned()),
            ),
        ];

        for (tracks, expected) in tests {
            assert_eq!(
                registry.register_tracks(RTCTrackDirection::Outbound, tracks),
                Err(expected)
            );
            assert_eq!(registry.outbound_tracks().len(), 1);
        }

        // the same id is fine in the other direction
        registry.register_tracks(
            RTCTrackDirection::Inbound,
            vec![RTCTrack::new_inbound("a", RtpCodecKind::Audio, "s")],
        )?;
        assert_eq!(registry.len(), 2);

        Ok(())
    }

    #[test]
    fn test_inbound_ssrc_may_match_outbound() -> Result<()> {
        let mut registry = TrackRegistry::new();
        registry.register_tracks(
            RTCTrackDirection::Outbound,
            vec![outbound("out", RtpCodecKind::Audio).with_ssrc(1111)],
        )?;

        registry.register_tracks(
            RTCTrackDirection::Inbound,
            vec![RTCTrack::new_inbound("in", RtpCodecKind::Audio, "s").with_ssrc(1111)],
        )?;
        assert_eq!(
            registry.inbound_track_by_ssrc(1111).map(|t| t.id().as_str()),
            Some("in")
        );

        let tests = vec![
            (
                RTCTrackDirection::Inbound,
                RTCTrack::new_inbound("in-2", RtpCodecKind::Audio, "s").with_ssrc(1111),
            ),
            (
                RTCTrackDirection::Outbound,
                outbound("out-2", RtpCodecKind::Audio).with_ssrc(1111),
            ),
        ];
        for (direction, track) in tests {
            assert_eq!(
                registry.register_tracks(direction, vec![track]),
                Err(Error::ErrDuplicateSsrc(1111))
            );
        }
        assert_eq!(registry.len(), 2);

        Ok(())
    }

    #[test]
    fn test_remove_tracks() -> Result<()> {
        let mut registry = TrackRegistry::new();
        registry.register_tracks(
            RTCTrackDirection::Outbound,
            vec![
                outbound("a", RtpCodecKind::Audio),
                outbound("b", RtpCodecKind::Video),
            ],
        )?;
        registry.replace_mappings(vec![RTCTrackMapping {
            track_id: "a".to_owned(),
            mid: "0".to_owned(),
            payload_type: 111,
            clock_rate: 48000,
            encoding_name: "opus".to_owned(),
        }]);

        let removed = registry.remove_tracks(&["a".to_owned(), "unknown".to_owned()]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), "a");
        assert!(registry.current_mapping_for("a").is_none());

        let removed = registry.remove_tracks(&["unknown".to_owned()]);
        assert!(removed.is_empty());
        assert_eq!(registry.outbound_tracks().len(), 1);
        assert_eq!(registry.outbound_tracks()[0].id(), "b");

        Ok(())
    }

    #[test]
    fn test_resolve_inbound_stream() -> Result<()> {
        let mut registry = TrackRegistry::new();
        registry.register_tracks(
            RTCTrackDirection::Inbound,
            vec![RTCTrack::new_inbound("in", RtpCodecKind::Video, "s")],
        )?;
        registry.set_mid(RTCTrackDirection::Inbound, "in", "1".to_owned());
        registry.replace_mappings(vec![RTCTrackMapping {
            track_id: "in".to_owned(),
            mid: "1".to_owned(),
            payload_type: 102,
            clock_rate: 90000,
            encoding_name: "H264".to_owned(),
        }]);
        registry.replace_ssrc_to_mid(HashMap::from([(4000, "1".to_owned())]));

        assert_eq!(
            registry.resolve_inbound_stream(5000, 111).map(|t| t.id().clone()),
            Err(Error::ErrUnresolvedSsrc(5000))
        );
        assert_eq!(registry.inbound_tracks()[0].ssrc(), None);

        let track = registry.resolve_inbound_stream(4000, 102)?;
        assert_eq!(track.id(), "in");
        assert_eq!(track.ssrc(), Some(4000));
        assert_eq!(track.encoding(), Some("H264"));
        assert_eq!(
            registry.inbound_track_by_ssrc(4000).map(|t| t.id().as_str()),
            Some("in")
        );

        Ok(())
    }

    #[test]
    fn test_replace_mappings_keeps_one_per_track() {
        let mut registry = TrackRegistry::new();
        let mapping = |mid: &str| RTCTrackMapping {
            track_id: "t".to_owned(),
            mid: mid.to_owned(),
            payload_type: 96,
            clock_rate: 90000,
            encoding_name: "VP8".to_owned(),
        };
        registry.replace_mappings(vec![mapping("0"), mapping("1")]);

        assert_eq!(registry.mappings().len(), 1);
        assert_eq!(registry.current_mapping_for("t").map(|m| m.mid.as_str()), Some("0"));
    }
}
