/// Integration tests for an endpoint that originates the offer.
///
/// The remote answer is written by hand from the mids the endpoint offered,
/// the way a browser would answer.
use anyhow::Result;
use sansio::Protocol;
use sdp::description::media::MediaDescription;
use sdp::description::session::SessionDescription;
use std::collections::HashMap;
use std::io::Cursor;

use rtc_endpoint::endpoint::RTCEndpoint;
use rtc_endpoint::endpoint::configuration::RTCConfigurationBuilder;
use rtc_endpoint::endpoint::configuration::negotiation_role::RTCNegotiationRole;
use rtc_endpoint::endpoint::event::{RTCEndpointEvent, RTCEvent, RTCMediaEvent, RTCTransportEvent};
use rtc_endpoint::endpoint::message::{
    RTCEndpointCommand, RTCEndpointMessage, RTCEndpointNotification, RTCGateCommand,
    RTCMediaCommand, RTCPortRequest, RTCSignal, RTCTransportCommand,
};
use rtc_endpoint::endpoint::state::RTCNegotiationState;
use rtc_endpoint::endpoint::transport::{RTCDtlsFingerprint, RTCIceParameters};
use rtc_endpoint::shared::error::Error;
use rtc_endpoint::track::{RTCTrack, RTCTrackDirection, RtpCodecKind};

fn credentials() -> RTCIceParameters {
    RTCIceParameters {
        username_fragment: "localufrag".to_owned(),
        password: "localpwd".to_owned(),
        ice_lite: false,
    }
}

fn fingerprint() -> RTCDtlsFingerprint {
    RTCDtlsFingerprint {
        algorithm: "sha-256".to_owned(),
        value: "01:02:03".to_owned(),
    }
}

fn candidate(n: u32) -> RTCEvent {
    RTCEvent::Transport(RTCTransportEvent::CandidateDiscovered(format!(
        "{n} 1 udp 2130706431 192.168.1.{n} 4000 typ host"
    )))
}

fn notifications(endpoint: &mut RTCEndpoint) -> Vec<RTCEndpointNotification> {
    std::iter::from_fn(|| endpoint.poll_read()).collect()
}

fn commands(endpoint: &mut RTCEndpoint) -> Vec<RTCEndpointCommand> {
    std::iter::from_fn(|| endpoint.poll_write()).collect()
}

fn events(endpoint: &mut RTCEndpoint) -> Vec<RTCEndpointEvent> {
    std::iter::from_fn(|| endpoint.poll_event()).collect()
}

fn parse(sdp: &str) -> Result<SessionDescription> {
    let mut reader = Cursor::new(sdp.as_bytes());
    Ok(SessionDescription::unmarshal(&mut reader)?)
}

fn attribute<'a>(media: &'a MediaDescription, key: &str) -> Option<&'a str> {
    media
        .attributes
        .iter()
        .find(|a| a.key == key)
        .and_then(|a| a.value.as_deref())
}

fn has_property(media: &MediaDescription, key: &str) -> bool {
    media.attributes.iter().any(|a| a.key == key)
}

fn offerer() -> Result<RTCEndpoint> {
    let config = RTCConfigurationBuilder::new()
        .with_role(RTCNegotiationRole::Offerer)
        .with_outbound_tracks(vec![RTCTrack::new_outbound(
            "audio-1",
            RtpCodecKind::Audio,
            "opus",
            "stream-1",
        )])
        .with_inbound_tracks(vec![RTCTrack::new_inbound(
            "video-in",
            RtpCodecKind::Video,
            "remote",
        )])
        .build();
    Ok(RTCEndpoint::new(config)?)
}

/// Offers and returns the offered (audio mid, video mid).
fn send_offer(endpoint: &mut RTCEndpoint) -> Result<(String, String)> {
    endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::FingerprintReady(
        fingerprint(),
    )))?;
    endpoint.handle_event(RTCEvent::Transport(
        RTCTransportEvent::LocalCredentialsReady(credentials()),
    ))?;

    let out = notifications(endpoint);
    let sdp = match out.first() {
        Some(RTCEndpointNotification::Signal(RTCSignal::SdpOffer { sdp })) => sdp.clone(),
        other => anyhow::bail!("expected an offer, got {other:?}"),
    };
    let offer = parse(&sdp)?;
    assert_eq!(offer.media_descriptions.len(), 2);

    let audio = &offer.media_descriptions[0];
    let video = &offer.media_descriptions[1];
    assert_eq!(audio.media_name.media, "audio");
    assert!(has_property(audio, "sendonly"));
    assert_eq!(attribute(audio, "setup"), Some("actpass"));
    assert_eq!(video.media_name.media, "video");
    assert!(has_property(video, "recvonly"));

    let audio_mid = attribute(audio, "mid").ok_or(anyhow::anyhow!("no audio mid"))?;
    let video_mid = attribute(video, "mid").ok_or(anyhow::anyhow!("no video mid"))?;
    Ok((audio_mid.to_owned(), video_mid.to_owned()))
}

fn remote_answer(audio_mid: &str, video_mid: &str) -> String {
    format!(
        "v=0\r\n\
o=- 7614219274584779017 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
a=group:BUNDLE {audio_mid} {video_mid}\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=fingerprint:sha-256 AB:CD:EF\r\n\
a=setup:active\r\n\
a=mid:{audio_mid}\r\n\
a=recvonly\r\n\
a=rtcp-mux\r\n\
a=rtpmap:111 opus/48000/2\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=fingerprint:sha-256 AB:CD:EF\r\n\
a=setup:active\r\n\
a=mid:{video_mid}\r\n\
a=msid:remote-stream remote-video\r\n\
a=sendonly\r\n\
a=rtcp-mux\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=ssrc:7777 cname:remote\r\n"
    )
}

#[test]
fn test_offer_precedes_candidates() -> Result<()> {
    env_logger::builder().is_test(true).try_init().ok();

    let mut endpoint = offerer()?;
    endpoint.handle_event(candidate(1))?;
    endpoint.handle_event(candidate(2))?;
    assert!(notifications(&mut endpoint).is_empty());

    endpoint.handle_event(RTCEvent::Transport(RTCTransportEvent::FingerprintReady(
        fingerprint(),
    )))?;
    assert!(notifications(&mut endpoint).is_empty());
    endpoint.handle_event(RTCEvent::Transport(
        RTCTransportEvent::LocalCredentialsReady(credentials()),
    ))?;

    let out = notifications(&mut endpoint);
    assert_eq!(out.len(), 3, "{out:?}");
    assert!(matches!(
        &out[0],
        RTCEndpointNotification::Signal(RTCSignal::SdpOffer { .. })
    ));
    let disclosed: Vec<&str> = out[1..]
        .iter()
        .filter_map(|n| match n {
            RTCEndpointNotification::Signal(RTCSignal::Candidate { candidate }) => {
                Some(candidate.candidate.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        disclosed,
        vec![
            "candidate:1 1 udp 2130706431 192.168.1.1 4000 typ host",
            "candidate:2 1 udp 2130706431 192.168.1.2 4000 typ host",
        ]
    );

    // once the offer is out, candidates go one by one
    endpoint.handle_event(candidate(3))?;
    let out = notifications(&mut endpoint);
    assert_eq!(out.len(), 1);
    assert!(matches!(
        &out[0],
        RTCEndpointNotification::Signal(RTCSignal::Candidate { candidate })
            if candidate.sdp_mline_index == Some(0) && candidate.sdp_mid.is_some()
    ));

    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Pending);
    assert!(
        commands(&mut endpoint)
            .iter()
            .any(|c| matches!(c, RTCEndpointCommand::Transport(RTCTransportCommand::GatherCandidates)))
    );

    Ok(())
}

#[test]
fn test_offerer_applies_answer() -> Result<()> {
    env_logger::builder().is_test(true).try_init().ok();

    let mut endpoint = offerer()?;
    let (audio_mid, video_mid) = send_offer(&mut endpoint)?;
    commands(&mut endpoint);
    events(&mut endpoint);

    endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(remote_answer(
        &audio_mid, &video_mid,
    ))))?;

    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Negotiated);
    assert_eq!(
        notifications(&mut endpoint),
        vec![RTCEndpointNotification::MidToTrack(HashMap::from([
            (audio_mid.clone(), "audio-1".to_owned()),
            (video_mid.clone(), "video-in".to_owned()),
        ]))]
    );

    let audio = endpoint
        .registry()
        .current_mapping_for("audio-1")
        .ok_or(anyhow::anyhow!("no audio mapping"))?;
    assert_eq!(audio.mid, audio_mid);
    assert_eq!(audio.payload_type, 111);
    assert_eq!(audio.clock_rate, 48000);

    // the sendonly side of the answer feeds the ssrc table
    assert_eq!(endpoint.registry().mid_for_ssrc(7777), Some(video_mid.as_str()));

    let cmds = commands(&mut endpoint);
    assert!(matches!(
        &cmds[..],
        [RTCEndpointCommand::Transport(RTCTransportCommand::SetRemoteCredentials(remote))]
            if remote.username_fragment == "remoteufrag"
    ));

    endpoint.handle_event(RTCEvent::Media(RTCMediaEvent::NewStreamDetected {
        ssrc: 7777,
        payload_type: 96,
    }))?;
    assert_eq!(
        notifications(&mut endpoint),
        vec![RTCEndpointNotification::NewTrack(
            "video-in".to_owned(),
            "VP8".to_owned()
        )]
    );

    endpoint.handle_write(RTCPortRequest::Outbound("audio-1".to_owned()))?;
    let cmds = commands(&mut endpoint);
    assert_eq!(cmds.len(), 2, "{cmds:?}");
    match &cmds[0] {
        RTCEndpointCommand::Media(RTCMediaCommand::LinkOutbound {
            track_id,
            payload_type,
            clock_rate,
            encoding,
            ..
        }) => {
            assert_eq!(track_id, "audio-1");
            assert_eq!(*payload_type, 111);
            assert_eq!(*clock_rate, 48000);
            assert_eq!(encoding, "opus");
        }
        other => anyhow::bail!("expected LinkOutbound, got {other:?}"),
    }
    assert!(matches!(
        &cmds[1],
        RTCEndpointCommand::Gate(id, RTCGateCommand::Create { enabled: true }) if id == "audio-1"
    ));

    Ok(())
}

#[test]
fn test_offerer_rejects_offers_and_unsolicited_answers() -> Result<()> {
    env_logger::builder().is_test(true).try_init().ok();

    let mut endpoint = offerer()?;
    let answer = remote_answer("0", "1");

    assert_eq!(
        endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(answer.clone()))),
        Err(Error::ErrIncorrectSignalingState)
    );
    assert_eq!(
        endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::offer(answer))),
        Err(Error::ErrIncorrectSignalingState)
    );
    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Idle);

    Ok(())
}

#[test]
fn test_answer_to_superseded_offer_is_discarded() -> Result<()> {
    env_logger::builder().is_test(true).try_init().ok();

    let mut endpoint = offerer()?;
    let (audio_mid, video_mid) = send_offer(&mut endpoint)?;
    commands(&mut endpoint);
    events(&mut endpoint);

    endpoint.handle_read(RTCEndpointMessage::AddTracks(vec![RTCTrack::new_outbound(
        "video-1",
        RtpCodecKind::Video,
        "VP8",
        "stream-1",
    )]))?;
    let cmds = commands(&mut endpoint);
    assert!(matches!(
        &cmds[..],
        [RTCEndpointCommand::Transport(RTCTransportCommand::RestartStream)]
    ));
    assert!(events(&mut endpoint).contains(&RTCEndpointEvent::OnNegotiationNeededEvent));

    // the answer to the first offer arrives late
    endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(remote_answer(
        &audio_mid, &video_mid,
    ))))?;
    assert!(notifications(&mut endpoint).is_empty());
    assert!(endpoint.registry().mappings().is_empty());
    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Pending);

    // the restarted transport comes back with new credentials
    endpoint.handle_event(RTCEvent::Transport(
        RTCTransportEvent::LocalCredentialsReady(credentials()),
    ))?;
    let out = notifications(&mut endpoint);
    let sdp = match out.first() {
        Some(RTCEndpointNotification::Signal(RTCSignal::SdpOffer { sdp })) => sdp.clone(),
        other => anyhow::bail!("expected a new offer, got {other:?}"),
    };
    let offer = parse(&sdp)?;
    assert_eq!(offer.media_descriptions.len(), 3);

    // mids of the earlier offer are kept, the new track gets a fresh one
    let mids: Vec<&str> = offer
        .media_descriptions
        .iter()
        .filter_map(|m| attribute(m, "mid"))
        .collect();
    assert_eq!(mids[0], audio_mid);
    assert!(mids.contains(&video_mid.as_str()));
    assert_eq!(mids.len(), 3);
    assert!(mids[1] != audio_mid && mids[1] != video_mid);

    let video_track = endpoint
        .registry()
        .track(RTCTrackDirection::Outbound, "video-1")
        .ok_or(anyhow::anyhow!("video-1 missing"))?;
    assert_eq!(video_track.mid(), Some(mids[1]));

    Ok(())
}

#[test]
fn test_late_answer_after_new_offer_is_discarded() -> Result<()> {
    env_logger::builder().is_test(true).try_init().ok();

    let mut endpoint = offerer()?;
    let (audio_mid, video_mid) = send_offer(&mut endpoint)?;
    commands(&mut endpoint);
    events(&mut endpoint);

    endpoint.handle_read(RTCEndpointMessage::AddTracks(vec![RTCTrack::new_outbound(
        "video-1",
        RtpCodecKind::Video,
        "VP8",
        "stream-1",
    )]))?;
    endpoint.handle_event(RTCEvent::Transport(
        RTCTransportEvent::LocalCredentialsReady(credentials()),
    ))?;
    let sdp = match notifications(&mut endpoint).first() {
        Some(RTCEndpointNotification::Signal(RTCSignal::SdpOffer { sdp })) => sdp.clone(),
        other => anyhow::bail!("expected a new offer, got {other:?}"),
    };
    let offer = parse(&sdp)?;
    let mids: Vec<String> = offer
        .media_descriptions
        .iter()
        .filter_map(|m| attribute(m, "mid").map(str::to_owned))
        .collect();
    assert_eq!(mids.len(), 3);
    commands(&mut endpoint);
    events(&mut endpoint);

    // the answer to the first offer arrives after the second offer went out
    endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(remote_answer(
        &audio_mid, &video_mid,
    ))))?;
    assert!(notifications(&mut endpoint).is_empty());
    assert!(commands(&mut endpoint).is_empty());
    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Pending);
    assert!(endpoint.registry().mappings().is_empty());
    assert!(endpoint.current_remote_description().is_none());

    let answer_for = |m0: &str, m1: &str, m2: &str| {
        format!(
            "v=0\r\n\
o=- 7614219274584779018 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
a=group:BUNDLE {m0} {m1} {m2}\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=fingerprint:sha-256 AB:CD:EF\r\n\
a=setup:active\r\n\
a=mid:{m0}\r\n\
a=recvonly\r\n\
a=rtcp-mux\r\n\
a=rtpmap:111 opus/48000/2\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=fingerprint:sha-256 AB:CD:EF\r\n\
a=setup:active\r\n\
a=mid:{m1}\r\n\
a=recvonly\r\n\
a=rtcp-mux\r\n\
a=rtpmap:96 VP8/90000\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
c=IN IP4 0.0.0.0\r\n\
a=ice-ufrag:remoteufrag\r\n\
a=ice-pwd:remotepwd\r\n\
a=fingerprint:sha-256 AB:CD:EF\r\n\
a=setup:active\r\n\
a=mid:{m2}\r\n\
a=msid:remote-stream remote-video\r\n\
a=sendonly\r\n\
a=rtcp-mux\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=ssrc:7777 cname:remote\r\n"
        )
    };

    // sections answered in another order than offered
    let reordered = answer_for(&mids[0], &mids[2], &mids[1]);
    endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(reordered)))?;
    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Pending);
    assert!(endpoint.registry().mappings().is_empty());

    let answer = answer_for(&mids[0], &mids[1], &mids[2]);
    endpoint.handle_read(RTCEndpointMessage::Signal(RTCSignal::answer(answer)))?;
    assert_eq!(endpoint.negotiation_state(), RTCNegotiationState::Negotiated);

    let registry = endpoint.registry();
    let mapping = registry
        .current_mapping_for("video-1")
        .ok_or(anyhow::anyhow!("video-1 has no mapping"))?;
    assert_eq!(mapping.mid, mids[1]);
    assert_eq!(mapping.encoding_name, "VP8");
    assert!(registry.current_mapping_for("audio-1").is_some());

    Ok(())
}
