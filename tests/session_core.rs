//! End-to-end scenarios against the real `Session` state machine, driven
//! through fake `PeerConnection`/`SignallingTransport`/`ConferenceSink`
//! implementations (no network, no real WebRTC stack).

mod support;

use std::sync::Arc;
use std::time::Duration;

use jingle_core::jingle::{Creator, ns};
use jingle_core::log::NoopLogSink;
use jingle_core::{HostEvent, IceConnectionState, PeerConnectionEvent, Session, SessionConfig, SessionState};

use support::{content_element, jid, local_candidate, session_initiate, source_add, FakeConference, FakePeerConnection, FakeTransport, SourceSpec, TransportMode};

fn new_session(transport: Arc<FakeTransport>, pc: Arc<FakePeerConnection>, conference: Arc<FakeConference>, config: SessionConfig) -> Session {
    Session::new("sid1", jid("me@example.com/res"), jid("peer@example.com/res"), Creator::Responder, config, transport, pc, conference, Arc::new(NoopLogSink))
}

/// S1: accepting a session-initiate with one audio and one video content
/// moves the session to ACTIVE and transmits a mirroring session-accept.
#[test]
fn accept_offer_activates_and_sends_session_accept() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport.clone(), pc, conference, SessionConfig::default());

    let audio = content_element(
        "audio0",
        "audio",
        111,
        "opus",
        48_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[SourceSpec { ssrc: 111, cname: "stream1", owner: Some("alice") }],
        None,
    );
    let video = content_element(
        "video0",
        "video",
        96,
        "VP8",
        90_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[
            SourceSpec { ssrc: 222, cname: "stream1", owner: Some("alice") },
            SourceSpec { ssrc: 223, cname: "stream1", owner: Some("alice") },
        ],
        Some(("FID", &[222, 223])),
    );
    let offer = session_initiate(vec![audio, video]);

    session.accept_offer(&offer).unwrap();

    assert_eq!(session.state(), SessionState::Active);

    let sent = transport.sent_stanzas();
    assert_eq!(sent.len(), 1);
    let jingle = sent[0].get_child("jingle", ns::JINGLE).unwrap();
    assert_eq!(jingle.attr("action"), Some("session-accept"));
    let contents: Vec<&minidom::Element> = jingle.children().filter(|c| c.is("content", ns::JINGLE)).collect();
    assert_eq!(contents.len(), 2);
    let names: Vec<Option<&str>> = contents.iter().map(|c| c.attr("name")).collect();
    assert!(names.contains(&Some("audio0")));
    assert!(names.contains(&Some("video0")));
}

/// S2: five UDP candidates dripped within the flush window collapse into
/// one transport-info stanza carrying all five.
#[test]
fn drip_candidates_collapse_into_one_transport_info() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let mut config = SessionConfig::default();
    config.use_drip = true;
    config.drip_flush = Duration::from_millis(30);
    let session = new_session(transport.clone(), pc.clone(), conference, config);

    let offer = session_initiate(vec![content_element(
        "audio0",
        "audio",
        111,
        "opus",
        48_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[SourceSpec { ssrc: 111, cname: "stream1", owner: None }],
        None,
    )]);
    session.accept_offer(&offer).unwrap();

    for i in 0..5 {
        session.on_local_candidate(local_candidate(0, "audio0"));
        let _ = i;
    }

    std::thread::sleep(Duration::from_millis(100));

    let sent = transport.sent_stanzas();
    let transport_info: Vec<&minidom::Element> = sent
        .iter()
        .filter(|iq| iq.get_child("jingle", ns::JINGLE).is_some_and(|j| j.attr("action") == Some("transport-info")))
        .collect();
    assert_eq!(transport_info.len(), 1);

    let jingle = transport_info[0].get_child("jingle", ns::JINGLE).unwrap();
    let content = jingle.get_child("content", ns::JINGLE).unwrap();
    let transport_el = content.get_child("transport", ns::JINGLE_ICE_UDP).unwrap();
    let candidates: Vec<&minidom::Element> = transport_el.children().filter(|c| c.is("candidate", ns::JINGLE_ICE_UDP)).collect();
    assert_eq!(candidates.len(), 5);
}

/// S3/S4: a source-add patches the remote SDP once; a duplicate source-add
/// for the same ssrc is a no-op.
#[test]
fn source_add_patches_remote_sdp_once() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport, pc, conference, SessionConfig::default());

    let offer = session_initiate(vec![content_element(
        "video0",
        "video",
        96,
        "VP8",
        90_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[
            SourceSpec { ssrc: 222, cname: "stream1", owner: None },
            SourceSpec { ssrc: 223, cname: "stream1", owner: None },
        ],
        Some(("FID", &[222, 223])),
    )]);
    session.accept_offer(&offer).unwrap();

    let add = content_element(
        "video0",
        "video",
        96,
        "VP8",
        90_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[SourceSpec { ssrc: 333, cname: "x", owner: None }],
        Some(("FID", &[333, 334])),
    );
    let stanza = source_add(add);

    session.add_remote_stream(&stanza);
    std::thread::sleep(Duration::from_millis(50));

    // Re-sending the identical source-add must not panic or corrupt state;
    // it is treated as a duplicate (existing ssrc) and skipped.
    session.add_remote_stream(&stanza);
    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(session.state(), SessionState::Active);
}

/// S5: transport-replace renegotiates twice (stripped, then full) and sends
/// one transport-accept.
#[test]
fn transport_replace_renegotiates_twice_and_sends_transport_accept() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport.clone(), pc, conference.clone(), SessionConfig::default());

    let initial = session_initiate(vec![content_element(
        "audio0",
        "audio",
        111,
        "opus",
        48_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[SourceSpec { ssrc: 111, cname: "stream1", owner: None }],
        None,
    )]);
    session.accept_offer(&initial).unwrap();

    let replace = session_initiate(vec![
        content_element(
            "audio0",
            "audio",
            111,
            "opus",
            48_000,
            "bbbb",
            "newpwdaaaaaaaaaaaaaaaaaaaaa",
            &[SourceSpec { ssrc: 111, cname: "stream1", owner: None }],
            None,
        ),
        content_element("data", "application", 0, "", 0, "bbbb", "newpwdaaaaaaaaaaaaaaaaaaaaa", &[], None),
    ]);

    session.replace_transport(&replace).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    assert!(conference.events().iter().any(|e| matches!(e, HostEvent::IceRestarting)));

    let sent = transport.sent_stanzas();
    let transport_accept_count = sent
        .iter()
        .filter(|iq| iq.get_child("jingle", ns::JINGLE).is_some_and(|j| j.attr("action") == Some("transport-accept")))
        .count();
    assert_eq!(transport_accept_count, 1);
}

/// S6: a session-accept IQ that times out escalates to
/// `SessionAcceptTimeout`.
#[test]
fn session_accept_timeout_escalates_to_host_event() {
    let transport = Arc::new(FakeTransport::new(TransportMode::NeverRespond));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport, pc, conference.clone(), SessionConfig::default());

    let offer = session_initiate(vec![content_element(
        "audio0",
        "audio",
        111,
        "opus",
        48_000,
        "aaaa",
        "pwdaaaaaaaaaaaaaaaaaaaaaaaa",
        &[SourceSpec { ssrc: 111, cname: "stream1", owner: None }],
        None,
    )]);
    session.accept_offer(&offer).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    assert!(conference.events().iter().any(|e| matches!(e, HostEvent::SessionAcceptTimeout)));
}

/// `close` is idempotent and tears down the peer connection exactly once
/// from the host's point of view (no panic on repeated calls).
#[test]
fn close_is_idempotent() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport, pc, conference, SessionConfig::default());

    session.close();
    session.close();

    assert_eq!(session.state(), SessionState::Ended);
}

/// ICE connection-state transitions, delivered through
/// `on_peer_connection_event`, translate into the expected host events:
/// first connect is `PEERCONNECTION_READY`, a disconnect is
/// `CONNECTION_INTERRUPTED` followed by `SUSPEND_DETECTED` once the grace
/// period elapses, and reconnecting is `CONNECTION_RESTORED`.
#[test]
fn ice_state_transitions_translate_to_host_events() {
    let transport = Arc::new(FakeTransport::new(TransportMode::Succeed));
    let pc = Arc::new(FakePeerConnection::new());
    let conference = Arc::new(FakeConference::new());
    let session = new_session(transport, pc, conference.clone(), SessionConfig::default());

    session.on_peer_connection_event(PeerConnectionEvent::IceConnectionStateChanged(IceConnectionState::Connected));
    session.on_peer_connection_event(PeerConnectionEvent::IceConnectionStateChanged(IceConnectionState::Disconnected));
    std::thread::sleep(Duration::from_millis(1600));
    session.on_peer_connection_event(PeerConnectionEvent::IceConnectionStateChanged(IceConnectionState::Connected));

    let events = conference.events();
    assert!(events.iter().any(|e| matches!(e, HostEvent::PeerConnectionReady)));
    assert!(events.iter().any(|e| matches!(e, HostEvent::ConnectionInterrupted)));
    assert!(events.iter().any(|e| matches!(e, HostEvent::SuspendDetected)));
    assert!(events.iter().any(|e| matches!(e, HostEvent::ConnectionRestored)));
}
