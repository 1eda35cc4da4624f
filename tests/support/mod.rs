//! Shared test doubles for the three host-supplied ports
//! (`PeerConnection`, `SignallingTransport`, `ConferenceSink`), plus small
//! Jingle-element builders for constructing inbound stanzas without a full
//! XML parser.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use jid::Jid;
use minidom::Element;

use jingle_core::jingle::ns;
use jingle_core::peer_connection::PcResult;
use jingle_core::{ConferenceSink, HostEvent, IceCandidate, PeerConnection, SdpSnapshot, SignallingTransport, StanzaError};

pub fn jid(s: &str) -> Jid {
    s.parse().expect("valid jid literal in test fixture")
}

/// Fakes `createAnswer` by mirroring whatever was last set as the remote
/// description, optionally bumping the ufrag so ufrag-change tests have
/// something to observe.
pub struct FakePeerConnection {
    local: Mutex<Option<SdpSnapshot>>,
    remote: Mutex<Option<SdpSnapshot>>,
    closed: AtomicBool,
}

impl FakePeerConnection {
    pub fn new() -> Self {
        Self { local: Mutex::new(None), remote: Mutex::new(None), closed: AtomicBool::new(false) }
    }

    fn lock_local(&self) -> std::sync::MutexGuard<'_, Option<SdpSnapshot>> {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_remote(&self) -> std::sync::MutexGuard<'_, Option<SdpSnapshot>> {
        self.remote.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PeerConnection for FakePeerConnection {
    fn set_remote_description(&self, sdp: &SdpSnapshot, _is_offer: bool) -> PcResult<()> {
        *self.lock_remote() = Some(sdp.clone());
        Ok(())
    }

    fn create_answer(&self) -> PcResult<SdpSnapshot> {
        self.lock_remote().clone().ok_or_else(|| "no remote description set".to_owned())
    }

    fn set_local_description(&self, sdp: &SdpSnapshot) -> PcResult<()> {
        *self.lock_local() = Some(sdp.clone());
        Ok(())
    }

    fn current_local_description(&self) -> Option<SdpSnapshot> {
        self.lock_local().clone()
    }

    fn add_stream(&self, _stream_id: &str) -> PcResult<()> {
        Ok(())
    }

    fn remove_stream(&self, _stream_id: &str) -> PcResult<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Whether a captured IQ should resolve successfully or as a timeout.
#[derive(Clone, Copy)]
pub enum TransportMode {
    Succeed,
    NeverRespond,
}

pub struct FakeTransport {
    sent: Mutex<Vec<Element>>,
    next_id: AtomicU32,
    mode: TransportMode,
}

impl FakeTransport {
    pub fn new(mode: TransportMode) -> Self {
        Self { sent: Mutex::new(Vec::new()), next_id: AtomicU32::new(0), mode }
    }

    pub fn sent_stanzas(&self) -> Vec<Element> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SignallingTransport for FakeTransport {
    fn next_stanza_id(&self) -> String {
        format!("iq{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn send(&self, iq: Element, _timeout: Duration, on_result: Box<dyn FnOnce(Result<Element, StanzaError>) + Send>) {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(iq.clone());
        match self.mode {
            TransportMode::Succeed => on_result(Ok(iq)),
            TransportMode::NeverRespond => on_result(Err(StanzaError::timeout(None))),
        }
    }
}

#[derive(Default)]
pub struct FakeConference {
    events: Mutex<Vec<HostEvent>>,
    ssrc_updates: Mutex<Vec<(Vec<u32>, Vec<u32>)>>,
}

impl FakeConference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn ssrc_updates(&self) -> Vec<(Vec<u32>, Vec<u32>)> {
        self.ssrc_updates.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ConferenceSink for FakeConference {
    fn on_event(&self, event: HostEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    fn on_ssrc_update(&self, added_ssrcs: &[u32], removed_ssrcs: &[u32]) {
        self.ssrc_updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((added_ssrcs.to_vec(), removed_ssrcs.to_vec()));
    }
}

/// One `<source ssrc="...">` under an RTP description, with an optional
/// owner attribution (`ssrc-info`).
pub struct SourceSpec {
    pub ssrc: u32,
    pub cname: &'static str,
    pub owner: Option<&'static str>,
}

#[allow(clippy::too_many_arguments)]
pub fn content_element(
    name: &str,
    media: &str,
    payload_id: u8,
    payload_name: &str,
    clockrate: u32,
    ufrag: &str,
    pwd: &str,
    sources: &[SourceSpec],
    ssrc_group: Option<(&str, &[u32])>,
) -> Element {
    let mut desc = Element::builder("description", ns::JINGLE_RTP)
        .attr("media", media)
        .append(
            Element::builder("payload-type", ns::JINGLE_RTP)
                .attr("id", payload_id.to_string())
                .attr("name", payload_name)
                .attr("clockrate", clockrate.to_string())
                .build(),
        );

    for source in sources {
        let mut source_el = Element::builder("source", ns::JINGLE_RTP_SSMA)
            .attr("ssrc", source.ssrc.to_string())
            .append(
                Element::builder("parameter", ns::JINGLE_RTP_SSMA)
                    .attr("name", "cname")
                    .attr("value", source.cname)
                    .build(),
            );
        if let Some(owner) = source.owner {
            source_el = source_el.append(Element::builder("ssrc-info", ns::JITSI_MEET).attr("owner", owner).build());
        }
        desc = desc.append(source_el.build());
    }

    if let Some((semantics, ssrcs)) = ssrc_group {
        let mut group = Element::builder("ssrc-group", ns::JINGLE_RTP_SSMA).attr("semantics", semantics);
        for ssrc in ssrcs {
            group = group.append(Element::builder("source", ns::JINGLE_RTP_SSMA).attr("ssrc", ssrc.to_string()).build());
        }
        desc = desc.append(group.build());
    }

    let transport = Element::builder("transport", ns::JINGLE_ICE_UDP)
        .attr("ufrag", ufrag)
        .attr("pwd", pwd)
        .append(
            Element::builder("candidate", ns::JINGLE_ICE_UDP)
                .attr("foundation", "1")
                .attr("component", "1")
                .attr("protocol", "udp")
                .attr("priority", "2130706431")
                .attr("ip", "10.0.0.1")
                .attr("port", "9")
                .attr("type", "host")
                .attr("generation", "0")
                .attr("id", "1")
                .build(),
        );

    Element::builder("content", ns::JINGLE)
        .attr("creator", "initiator")
        .attr("name", name)
        .append(desc.build())
        .append(transport.build())
        .build()
}

pub fn session_initiate(contents: Vec<Element>) -> Element {
    let mut builder = Element::builder("jingle", ns::JINGLE).attr("action", "session-initiate").attr("sid", "sid1");
    for content in contents {
        builder = builder.append(content);
    }
    builder.build()
}

pub fn source_add(content: Element) -> Element {
    Element::builder("jingle", ns::JINGLE).attr("action", "source-add").attr("sid", "sid1").append(content).build()
}

pub fn local_candidate(mline: u32, component: &str) -> IceCandidate {
    IceCandidate::new(
        format!("candidate:1 1 udp 2130706431 10.0.0.{} 9 typ host generation 0", mline + 1),
        component.to_owned(),
        mline,
    )
    .expect("well-formed UDP candidate fixture")
}
