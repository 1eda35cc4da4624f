//! Session State Machine: the orchestrator tying the
//! Modification Queue, the SDP ↔ Jingle codec, the Differ and the Signalling
//! Layer together around one `PeerConnection`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use jid::Jid;
use minidom::Element;

use crate::config::{SOURCE_READY_MAX_ATTEMPTS, SUSPEND_DETECT_THRESHOLD, SessionConfig};
use crate::conference::{ConferenceSink, HostEvent};
use crate::differ::SdpDiffer;
use crate::error::JingleError;
use crate::ice::IceCandidate;
use crate::jingle::{self, Action, Creator};
use crate::log::log_sink::LogSink;
use crate::peer_connection::{IceConnectionState, PeerConnection, PeerConnectionEvent};
use crate::queue::{DoneFn, ModificationQueue};
use crate::sdp::SdpSnapshot;
use crate::signalling::SsrcTable;
use crate::transport::SignallingTransport;
use crate::{sink_debug, sink_info, sink_warn};

use super::drip::DripBuffer;
use super::state::SessionState;

#[derive(Default)]
struct Ufrags {
    local: Option<String>,
    remote: Option<String>,
}

struct Inner {
    sid: String,
    me: Jid,
    peer_jid: Jid,
    our_role: Creator,
    config: SessionConfig,
    state: Mutex<SessionState>,
    remote: Mutex<Option<SdpSnapshot>>,
    ssrc_table: Mutex<SsrcTable>,
    ufrags: Mutex<Ufrags>,
    drip: Mutex<DripBuffer>,
    queue: ModificationQueue,
    transport: Arc<dyn SignallingTransport>,
    pc: Arc<dyn PeerConnection>,
    conference: Arc<dyn ConferenceSink>,
    logger: Arc<dyn LogSink>,
    ice_ready: AtomicBool,
    ice_interrupted: AtomicBool,
    disconnect_generation: AtomicU64,
}

/// The Jingle peer-connection session. Cheaply cloneable; every clone
/// shares the same underlying state and queue.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sid: impl Into<String>,
        me: Jid,
        peer_jid: Jid,
        our_role: Creator,
        config: SessionConfig,
        transport: Arc<dyn SignallingTransport>,
        pc: Arc<dyn PeerConnection>,
        conference: Arc<dyn ConferenceSink>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        let queue = ModificationQueue::new(Arc::clone(&logger));
        Self {
            inner: Arc::new(Inner {
                sid: sid.into(),
                me,
                peer_jid,
                our_role,
                config,
                state: Mutex::new(SessionState::Pending),
                remote: Mutex::new(None),
                ssrc_table: Mutex::new(SsrcTable::new()),
                ufrags: Mutex::new(Ufrags::default()),
                drip: Mutex::new(DripBuffer::new()),
                queue,
                transport,
                pc,
                conference,
                logger,
                ice_ready: AtomicBool::new(false),
                ice_interrupted: AtomicBool::new(false),
                disconnect_generation: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn sid(&self) -> &str {
        &self.inner.sid
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.lock_state()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // ---------------------------------------------------------------
    // Inbound handlers
    // ---------------------------------------------------------------

    /// `session-initiate`: enter `ACTIVE`, enqueue the offer/answer cycle,
    /// and send `session-accept` once it resolves.
    ///
    /// # Errors
    /// Propagates a [`JingleError`] if the offer cannot be decoded.
    pub fn accept_offer(&self, offer: &Element) -> Result<(), JingleError> {
        self.record_ssrc_owners(offer);
        let remote = jingle::from_jingle(offer, self.we_are_initiator())?;
        *self.lock_state() = SessionState::Active;
        *self.lock_remote() = Some(remote.clone());

        let this = self.clone();
        self.inner.queue.enqueue(
            Box::new(move |done| {
                this.run_offer_answer_cycle(remote, true, done);
            }),
            None,
        );
        Ok(())
    }

    /// `transport-replace`: two renegotiations back to back — first with the
    /// `content[name='data']` element stripped (forces SCTP teardown), then
    /// with the full offer (rebuilds it) — followed by `transport-accept`.
    ///
    /// # Errors
    /// Propagates a [`JingleError`] if the offer cannot be decoded.
    pub fn replace_transport(&self, offer: &Element) -> Result<(), JingleError> {
        self.inner.conference.on_event(HostEvent::IceRestarting);

        let we_are_initiator = self.we_are_initiator();
        let stripped = strip_named_content(offer, "data");
        let remote_stripped = jingle::from_jingle(&stripped, we_are_initiator)?;
        let remote_full = jingle::from_jingle(offer, we_are_initiator)?;
        *self.lock_remote() = Some(remote_full.clone());

        let this = self.clone();
        self.inner.queue.enqueue(
            Box::new(move |done| match this.run_renegotiation(remote_stripped) {
                Err(e) => {
                    this.on_jingle_fatal_error(&e.to_string());
                    done(Some(e));
                }
                Ok((old_local, new_local)) => {
                    this.maybe_propagate_ssrc_update(old_local.as_ref(), &new_local);
                    match this.run_renegotiation(remote_full) {
                        Ok((old_local2, new_local2)) => {
                            if let Err(e) = this.send_transport_accept(&new_local2) {
                                sink_warn!(this.inner.logger, "transport-accept send failed: {e}");
                            }
                            this.maybe_propagate_ssrc_update(old_local2.as_ref(), &new_local2);
                            done(None);
                        }
                        Err(e) => {
                            this.on_jingle_fatal_error(&e.to_string());
                            done(Some(e));
                        }
                    }
                }
            }),
            None,
        );
        Ok(())
    }

    /// `source-add`: retries (bounded) until the local
    /// description is ready, records SSRC owners, then enqueues the SDP
    /// patch + renegotiation.
    pub fn add_remote_stream(&self, content: &Element) {
        self.source_delta_with_retry(content.clone(), true, 0);
    }

    /// `source-remove`: symmetric to [`add_remote_stream`](Self::add_remote_stream).
    pub fn remove_remote_stream(&self, content: &Element) {
        self.source_delta_with_retry(content.clone(), false, 0);
    }

    /// `session-info`: accepted no-op keep-alive.
    pub fn handle_session_info(&self) {
        sink_debug!(self.inner.logger, "session-info received for {}", self.inner.sid);
    }

    /// Remote `session-terminate`.
    pub fn handle_session_terminate(&self) {
        self.close();
    }

    fn source_delta_with_retry(&self, content: Element, is_add: bool, attempt: u32) {
        if self.inner.pc.current_local_description().is_none() {
            if attempt >= SOURCE_READY_MAX_ATTEMPTS {
                sink_warn!(self.inner.logger, "local description never became ready after {attempt} attempts, dropping source delta");
                return;
            }
            let this = self.clone();
            let delay = self.inner.config.source_ready_retry;
            thread::spawn(move || {
                thread::sleep(delay);
                this.source_delta_with_retry(content, is_add, attempt + 1);
            });
            return;
        }

        self.record_ssrc_owners(&content);
        let this = self.clone();
        self.inner.queue.enqueue(
            Box::new(move |done| match this.apply_source_delta(&content, is_add) {
                Ok(Some(remote)) => match this.run_renegotiation(remote) {
                    Ok((old_local, new_local)) => {
                        this.maybe_propagate_ssrc_update(old_local.as_ref(), &new_local);
                        done(None);
                    }
                    Err(e) => done(Some(e)),
                },
                Ok(None) => done(None),
                Err(e) => done(Some(e)),
            }),
            None,
        );
    }

    fn apply_source_delta(&self, content: &Element, is_add: bool) -> Result<Option<SdpSnapshot>, JingleError> {
        let mut remote = self.lock_remote().clone().ok_or(JingleError::InvalidInput("no remote description to patch"))?;
        let mut changed = false;

        for c in content.children().filter(|c| c.is("content", jingle::ns::JINGLE)) {
            let Some(mid) = c.attr("name") else { continue };
            let Some(index) = remote.mid_index(mid) else {
                sink_warn!(self.inner.logger, "source delta for unknown content '{mid}'");
                continue;
            };
            let Some(desc) = c.get_child("description", jingle::ns::JINGLE_RTP) else { continue };

            for source in desc.children().filter(|c| c.is("source", jingle::ns::JINGLE_RTP_SSMA)) {
                let Some(ssrc) = source.attr("ssrc").and_then(|s| s.parse::<u32>().ok()) else { continue };
                if is_add {
                    if remote.contains_ssrc(ssrc) {
                        sink_warn!(self.inner.logger, "existing SSRC {ssrc}");
                        continue;
                    }
                    let params: Vec<(String, Option<String>)> =
                        source.children().filter(|p| p.name() == "parameter").filter_map(|p| Some((p.attr("name")?.to_owned(), p.attr("value").map(str::to_owned)))).collect();
                    let lines: Vec<String> = if params.is_empty() {
                        vec![format!("a=ssrc:{ssrc}")]
                    } else {
                        params
                            .into_iter()
                            .map(|(name, value)| match value {
                                Some(v) => format!("a=ssrc:{ssrc} {name}:{v}"),
                                None => format!("a=ssrc:{ssrc} {name}"),
                            })
                            .collect()
                    };
                    remote.append_lines(index, lines)?;
                    changed = true;
                } else {
                    let needle = format!("a=ssrc:{ssrc}");
                    remote.remove_lines(index, |line| line.starts_with(&needle))?;
                    changed = true;
                }
            }

            for group in desc.children().filter(|c| c.is("ssrc-group", jingle::ns::JINGLE_RTP_SSMA)) {
                let Some(semantics) = group.attr("semantics") else { continue };
                let ssrcs: Vec<&str> = group.children().filter(|c| c.name() == "source").filter_map(|c| c.attr("ssrc")).collect();
                if is_add {
                    remote.append_lines(index, [format!("a=ssrc-group:{semantics} {}", ssrcs.join(" "))])?;
                } else {
                    let prefix = format!("a=ssrc-group:{semantics} ");
                    remote.remove_lines(index, |line| line.starts_with(&prefix))?;
                }
                changed = true;
            }
        }

        if !changed {
            return Ok(None);
        }
        *self.lock_remote() = Some(remote.clone());
        Ok(Some(remote))
    }

    // ---------------------------------------------------------------
    // Outbound operations
    // ---------------------------------------------------------------

    fn run_offer_answer_cycle(&self, remote: SdpSnapshot, then_send_accept: bool, done: DoneFn) {
        match self.run_renegotiation(remote) {
            Ok((old_local, new_local)) => {
                if then_send_accept {
                    if let Err(e) = self.send_session_accept() {
                        sink_warn!(self.inner.logger, "session-accept send failed: {e}");
                    }
                }
                self.maybe_propagate_ssrc_update(old_local.as_ref(), &new_local);
                done(None);
            }
            Err(e) => {
                self.on_jingle_fatal_error(&e.to_string());
                done(Some(e));
            }
        }
    }

    /// Snapshot the current local description, render it under
    /// `session-accept`, and transmit; a timeout here is escalated to
    /// [`HostEvent::SessionAcceptTimeout`].
    ///
    /// # Errors
    /// Propagates a [`JingleError`] if there is no local description yet.
    pub fn send_session_accept(&self) -> Result<(), JingleError> {
        let local = self.inner.pc.current_local_description().ok_or(JingleError::InvalidInput("no local description"))?;
        let el = jingle::to_jingle(Action::SessionAccept, &self.inner.sid, self.inner.our_role, &local, &self.inner.config)?;
        self.send_iq(el, true);
        Ok(())
    }

    fn send_transport_accept(&self, local: &SdpSnapshot) -> Result<(), JingleError> {
        let el = self.build_transport_only_jingle(Action::TransportAccept, local)?;
        self.send_iq(el, false);
        Ok(())
    }

    /// Empty action stanza sent when the local side refuses a
    /// `transport-replace`.
    pub fn send_transport_reject(&self) {
        let el = Element::builder("jingle", jingle::ns::JINGLE).attr("action", Action::TransportReject.as_str()).attr("sid", self.inner.sid.as_str()).build();
        self.send_iq(el, false);
    }

    /// Set state to `ENDED` and send `session-terminate`; best-effort —
    /// failures do not resurrect the session.
    pub fn terminate(&self, reason: &str, text: Option<&str>) {
        {
            let mut state = self.lock_state();
            if state.is_ended() {
                return;
            }
            *state = SessionState::Ended;
        }

        let mut reason_builder = Element::builder("reason", jingle::ns::JINGLE).append(Element::builder(reason.to_owned(), jingle::ns::JINGLE).build());
        if let Some(text) = text {
            reason_builder = reason_builder.append(Element::builder("text", jingle::ns::JINGLE).append(text.to_owned()).build());
        }
        let el = Element::builder("jingle", jingle::ns::JINGLE)
            .attr("action", Action::SessionTerminate.as_str())
            .attr("sid", self.inner.sid.as_str())
            .append(reason_builder.build())
            .build();
        self.send_iq(el, false);
        self.close();
    }

    fn build_transport_only_jingle(&self, action: Action, local: &SdpSnapshot) -> Result<Element, JingleError> {
        let mut builder = Element::builder("jingle", jingle::ns::JINGLE).attr("action", action.as_str()).attr("sid", self.inner.sid.as_str());
        for index in 0..local.media.len() {
            let one = jingle::transport_to_jingle(action, &self.inner.sid, self.inner.our_role, local, index, &self.inner.config)?;
            if let Some(content) = one.get_child("content", jingle::ns::JINGLE) {
                builder = builder.append(content.clone());
            }
        }
        Ok(builder.build())
    }

    // ---------------------------------------------------------------
    // Renegotiation protocol
    // ---------------------------------------------------------------

    fn run_renegotiation(&self, remote: SdpSnapshot) -> Result<(Option<SdpSnapshot>, SdpSnapshot), JingleError> {
        if self.inner.pc.is_closed() {
            return Err(JingleError::PeerConnection("peer connection already closed".into()));
        }

        let remote_ufrag = remote.find_line(0, "a=ice-ufrag:").map(|l| l.trim_start_matches("a=ice-ufrag:").to_owned());
        self.update_remote_ufrag(remote_ufrag);

        self.inner.pc.set_remote_description(&remote, true).map_err(JingleError::PeerConnection)?;

        if self.inner.pc.is_closed() {
            return Err(JingleError::PeerConnection("peer connection closed mid-renegotiation".into()));
        }

        let old_local = self.inner.pc.current_local_description();
        let answer = self.inner.pc.create_answer().map_err(JingleError::PeerConnection)?;

        let local_ufrag = answer.find_line(0, "a=ice-ufrag:").map(|l| l.trim_start_matches("a=ice-ufrag:").to_owned());
        self.update_local_ufrag(local_ufrag);

        self.inner.pc.set_local_description(&answer).map_err(JingleError::PeerConnection)?;

        Ok((old_local, answer))
    }

    fn update_remote_ufrag(&self, new_ufrag: Option<String>) {
        let mut ufrags = self.inner.ufrags.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let (Some(old), Some(new)) = (&ufrags.remote, &new_ufrag) {
            if old != new {
                self.inner.conference.on_event(HostEvent::RemoteUfragChanged(new.clone()));
            }
        }
        if new_ufrag.is_some() {
            ufrags.remote = new_ufrag;
        }
    }

    fn update_local_ufrag(&self, new_ufrag: Option<String>) {
        let mut ufrags = self.inner.ufrags.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let (Some(old), Some(new)) = (&ufrags.local, &new_ufrag) {
            if old != new {
                self.inner.conference.on_event(HostEvent::LocalUfragChanged(new.clone()));
            }
        }
        if new_ufrag.is_some() {
            ufrags.local = new_ufrag;
        }
    }

    // ---------------------------------------------------------------
    // SSRC update propagation
    // ---------------------------------------------------------------

    fn maybe_propagate_ssrc_update(&self, old_local: Option<&SdpSnapshot>, new_local: &SdpSnapshot) {
        if !self.state().is_active() {
            return;
        }
        let Some(old) = old_local else { return };

        let remove_diff = SdpDiffer::new(new_local, old);
        if let Some(el) = remove_diff.to_jingle(Action::SourceRemove, &self.inner.sid, self.inner.our_role) {
            self.send_iq(el, false);
        }
        let add_diff = SdpDiffer::new(old, new_local);
        if let Some(el) = add_diff.to_jingle(Action::SourceAdd, &self.inner.sid, self.inner.our_role) {
            self.send_iq(el, false);
        }

        self.inner.conference.on_ssrc_update(&add_diff.changed_ssrcs(), &remove_diff.changed_ssrcs());
    }

    // ---------------------------------------------------------------
    // ICE candidate dispatch
    // ---------------------------------------------------------------

    /// Feed one local candidate from the peer connection. Filtered by the
    /// `{webrtc_ice_udp_disable, webrtc_ice_tcp_disable}` policy; surviving
    /// candidates are sent immediately, or accumulated in the drip buffer
    /// and flushed after `drip_flush` of quiescence when `use_drip` is set.
    pub fn on_local_candidate(&self, candidate: IceCandidate) {
        if candidate.is_disabled_by(self.inner.config.webrtc_ice_udp_disable, self.inner.config.webrtc_ice_tcp_disable) {
            return;
        }

        if !self.inner.config.use_drip {
            self.send_candidate_batch(vec![candidate]);
            return;
        }

        let generation = {
            let mut drip = self.inner.drip.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            drip.push(candidate)
        };
        let this = self.clone();
        let flush_after = self.inner.config.drip_flush;
        thread::spawn(move || {
            thread::sleep(flush_after);
            let batch = {
                let mut drip = this.inner.drip.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                drip.take_if_current(generation)
            };
            if let Some(batch) = batch {
                this.send_candidate_batch(batch);
            }
        });
    }

    /// Record (but do not act on) the peer connection's "no more
    /// candidates" marker — end-of-candidates is implicit.
    pub fn on_end_of_candidates(&self) {
        sink_debug!(self.inner.logger, "end-of-candidates observed for {}", self.inner.sid);
    }

    /// Single entry point for everything the peer connection pushes
    /// asynchronously, outside the Modification Queue.
    pub fn on_peer_connection_event(&self, event: PeerConnectionEvent) {
        match event {
            PeerConnectionEvent::LocalCandidate(candidate) => self.on_local_candidate(candidate),
            PeerConnectionEvent::EndOfCandidates => self.on_end_of_candidates(),
            PeerConnectionEvent::IceConnectionStateChanged(state) => self.on_ice_connection_state_changed(state),
        }
    }

    /// Translate a raw ICE connection-state transition into the
    /// host-observable events: always reports the raw transition, then
    /// layers on `PEERCONNECTION_READY` (first connect),
    /// `CONNECTION_RESTORED` (reconnect after an interruption),
    /// `CONNECTION_INTERRUPTED` (disconnect), `SUSPEND_DETECTED` (a
    /// disconnect that outlives the grace period, suggesting the process
    /// itself was suspended rather than the network dropping), and
    /// `CONNECTION_ICE_FAILED`.
    pub fn on_ice_connection_state_changed(&self, state: IceConnectionState) {
        self.inner.conference.on_event(HostEvent::IceConnectionStateChanged(state));

        match state {
            IceConnectionState::Connected | IceConnectionState::Completed => {
                self.inner.disconnect_generation.fetch_add(1, Ordering::SeqCst);
                if self.inner.ice_interrupted.swap(false, Ordering::SeqCst) {
                    self.inner.conference.on_event(HostEvent::ConnectionRestored);
                } else if !self.inner.ice_ready.swap(true, Ordering::SeqCst) {
                    self.inner.conference.on_event(HostEvent::PeerConnectionReady);
                }
            }
            IceConnectionState::Disconnected => {
                let generation = self.inner.disconnect_generation.fetch_add(1, Ordering::SeqCst) + 1;
                self.inner.ice_interrupted.store(true, Ordering::SeqCst);
                self.inner.conference.on_event(HostEvent::ConnectionInterrupted);

                let this = self.clone();
                thread::spawn(move || {
                    thread::sleep(SUSPEND_DETECT_THRESHOLD);
                    let still_current = this.inner.disconnect_generation.load(Ordering::SeqCst) == generation;
                    if still_current && this.inner.ice_interrupted.load(Ordering::SeqCst) {
                        this.inner.conference.on_event(HostEvent::SuspendDetected);
                    }
                });
            }
            IceConnectionState::Failed => {
                self.inner.ice_interrupted.store(false, Ordering::SeqCst);
                self.inner.conference.on_event(HostEvent::ConnectionIceFailed);
            }
            IceConnectionState::New | IceConnectionState::Checking | IceConnectionState::Closed => {}
        }
    }

    fn send_candidate_batch(&self, candidates: Vec<IceCandidate>) {
        let Some(local) = self.inner.pc.current_local_description() else {
            return;
        };
        let by_mline = group_candidates_by_mline(candidates);
        let mut builder = Element::builder("jingle", jingle::ns::JINGLE).attr("action", Action::TransportInfo.as_str()).attr("sid", self.inner.sid.as_str());

        for (mline, cands) in by_mline {
            let index = mline as usize;
            if index >= local.media.len() {
                continue;
            }
            let Ok(one) = jingle::transport_to_jingle_for_candidates(Action::TransportInfo, &self.inner.sid, self.inner.our_role, &local, index, &self.inner.config, &cands) else {
                continue;
            };
            if let Some(content) = one.get_child("content", jingle::ns::JINGLE) {
                builder = builder.append(content.clone());
            }
        }
        self.send_iq(builder.build(), false);
    }

    // ---------------------------------------------------------------
    // Close
    // ---------------------------------------------------------------

    /// Mark the session closed, detach the signalling layer, and close the
    /// peer connection if it is not already closed. Idempotent.
    pub fn close(&self) {
        *self.lock_state() = SessionState::Ended;
        self.inner.ssrc_table.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
        if !self.inner.pc.is_closed() {
            self.inner.pc.close();
        }
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    fn we_are_initiator(&self) -> bool {
        self.inner.our_role == Creator::Initiator
    }

    fn lock_remote(&self) -> std::sync::MutexGuard<'_, Option<SdpSnapshot>> {
        self.inner.remote.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record_ssrc_owners(&self, jingle_el: &Element) {
        for content in jingle_el.children().filter(|c| c.is("content", jingle::ns::JINGLE)) {
            let Some(desc) = content.get_child("description", jingle::ns::JINGLE_RTP) else { continue };
            for source in desc.children().filter(|c| c.is("source", jingle::ns::JINGLE_RTP_SSMA)) {
                let Some(ssrc) = source.attr("ssrc").and_then(|s| s.parse::<u32>().ok()) else { continue };
                if let Some(info) = source.get_child("ssrc-info", jingle::ns::JITSI_MEET) {
                    if let Some(owner) = info.attr("owner") {
                        self.inner.ssrc_table.lock().unwrap_or_else(std::sync::PoisonError::into_inner).set_ssrc_owner(ssrc, owner.to_owned());
                    }
                }
            }
        }
    }

    /// `onJingleFatalError`: fatal renegotiation failure escalation.
    fn on_jingle_fatal_error(&self, message: &str) {
        sink_info!(self.inner.logger, "jingle fatal error for {}: {message}", self.inner.sid);
        self.inner.conference.on_event(HostEvent::ConferenceSetupFailed(message.to_owned()));
        self.inner.conference.on_event(HostEvent::JingleFatalError(message.to_owned()));
    }

    fn send_iq(&self, payload: Element, is_session_accept: bool) {
        let id = self.inner.transport.next_stanza_id();
        let iq = Element::builder("iq", "jabber:client")
            .attr("type", "set")
            .attr("to", self.inner.peer_jid.to_string())
            .attr("from", self.inner.me.to_string())
            .attr("id", id)
            .append(payload)
            .build();

        let this = self.clone();
        let timeout = self.inner.config.iq_timeout;
        self.inner.transport.send(
            iq,
            timeout,
            Box::new(move |result| {
                if let Err(e) = result {
                    if is_session_accept && e.is_timeout() {
                        this.inner.conference.on_event(HostEvent::SessionAcceptTimeout);
                    }
                    sink_warn!(this.inner.logger, "iq failed: {e}");
                }
            }),
        );
    }
}

fn strip_named_content(jingle_el: &Element, name: &str) -> Element {
    let mut builder = Element::builder("jingle", jingle::ns::JINGLE);
    if let Some(action) = jingle_el.attr("action") {
        builder = builder.attr("action", action);
    }
    if let Some(sid) = jingle_el.attr("sid") {
        builder = builder.attr("sid", sid);
    }
    for child in jingle_el.children() {
        if child.is("content", jingle::ns::JINGLE) && child.attr("name") == Some(name) {
            continue;
        }
        builder = builder.append(child.clone());
    }
    builder.build()
}

fn group_candidates_by_mline(candidates: Vec<IceCandidate>) -> Vec<(u32, Vec<IceCandidate>)> {
    let mut grouped: Vec<(u32, Vec<IceCandidate>)> = Vec::new();
    for cand in candidates {
        match grouped.iter_mut().find(|(mline, _)| *mline == cand.sdp_mline_index) {
            Some((_, list)) => list.push(cand),
            None => grouped.push((cand.sdp_mline_index, vec![cand])),
        }
    }
    grouped
}
