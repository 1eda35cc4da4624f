//! The enclosing conference object's capability.
//!
//! Participant bookkeeping, DTMF, recording, moderation, roster, presence
//! and statistics dispatch all live on the host side; this crate only needs
//! an event sink and a source of SSRC-owner updates.

/// Host-observable events emitted by the state machine.
#[derive(Debug, Clone)]
pub enum HostEvent {
    IceConnectionStateChanged(crate::peer_connection::IceConnectionState),
    ConnectionRestored,
    ConnectionInterrupted,
    ConnectionIceFailed,
    SuspendDetected,
    PeerConnectionReady,
    IceRestarting,
    SessionAcceptTimeout,
    RemoteUfragChanged(String),
    LocalUfragChanged(String),
    ConferenceSetupFailed(String),
    JingleFatalError(String),
}

/// The conference capability this crate reports to and reads SSRC ownership
/// updates from.
pub trait ConferenceSink: Send + Sync {
    /// Deliver a host-observable event.
    fn on_event(&self, event: HostEvent);

    /// Called after every local renegotiation while `ACTIVE`, once the SSRC
    /// diff has been computed and (if non-empty) sent — lets the conference
    /// update its own participant/track bookkeeping.
    fn on_ssrc_update(&self, added_ssrcs: &[u32], removed_ssrcs: &[u32]);
}
