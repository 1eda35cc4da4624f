use std::time::Duration;

/// Tunables for a [`crate::session::Session`].
///
/// Mirrors the configuration block a Jingle session is constructed with:
/// feature toggles for ICE candidate filtering, diagnostic candidate
/// rewriting, transport-info batching, and the handful of timeouts the
/// renegotiation and source-ready retry loops depend on.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Drop all `tcp`/`ssltcp` candidates before they reach the wire.
    pub webrtc_ice_tcp_disable: bool,
    /// Drop all `udp` candidates before they reach the wire.
    pub webrtc_ice_udp_disable: bool,
    /// Rewrite every emitted candidate's address to `1.1.1.1` (diagnostic
    /// ICE-failure injection).
    pub fail_ice: bool,
    /// Batch local candidates into a drip buffer instead of sending each
    /// immediately.
    pub use_drip: bool,
    /// Strip simulcast-related SDP/Jingle bits (left to the peer-connection
    /// capability; this core only threads the flag through).
    pub disable_simulcast: bool,
    /// Strip RTX (`rtx`/`apt`) payload types and `FID` groups.
    pub disable_rtx: bool,
    /// Prefer H264 payload types when more than one video codec is offered.
    pub prefer_h264: bool,
    /// Timeout for any outbound IQ (session-accept, transport-info, ...).
    pub iq_timeout: Duration,
    /// Quiescence window for the ICE candidate drip buffer.
    pub drip_flush: Duration,
    /// Retry interval for `addRemoteStream`/`removeRemoteStream` while the
    /// local description isn't ready yet.
    pub source_ready_retry: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webrtc_ice_tcp_disable: false,
            webrtc_ice_udp_disable: false,
            fail_ice: false,
            use_drip: false,
            disable_simulcast: false,
            disable_rtx: false,
            prefer_h264: false,
            iq_timeout: Duration::from_millis(10_000),
            drip_flush: Duration::from_millis(20),
            source_ready_retry: Duration::from_millis(200),
        }
    }
}

/// Bound on the dirty-wait retry in `addRemoteStream`/`removeRemoteStream`
/// when the local description isn't ready yet.
pub const SOURCE_READY_MAX_ATTEMPTS: u32 = 10;

/// How long an ICE `disconnected` state must persist before it is reported
/// as a suspected OS-level suspend (e.g. a backgrounded mobile app) rather
/// than a transient network blip.
pub const SUSPEND_DETECT_THRESHOLD: std::time::Duration = std::time::Duration::from_millis(1_500);
