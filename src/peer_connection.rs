//! The local WebRTC peer-connection capability (out of scope for this crate
//! — only its interface is named here). A host application supplies the
//! concrete implementation (simulcast munging, RTX toggles, codec
//! preference, data channels all live on the other side of this trait).

use crate::ice::IceCandidate;
use crate::sdp::SdpSnapshot;

/// Outcome of the three renegotiation suspension points.
pub type PcResult<T> = Result<T, String>;

/// Current ICE/signalling state the host's peer connection may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Failed,
    Disconnected,
    Closed,
}

/// Events the peer connection pushes to the session asynchronously, outside
/// the Modification Queue (candidate emission does not go through the
/// queue).
#[derive(Debug, Clone)]
pub enum PeerConnectionEvent {
    LocalCandidate(IceCandidate),
    /// The peer connection's "no more candidates" marker. Recorded but not
    /// transmitted — end-of-candidates is implicit.
    EndOfCandidates,
    IceConnectionStateChanged(IceConnectionState),
}

/// The capability this crate drives for the offer/answer lifecycle.
///
/// Every method here **must** be called only from inside a
/// [`crate::queue::ModificationQueue`] task.
pub trait PeerConnection: Send + Sync {
    /// Apply a remote description; `is_offer` distinguishes offer vs answer
    /// for peer connections whose SDK distinguishes the two (most do).
    fn set_remote_description(&self, sdp: &SdpSnapshot, is_offer: bool) -> PcResult<()>;

    /// Produce a local answer under the session's media constraints.
    fn create_answer(&self) -> PcResult<SdpSnapshot>;

    /// Apply a local description (the result of `create_answer`, or an
    /// offer when this side is the initiator of a renegotiation).
    fn set_local_description(&self, sdp: &SdpSnapshot) -> PcResult<()>;

    /// The peer connection's current local description, if any has been set.
    fn current_local_description(&self) -> Option<SdpSnapshot>;

    /// Request the peer connection add the named remote stream's tracks
    /// (used by the host to wire a participant's audio/video in once
    /// `source-add` has landed the SDP-level change).
    fn add_stream(&self, stream_id: &str) -> PcResult<()>;

    /// Inverse of [`add_stream`](Self::add_stream).
    fn remove_stream(&self, stream_id: &str) -> PcResult<()>;

    /// `true` if the underlying connection/signalling state is already
    /// closed — consulted by the renegotiation protocol, and by `close` to
    /// stay idempotent.
    fn is_closed(&self) -> bool;

    /// Best-effort teardown; safe to call more than once.
    fn close(&self);
}
