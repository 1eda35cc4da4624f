//! `jingle-core`: the session core that bridges XMPP/Jingle signalling with
//! a local WebRTC peer connection.
//!
//! This crate owns the offer/answer lifecycle, the SDP ↔ Jingle text
//! translation, the single-flight modification queue, and the SSRC diff
//! engine. The local media engine, the signalling transport, and the
//! enclosing conference object are all supplied by the host through the
//! [`PeerConnection`], [`SignallingTransport`] and [`ConferenceSink`] traits.

/// The enclosing conference object's capability: the event sink and SSRC
/// ownership feed this crate reports to.
pub mod conference;
/// Session tunables (`SessionConfig`) and retry bounds.
pub mod config;
/// SSRC diff engine: the set difference between two SDP snapshots.
pub mod differ;
/// Crate-wide error types and the error adapter.
pub mod error;
/// ICE candidate and credential data model.
pub mod ice;
/// SDP ↔ Jingle element model, namespaces and codec.
pub mod jingle;
/// Logging utilities.
pub mod log;
/// The local WebRTC peer-connection capability.
pub mod peer_connection;
/// The modification queue: single-flight serialization of peer-connection
/// mutations.
pub mod queue;
/// SDP snapshot and line-level queries/mutators.
pub mod sdp;
/// The Session state machine and its ICE drip buffer.
pub mod session;
/// SSRC → conference-participant ownership table.
pub mod signalling;
/// The XMPP signalling transport capability.
pub mod transport;

pub use conference::{ConferenceSink, HostEvent};
pub use config::SessionConfig;
pub use differ::SdpDiffer;
pub use error::{JingleError, StanzaError};
pub use ice::{IceCandidate, IceCredentials, Protocol};
pub use peer_connection::{IceConnectionState, PeerConnection, PeerConnectionEvent};
pub use queue::ModificationQueue;
pub use sdp::SdpSnapshot;
pub use session::{Session, SessionState};
pub use signalling::SsrcTable;
pub use transport::SignallingTransport;
