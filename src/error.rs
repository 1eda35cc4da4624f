//! Crate-wide error types, including the Error Adapter.

use std::fmt;

use crate::jingle::codec::CodecError;
use crate::sdp::sdp_error::SdpError;

/// A `<error/>` child returned by the remote party for a failed IQ, or
/// `None` if the failure was a local timeout.
#[derive(Debug, Clone)]
pub struct StanzaError {
    /// `<error code="...">`, when present.
    pub code: Option<String>,
    /// Tag name of the first child of `<error>` (e.g. `"item-not-found"`),
    /// or `"timeout"` if this error was synthesized from an expiry.
    pub reason: String,
    /// The serialized request stanza that produced this error, if known.
    pub source: Option<String>,
}

impl StanzaError {
    /// Build the error record for a timed-out IQ.
    #[must_use]
    pub fn timeout(source: Option<String>) -> Self {
        Self {
            code: None,
            reason: "timeout".to_owned(),
            source,
        }
    }

    /// Build the error record from a parsed `<error>` element's first child
    /// tag name and optional `code` attribute.
    #[must_use]
    pub fn from_stanza(code: Option<String>, first_child_tag: String, source: Option<String>) -> Self {
        Self {
            code,
            reason: first_child_tag,
            source,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.reason == "timeout"
    }
}

impl fmt::Display for StanzaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code {code})", self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl std::error::Error for StanzaError {}

/// Aggregate error type for session-core operations.
#[derive(Debug)]
pub enum JingleError {
    Sdp(SdpError),
    Codec(CodecError),
    Stanza(StanzaError),
    /// The peer connection rejected a renegotiation step (`setRemote`,
    /// `createAnswer`, `setLocal`) or stream add/remove.
    PeerConnection(String),
    /// The session has already moved into `ENDED`.
    SessionClosed,
    /// A structural precondition (missing ICE credentials, a `None`
    /// stream, ...) was violated.
    InvalidInput(&'static str),
}

impl fmt::Display for JingleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdp(e) => write!(f, "sdp error: {e:?}"),
            Self::Codec(e) => write!(f, "jingle codec error: {e}"),
            Self::Stanza(e) => write!(f, "stanza error: {e}"),
            Self::PeerConnection(msg) => write!(f, "peer connection error: {msg}"),
            Self::SessionClosed => write!(f, "session is closed"),
            Self::InvalidInput(what) => write!(f, "invalid input: {what}"),
        }
    }
}

impl std::error::Error for JingleError {}

impl From<SdpError> for JingleError {
    fn from(e: SdpError) -> Self {
        Self::Sdp(e)
    }
}

impl From<CodecError> for JingleError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<StanzaError> for JingleError {
    fn from(e: StanzaError) -> Self {
        Self::Stanza(e)
    }
}
