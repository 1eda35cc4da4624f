//! The XMPP signalling transport capability.
//!
//! Modelled as a `send(iq, onResult, onError, timeoutMs)` call plus stanza
//! id allocation. Serialization, BOSH/websocket framing, and stanza routing
//! all live on the host side of this trait.

use std::time::Duration;

use minidom::Element;

use crate::error::StanzaError;

/// Outcome of a round-tripped IQ: the result stanza's `<jingle>`/payload
/// children, or a [`StanzaError`] (remote `<error/>` or a synthesized
/// timeout).
pub type IqResult = Result<Element, StanzaError>;

/// The signalling capability this crate sends Jingle IQs over.
pub trait SignallingTransport: Send + Sync {
    /// Allocate a fresh, transport-unique stanza id for an outbound IQ.
    fn next_stanza_id(&self) -> String;

    /// Send `iq` (a complete `<iq type="set">` stanza with a `<jingle>`
    /// child) and invoke `on_result` with the outcome once the result (or
    /// error, or `timeout`) arrives.
    fn send(&self, iq: Element, timeout: Duration, on_result: Box<dyn FnOnce(IqResult) + Send>);
}
