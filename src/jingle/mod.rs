//! SDP ↔ Jingle Codec: namespaces, the intermediate element
//! model, and the `from_jingle`/`to_jingle`/`transport_to_jingle` conversions.

pub mod action;
pub mod codec;
pub mod content;
pub mod creator;
pub mod ns;
pub mod senders;

pub use action::Action;
pub use codec::{CodecError, from_jingle, to_jingle, transport_to_jingle, transport_to_jingle_for_candidates};
pub use content::{Fingerprint, IceUdpTransport, JingleContent, PayloadType, RtpDescription, Source, SsrcGroup};
pub use creator::Creator;
pub use senders::Senders;
