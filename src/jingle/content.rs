//! Intermediate Jingle element model: the shape the codec
//! converts to/from SDP text and to/from `minidom::Element` trees. Kept
//! deliberately flat — one struct per XEP-0166/0167/0176/0320/0339 element
//! this core actually touches.

use crate::ice::IceCredentials;

/// One `<content>` element: a media section plus its transport.
#[derive(Debug, Clone)]
pub struct JingleContent {
    pub name: String,
    pub senders: Option<crate::jingle::senders::Senders>,
    pub description: Option<RtpDescription>,
    pub transport: Option<IceUdpTransport>,
}

/// `<description xmlns="urn:xmpp:jingle:apps:rtp:1" media="...">`.
#[derive(Debug, Clone, Default)]
pub struct RtpDescription {
    pub media: String,
    pub payload_types: Vec<PayloadType>,
    pub sources: Vec<Source>,
    pub ssrc_groups: Vec<SsrcGroup>,
    pub rtcp_mux: bool,
}

/// `<payload-type>` plus its `<parameter>` (`fmtp`) and `<rtcp-fb>` children.
#[derive(Debug, Clone)]
pub struct PayloadType {
    pub id: u8,
    pub name: Option<String>,
    pub clockrate: Option<u32>,
    pub channels: Option<u8>,
    pub parameters: Vec<(String, String)>,
    pub feedback: Vec<String>,
}

/// `<source xmlns="urn:xmpp:jingle:apps:rtp:ssma:0" ssrc="...">` plus its
/// `<parameter name="..." [value="..."]/>` children.
#[derive(Debug, Clone)]
pub struct Source {
    pub ssrc: u32,
    pub parameters: Vec<(String, Option<String>)>,
}

/// `<ssrc-group xmlns="urn:xmpp:jingle:apps:rtp:ssma:0" semantics="...">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrcGroup {
    pub semantics: String,
    pub ssrcs: Vec<u32>,
}

/// `<transport xmlns="urn:xmpp:jingle:transports:ice-udp:1">`.
#[derive(Debug, Clone, Default)]
pub struct IceUdpTransport {
    pub credentials: IceCredentials,
    pub fingerprint: Option<Fingerprint>,
    pub candidates: Vec<crate::ice::IceCandidate>,
}

/// `<fingerprint xmlns="urn:xmpp:jingle:apps:dtls:0" hash="..." setup="...">`.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub hash: String,
    pub value: String,
    pub setup: Option<String>,
    pub required: bool,
}
