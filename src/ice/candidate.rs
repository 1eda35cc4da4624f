//! ICE candidate data model and the filtering/rewriting the SDP model's
//! `removeTcpCandidates`/`removeUdpCandidates`/`failICE` flags drive during
//! Jingle emission.

use std::fmt;

/// Transport protocol a candidate was gathered on, per XEP-0176 `protocol`
/// attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Udp,
    Tcp,
    SslTcp,
}

impl Protocol {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
            Self::SslTcp => "ssltcp",
        }
    }

    #[must_use]
    pub fn is_tcp_like(&self) -> bool {
        matches!(self, Self::Tcp | Self::SslTcp)
    }

    /// Derive the XEP-0176 `protocol` attribute from an `a=candidate:` SDP
    /// attribute line (with or without the leading `a=`): the third
    /// whitespace-separated token is the transport (`udp`/`tcp`); `tcp`
    /// candidates additionally carry a `tcptype ssltcp` token when the
    /// underlying socket is SSL-wrapped TCP.
    #[must_use]
    pub fn from_candidate_line(line: &str) -> Option<Self> {
        let body = line.trim_start_matches("a=").trim_start_matches("candidate:");
        let mut tokens = body.split_whitespace();
        let transport = tokens.nth(2)?.to_ascii_lowercase();
        match transport.as_str() {
            "udp" => Some(Self::Udp),
            "tcp" => {
                let rest: Vec<&str> = tokens.collect();
                let is_ssl = rest.windows(2).any(|w| w[0].eq_ignore_ascii_case("tcptype") && w[1].eq_ignore_ascii_case("ssltcp"));
                Some(if is_ssl { Self::SslTcp } else { Self::Tcp })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ICE candidate as surfaced by the peer connection.
#[derive(Debug, Clone)]
pub struct IceCandidate {
    /// The raw `candidate:...` attribute value, without the leading `a=`.
    pub candidate: String,
    pub sdp_mid: String,
    pub sdp_mline_index: u32,
    pub protocol: Protocol,
}

impl IceCandidate {
    /// Build a candidate from its raw attribute value, deriving `protocol`
    /// from the line itself.
    #[must_use]
    pub fn new(candidate: String, sdp_mid: String, sdp_mline_index: u32) -> Option<Self> {
        let protocol = Protocol::from_candidate_line(&candidate)?;
        Some(Self { candidate, sdp_mid, sdp_mline_index, protocol })
    }

    /// `true` if `cfg` disables this candidate's protocol family.
    #[must_use]
    pub fn is_disabled_by(&self, udp_disabled: bool, tcp_disabled: bool) -> bool {
        match self.protocol {
            Protocol::Udp => udp_disabled,
            Protocol::Tcp | Protocol::SslTcp => tcp_disabled,
        }
    }

    /// The candidate's connection-address token (5th field), rewritten to
    /// `1.1.1.1` when `fail_ice` diagnostics are enabled; otherwise returned
    /// unchanged.
    #[must_use]
    pub fn candidate_for_wire(&self, fail_ice: bool) -> String {
        if !fail_ice {
            return self.candidate.clone();
        }
        rewrite_address(&self.candidate)
    }
}

/// Rewrite the connection-address token (the 5th whitespace-separated field
/// of a `candidate:` value) to `1.1.1.1`.
fn rewrite_address(candidate: &str) -> String {
    let mut tokens: Vec<&str> = candidate.split_whitespace().collect();
    if tokens.len() > 4 {
        tokens[4] = "1.1.1.1";
    }
    tokens.join(" ")
}

/// Drop candidates whose protocol family is disabled per `{udp_disabled,
/// tcp_disabled}`, preserving order.
#[must_use]
pub fn filter_candidates(candidates: Vec<IceCandidate>, udp_disabled: bool, tcp_disabled: bool) -> Vec<IceCandidate> {
    candidates.into_iter().filter(|c| !c.is_disabled_by(udp_disabled, tcp_disabled)).collect()
}
