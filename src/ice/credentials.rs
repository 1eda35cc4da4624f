//! Typed ICE username fragment / password pair: both the renegotiation
//! protocol and the drip-candidate transport-info path need `ufrag`/`pwd`
//! together rather than as loose strings.

/// ICE credentials for one side of a media section (or the whole session,
/// when BUNDLEd).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IceCredentials {
    pub ufrag: Option<String>,
    pub pwd: Option<String>,
}

impl IceCredentials {
    #[must_use]
    pub fn new(ufrag: Option<String>, pwd: Option<String>) -> Self {
        Self { ufrag, pwd }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.ufrag.is_some() && self.pwd.is_some()
    }

    /// `true` if `other`'s ufrag differs from this one (and both are
    /// present) — drives the `REMOTE_UFRAG_CHANGED`/`LOCAL_UFRAG_CHANGED`
    /// events.
    #[must_use]
    pub fn ufrag_changed(&self, other: &Self) -> bool {
        match (&self.ufrag, &other.ufrag) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}
