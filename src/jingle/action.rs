//! `<jingle action="...">` values.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SessionInitiate,
    SessionAccept,
    SessionTerminate,
    SessionInfo,
    TransportInfo,
    TransportAccept,
    TransportReject,
    TransportReplace,
    SourceAdd,
    SourceRemove,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionInitiate => "session-initiate",
            Self::SessionAccept => "session-accept",
            Self::SessionTerminate => "session-terminate",
            Self::SessionInfo => "session-info",
            Self::TransportInfo => "transport-info",
            Self::TransportAccept => "transport-accept",
            Self::TransportReject => "transport-reject",
            Self::TransportReplace => "transport-replace",
            Self::SourceAdd => "source-add",
            Self::SourceRemove => "source-remove",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "session-initiate" => Self::SessionInitiate,
            "session-accept" => Self::SessionAccept,
            "session-terminate" => Self::SessionTerminate,
            "session-info" => Self::SessionInfo,
            "transport-info" => Self::TransportInfo,
            "transport-accept" => Self::TransportAccept,
            "transport-reject" => Self::TransportReject,
            "transport-replace" => Self::TransportReplace,
            "source-add" => Self::SourceAdd,
            "source-remove" => Self::SourceRemove,
            _ => return None,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
