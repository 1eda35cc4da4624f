//! `<content senders="...">`, mapped to/from the SDP direction attribute.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Senders {
    Both,
    Initiator,
    Responder,
    None,
}

impl Senders {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Initiator => "initiator",
            Self::Responder => "responder",
            Self::None => "none",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "both" => Self::Both,
            "initiator" => Self::Initiator,
            "responder" => Self::Responder,
            "none" => Self::None,
            _ => return None,
        })
    }

    /// The SDP `a=sendrecv|sendonly|recvonly|inactive` line this maps to,
    /// given which role (`initiator`/`responder`) is "us".
    #[must_use]
    pub fn to_sdp_direction(self, we_are_initiator: bool) -> &'static str {
        match self {
            Self::Both => "sendrecv",
            Self::None => "inactive",
            Self::Initiator => {
                if we_are_initiator {
                    "sendonly"
                } else {
                    "recvonly"
                }
            }
            Self::Responder => {
                if we_are_initiator {
                    "recvonly"
                } else {
                    "sendonly"
                }
            }
        }
    }

    #[must_use]
    pub fn from_sdp_direction(direction: &str, we_are_initiator: bool) -> Self {
        match direction {
            "sendrecv" => Self::Both,
            "inactive" => Self::None,
            "sendonly" => {
                if we_are_initiator {
                    Self::Initiator
                } else {
                    Self::Responder
                }
            }
            "recvonly" => {
                if we_are_initiator {
                    Self::Responder
                } else {
                    Self::Initiator
                }
            }
            _ => Self::Both,
        }
    }
}

impl fmt::Display for Senders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_maps_to_sendrecv() {
        assert_eq!(Senders::Both.to_sdp_direction(true), "sendrecv");
    }

    #[test]
    fn initiator_senders_as_initiator_is_sendonly() {
        assert_eq!(Senders::Initiator.to_sdp_direction(true), "sendonly");
        assert_eq!(Senders::Initiator.to_sdp_direction(false), "recvonly");
    }

    #[test]
    fn round_trip_through_sdp_direction() {
        let s = Senders::Responder;
        let dir = s.to_sdp_direction(false);
        assert_eq!(Senders::from_sdp_direction(dir, false), s);
    }
}
