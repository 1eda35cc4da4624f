//! SDP Model: text-block splitting and line-level queries.
//!
//! This is deliberately not a grammar-level SDP parser — see
//! [`snapshot::SdpSnapshot`] for the line-oriented model this crate actually
//! needs.

pub mod lines;
pub mod sdp_error;
pub mod snapshot;

pub use lines::{contains_ssrc, find_line, find_lines};
pub use sdp_error::SdpError;
pub use snapshot::SdpSnapshot;
