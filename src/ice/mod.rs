//! ICE candidate and credential data model.
//!
//! This crate does not implement ICE itself (foundation/priority
//! computation, connectivity checks); it only carries what the peer
//! connection hands it and what the Jingle codec needs to (de)serialize.

pub mod candidate;
pub mod credentials;

pub use candidate::{IceCandidate, Protocol, filter_candidates};
pub use credentials::IceCredentials;
