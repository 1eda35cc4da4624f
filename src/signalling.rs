//! Signalling Layer: the SSRC → owner mapping.

use std::collections::HashMap;

/// Maps an RTP `ssrc` to the conference participant resource that owns it.
///
/// Populated from inbound `<source ssrc="..."><ssrc-info owner="..."/></source>`
/// children as content is processed; an ssrc is assigned at most one owner,
/// later writes overwrite.
#[derive(Debug, Clone, Default)]
pub struct SsrcTable {
    owners: HashMap<u32, String>,
}

impl SsrcTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ssrc_owner(&mut self, ssrc: u32, owner_resource: String) {
        self.owners.insert(ssrc, owner_resource);
    }

    #[must_use]
    pub fn get_ssrc_owner(&self, ssrc: u32) -> Option<&str> {
        self.owners.get(&ssrc).map(String::as_str)
    }

    pub fn remove(&mut self, ssrc: u32) {
        self.owners.remove(&ssrc);
    }

    /// Detach from the room — clears all recorded ownership, mirroring the
    /// session's attach/detach-at-init/close lifecycle.
    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_write_overwrites_earlier_owner() {
        let mut table = SsrcTable::new();
        table.set_ssrc_owner(111, "alice".into());
        table.set_ssrc_owner(111, "bob".into());
        assert_eq!(table.get_ssrc_owner(111), Some("bob"));
    }

    #[test]
    fn unknown_ssrc_has_no_owner() {
        let table = SsrcTable::new();
        assert_eq!(table.get_ssrc_owner(999), None);
    }

    #[test]
    fn clear_detaches_all_owners() {
        let mut table = SsrcTable::new();
        table.set_ssrc_owner(111, "alice".into());
        table.clear();
        assert_eq!(table.get_ssrc_owner(111), None);
    }
}
