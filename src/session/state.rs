//! Session lifecycle.

/// `PENDING` → `ACTIVE` → `ENDED`. Once `ENDED`, no further stanzas are
/// emitted except cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Active,
    Ended,
}

impl SessionState {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}
