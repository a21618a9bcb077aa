use std::fmt;

use crate::driver::{DeleteOutcome, UpdateOutcome};

/// Uniform report of what a write did.
///
/// [`WriteResult::empty`] is the neutral value for operations that never
/// reached the store; `Result::unwrap_or_default` yields it on error paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteResult {
    pub matched: u64,
    pub modified: u64,
    pub inserted: u64,
    pub deleted: u64,
}

impl WriteResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_update(outcome: &UpdateOutcome) -> Self {
        WriteResult {
            matched: outcome.matched,
            modified: outcome.modified,
            inserted: outcome.upserted,
            deleted: 0,
        }
    }

    pub fn from_delete(outcome: &DeleteOutcome) -> Self {
        WriteResult {
            deleted: outcome.deleted,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

impl fmt::Display for WriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched: {}, Modified: {}, Inserted: {}, Deleted: {}",
            self.matched, self.modified, self.inserted, self.deleted
        )
    }
}
