/// Counters reported by `update_one`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
    pub upserted: u64,
    /// The `id` of the document created by an upsert.
    pub upserted_id: Option<String>,
}

/// Counters reported by `delete_one` / `delete_many`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}
