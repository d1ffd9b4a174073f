use serde::Serialize;

// ---------------------------------------------------------------------------
// Pseudo-ID generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Rows that received a synthesized ID.
    pub created: usize,
    /// Rows left unchanged after a warning.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Recorded identifier with no matching inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedEntry {
    pub identifier: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Recorded identifiers that matched at least one row.
    pub matched: usize,
    /// Rows whose actual count was written.
    pub updated_rows: usize,
    /// Rows whose actual count was capped at the target.
    pub capped_rows: usize,
    pub unmatched: Vec<UnmatchedEntry>,
}
