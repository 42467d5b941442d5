use std::collections::BTreeMap;

use serde::Serialize;

/// Why a grid cell received no edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// More dates than columns to the right of the anchor.
    ColumnOutOfBounds,
    /// More test keys than rows below the anchor.
    RowOutOfBounds,
    /// The date has no value for this test key.
    MissingValue,
    /// The value was empty after bracket stripping.
    EmptyValue,
    /// The cell could not be resolved (ragged row, missing offsets).
    MalformedCell,
    /// The exact marker range was unavailable; the anchor was cleared by
    /// document-wide replacement instead.
    ScopedCleanupUnavailable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnOutOfBounds => "column_out_of_bounds",
            Self::RowOutOfBounds => "row_out_of_bounds",
            Self::MissingValue => "missing_value",
            Self::EmptyValue => "empty_value",
            Self::MalformedCell => "malformed_cell",
            Self::ScopedCleanupUnavailable => "scoped_cleanup_unavailable",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCell {
    pub reason: SkipReason,
    pub date: Option<String>,
    pub test_key: Option<String>,
    pub row: Option<usize>,
    pub column: Option<usize>,
}

/// Everything the filler left out, and how much it wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillDiagnostics {
    pub header_inserts: usize,
    pub value_inserts: usize,
    pub skipped: Vec<SkippedCell>,
}

impl FillDiagnostics {
    pub fn skip(
        &mut self,
        reason: SkipReason,
        date: Option<&str>,
        test_key: Option<&str>,
        cell: Option<(usize, usize)>,
    ) {
        self.skipped.push(SkippedCell {
            reason,
            date: date.map(str::to_string),
            test_key: test_key.map(str::to_string),
            row: cell.map(|(r, _)| r),
            column: cell.map(|(_, c)| c),
        });
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    /// Skip counts keyed by reason.
    pub fn counts(&self) -> BTreeMap<SkipReason, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.reason).or_insert(0) += 1;
        }
        counts
    }
}
