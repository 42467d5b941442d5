use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::anchor::AnchorLocation;
use super::dates::sort_dates;
use super::diagnostics::{FillDiagnostics, SkipReason};
use super::normalize::normalize_key;
use super::payload::LabData;
use crate::document::{strip_brackets, Document, EditRequest, Table};

/// How the anchor marker is removed once the grid is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorCleanup {
    /// Delete the marker's exact offsets inside the matched cell.
    #[default]
    Scoped,
    /// Replace the marker text everywhere in the document.
    Global,
}

impl AnchorCleanup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scoped => "scoped",
            Self::Global => "global",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scoped" => Some(Self::Scoped),
            "global" => Some(Self::Global),
            _ => None,
        }
    }
}

/// Edits for one grid plus what was left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridPlan {
    pub requests: Vec<EditRequest>,
    pub diagnostics: FillDiagnostics,
}

impl GridPlan {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Compute the unsequenced edits that write `data` into the grid anchored at
/// `anchor`: one header insert per date (left to right from the anchor
/// column), one insert per non-empty value (top to bottom in `test_order`),
/// and one request that clears the marker, emitted first.
///
/// Never fails: out-of-bounds dates and keys, missing values and unresolvable
/// cells are recorded in the plan's diagnostics and skipped.
pub fn fill_grid<S: AsRef<str>>(
    doc: &Document,
    anchor: &AnchorLocation,
    marker: &str,
    data: &LabData,
    test_order: &[S],
    cleanup: AnchorCleanup,
) -> GridPlan {
    let mut plan = GridPlan::default();
    let clear = cleanup_request(anchor, marker, cleanup, &mut plan.diagnostics);
    plan.requests.push(clear);

    let Some(table) = doc.table_at(anchor.table_index) else {
        plan.diagnostics.skip(
            SkipReason::MalformedCell,
            None,
            None,
            Some((anchor.row, anchor.column)),
        );
        return plan;
    };

    let width = table.header_width();
    let height = table.row_count();
    let dates = sort_dates(data.dates());

    for (i, &date) in dates.iter().enumerate() {
        let column = anchor.column + i;
        if column >= width {
            for &skipped in &dates[i..] {
                plan.diagnostics
                    .skip(SkipReason::ColumnOutOfBounds, Some(skipped), None, None);
            }
            break;
        }

        if date.trim().is_empty() {
            plan.diagnostics.skip(
                SkipReason::EmptyValue,
                Some(date),
                None,
                Some((anchor.row, column)),
            );
        } else if let Some(at) = insertion_offset(table, anchor.row, column) {
            plan.requests.push(EditRequest::insert_text(at, date));
            plan.diagnostics.header_inserts += 1;
        } else {
            plan.diagnostics.skip(
                SkipReason::MalformedCell,
                Some(date),
                None,
                Some((anchor.row, column)),
            );
        }

        let lookup: HashMap<String, &str> = data
            .values_for(date)
            .into_iter()
            .flatten()
            .map(|(key, value)| (normalize_key(key), value.as_str()))
            .collect();

        for (j, test_key) in test_order.iter().enumerate() {
            let test_key = test_key.as_ref();
            let row = anchor.row + 1 + j;
            if row >= height {
                for remaining in &test_order[j..] {
                    let remaining = remaining.as_ref();
                    if lookup.contains_key(&normalize_key(remaining)) {
                        plan.diagnostics.skip(
                            SkipReason::RowOutOfBounds,
                            Some(date),
                            Some(remaining),
                            None,
                        );
                    }
                }
                break;
            }

            let Some(raw) = lookup.get(&normalize_key(test_key)) else {
                plan.diagnostics.skip(
                    SkipReason::MissingValue,
                    Some(date),
                    Some(test_key),
                    Some((row, column)),
                );
                continue;
            };
            let value = strip_brackets(raw);
            if value.is_empty() {
                plan.diagnostics.skip(
                    SkipReason::EmptyValue,
                    Some(date),
                    Some(test_key),
                    Some((row, column)),
                );
                continue;
            }

            match insertion_offset(table, row, column) {
                Some(at) => {
                    plan.requests.push(EditRequest::insert_text(at, value));
                    plan.diagnostics.value_inserts += 1;
                }
                None => plan.diagnostics.skip(
                    SkipReason::MalformedCell,
                    Some(date),
                    Some(test_key),
                    Some((row, column)),
                ),
            }
        }
    }

    tracing::debug!(
        anchor = %marker,
        headers = plan.diagnostics.header_inserts,
        values = plan.diagnostics.value_inserts,
        skipped = plan.diagnostics.skipped.len(),
        "Grid fill planned"
    );
    plan
}

fn insertion_offset(table: &Table, row: usize, column: usize) -> Option<usize> {
    table.cell(row, column)?.insertion_offset()
}

fn cleanup_request(
    anchor: &AnchorLocation,
    marker: &str,
    cleanup: AnchorCleanup,
    diagnostics: &mut FillDiagnostics,
) -> EditRequest {
    match (cleanup, &anchor.marker_range) {
        (AnchorCleanup::Scoped, Some(range)) => {
            EditRequest::delete_content_range(range.start, range.end)
        }
        (AnchorCleanup::Scoped, None) => {
            tracing::warn!(
                anchor = %marker,
                "Marker offsets unavailable, clearing anchor document-wide"
            );
            diagnostics.skip(
                SkipReason::ScopedCleanupUnavailable,
                None,
                None,
                Some((anchor.row, anchor.column)),
            );
            EditRequest::replace_all_text(marker, "")
        }
        (AnchorCleanup::Global, _) => EditRequest::replace_all_text(marker, ""),
    }
}
