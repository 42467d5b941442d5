use std::ops::Range;

use serde::Serialize;

use crate::document::{utf16_len, Document, RunRef, TableCell};

/// Where an anchor marker was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorLocation {
    /// Index of the table among the body's structural elements.
    pub table_index: usize,
    pub row: usize,
    pub column: usize,
    /// Document offsets of the marker text inside the matched cell, when the
    /// match maps onto one contiguous offset range.
    pub marker_range: Option<Range<usize>>,
}

/// Strip the `{{ }}` delimiters from an anchor marker.
pub fn clean_anchor(marker: &str) -> String {
    marker
        .replace("{{", "")
        .replace("}}", "")
        .trim()
        .to_string()
}

/// Find the first table cell, in document order, whose flattened text
/// contains the cleaned marker. Later matches are ignored.
pub fn locate_anchor(doc: &Document, marker: &str) -> Option<AnchorLocation> {
    let needle = clean_anchor(marker);
    if needle.is_empty() {
        tracing::warn!(anchor = %marker, "Anchor marker is empty after cleaning");
        return None;
    }

    for (table_index, element) in doc.body.content.iter().enumerate() {
        let Some(table) = &element.table else {
            continue;
        };
        for (row, table_row) in table.table_rows.iter().enumerate() {
            for (column, cell) in table_row.table_cells.iter().enumerate() {
                if !cell.text().contains(&needle) {
                    continue;
                }
                tracing::info!(
                    anchor = %marker,
                    table_index,
                    row,
                    column,
                    "Anchor found"
                );
                return Some(AnchorLocation {
                    table_index,
                    row,
                    column,
                    marker_range: marker_range(cell, marker, &needle),
                });
            }
        }
    }

    tracing::warn!(anchor = %marker, "Anchor not found");
    None
}

/// Offsets of the full marker in the cell, falling back to the cleaned text.
fn marker_range(cell: &TableCell, marker: &str, needle: &str) -> Option<Range<usize>> {
    let runs = cell.runs();
    let flat: String = runs.iter().map(|r| r.content).collect();

    let (byte, matched) = match flat.find(marker) {
        Some(byte) if !marker.is_empty() => (byte, marker),
        _ => (flat.find(needle)?, needle),
    };

    let start = offset_of(&runs, byte)?;
    let end = offset_of(&runs, byte + matched.len())?;
    (end.checked_sub(start)? == utf16_len(matched)).then_some(start..end)
}

/// Map a byte position in the flattened cell text to a document offset.
///
/// A position on a run boundary resolves against the run that starts there.
fn offset_of(runs: &[RunRef<'_>], byte: usize) -> Option<usize> {
    let mut flat_start = 0;
    for (i, run) in runs.iter().enumerate() {
        let flat_end = flat_start + run.content.len();
        let is_last = i + 1 == runs.len();
        if byte < flat_end || (is_last && byte == flat_end) {
            let local = run.content.get(..byte.checked_sub(flat_start)?)?;
            return Some(run.start_index? + utf16_len(local));
        }
        flat_start = flat_end;
    }
    None
}
