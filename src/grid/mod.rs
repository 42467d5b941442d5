//! Grid fill engine: writes a date-by-test matrix into an anchored table.
//!
//! ```text
//! normalize  ── test-key equivalence ("Uric Acid" == "uric_acid")
//! anchor     ── first cell containing the marker
//! payload    ── parse-or-reject boundary for model output
//! dates      ── chronological column order
//! filler     ── header/value inserts plus marker cleanup
//! sequencer  ── descending-offset ordering for one batch
//! ```
//!
//! Planning is pure: a snapshot goes in, requests come out. Nothing here
//! talks to a document store.

pub mod anchor;
pub mod dates;
pub mod diagnostics;
pub mod filler;
pub mod normalize;
pub mod payload;
pub mod sequencer;

pub use anchor::{clean_anchor, locate_anchor, AnchorLocation};
pub use dates::{sort_dates, DateKey};
pub use diagnostics::{FillDiagnostics, SkipReason, SkippedCell};
pub use filler::{fill_grid, AnchorCleanup, GridPlan};
pub use normalize::normalize_key;
pub use payload::{GridPayload, LabData, PayloadError};
pub use sequencer::sequence_requests;

use crate::document::Document;

/// Locate `marker`, fill the grid below it and sequence the result.
///
/// An absent anchor yields an empty plan: the grid is skipped, not failed.
pub fn plan_grid_fill<S: AsRef<str>>(
    doc: &Document,
    marker: &str,
    data: &LabData,
    test_order: &[S],
    cleanup: AnchorCleanup,
) -> GridPlan {
    let Some(anchor) = locate_anchor(doc, marker) else {
        return GridPlan::default();
    };

    let plan = fill_grid(doc, &anchor, marker, data, test_order, cleanup);
    tracing::info!(
        anchor = %marker,
        dates = data.len(),
        requests = plan.requests.len(),
        skipped = ?plan.diagnostics.counts(),
        "Grid planned"
    );
    GridPlan {
        requests: sequence_requests(plan.requests),
        diagnostics: plan.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{apply_request, DocumentBuilder, EditRequest};

    fn doc() -> Document {
        DocumentBuilder::new("d")
            .grid_table("Test", "{{CSF_ANCHOR}}", &["tlc", "glucose"], 2)
            .build()
    }

    #[test]
    fn missing_anchor_yields_empty_plan() {
        let data: LabData = [("d1", "tlc", "5")].into_iter().collect();
        let plan = plan_grid_fill(
            &doc(),
            "{{CARDIAC_ANCHOR}}",
            &data,
            &["tlc"],
            AnchorCleanup::Scoped,
        );
        assert!(plan.is_empty());
        assert!(plan.diagnostics.skipped.is_empty());
    }

    #[test]
    fn plan_is_sequenced_and_applies_cleanly() {
        let data: LabData = [("12/01/2025", "TLC", "5"), ("10/01/2025", "Glucose", "62")]
            .into_iter()
            .collect();
        let plan = plan_grid_fill(
            &doc(),
            "{{CSF_ANCHOR}}",
            &data,
            &["tlc", "glucose"],
            AnchorCleanup::Scoped,
        );

        let offsets: Vec<_> = plan
            .requests
            .iter()
            .filter_map(EditRequest::offset_key)
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] >= w[1]));

        let mut filled = doc();
        for request in &plan.requests {
            apply_request(&mut filled, request).unwrap();
        }
        let table = filled.table_at(1).unwrap();
        assert_eq!(table.cell(0, 1).unwrap().text(), "10/01/2025\n");
        assert_eq!(table.cell(0, 2).unwrap().text(), "12/01/2025\n");
        assert_eq!(table.cell(2, 1).unwrap().text(), "62\n");
        assert_eq!(table.cell(1, 2).unwrap().text(), "5\n");
    }

    #[test]
    fn empty_data_only_clears_the_marker() {
        let plan = plan_grid_fill(
            &doc(),
            "{{CSF_ANCHOR}}",
            &LabData::new(),
            &["tlc"],
            AnchorCleanup::Global,
        );
        assert_eq!(
            plan.requests,
            vec![EditRequest::replace_all_text("{{CSF_ANCHOR}}", "")]
        );
    }
}
