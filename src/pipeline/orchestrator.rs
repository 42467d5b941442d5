use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use super::diagnostic::{dump_dir_for, dump_json, dump_text};
use super::PipelineError;
use crate::config::{document_link, ScribeConfig};
use crate::extraction::{parse_extraction_response, ExtractedNote, RejectedGrid};
use crate::grid::{plan_grid_fill, FillDiagnostics, SkipReason};
use crate::placeholders::build_placeholder_requests;
use crate::profiles::{summary_file_name, Department};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStatus {
    Filled,
    /// The note carried no usable data for this grid. An empty grid object
    /// still has its anchor cleared.
    NoData,
    AnchorNotFound,
}

/// What happened to one grid of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridOutcome {
    pub name: String,
    pub anchor: String,
    pub status: GridStatus,
    pub requests: usize,
    pub diagnostics: FillDiagnostics,
}

/// Summary of one fill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub run_id: Uuid,
    pub department: Department,
    pub document_id: String,
    pub document_link: String,
    /// Title given to the filled copy, when one was made.
    pub file_name: Option<String>,
    pub grids: Vec<GridOutcome>,
    pub rejected_grids: Vec<RejectedGrid>,
    pub placeholder_requests: usize,
}

/// Fills a discharge document from an extraction response.
///
/// Each grid is planned against a freshly fetched snapshot and submitted as
/// its own batch; placeholder replacements follow as one final batch.
pub struct DischargeFiller {
    store: Box<dyn DocumentStore>,
    department: Department,
    config: ScribeConfig,
}

impl DischargeFiller {
    pub fn new(
        store: Box<dyn DocumentStore>,
        department: Department,
        config: ScribeConfig,
    ) -> Self {
        Self {
            store,
            department,
            config,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        &*self.store
    }

    /// Copy the template under the summary title, then fill the copy.
    pub fn fill_from_template(
        &mut self,
        template_id: &str,
        response: &str,
        tag: &str,
    ) -> Result<FillReport, PipelineError> {
        let note = self.parse(response)?;
        let file_name = summary_file_name(&note.patient_name(), tag);
        let document_id = self.store.copy_document(template_id, &file_name)?;
        tracing::info!(document_id = %document_id, "Template copied");

        let mut report = self.run(&document_id, &note, Some(response))?;
        report.file_name = Some(file_name);
        Ok(report)
    }

    /// Fill an existing document in place from a raw model response.
    pub fn fill_response(
        &mut self,
        document_id: &str,
        response: &str,
    ) -> Result<FillReport, PipelineError> {
        let note = self.parse(response)?;
        self.run(document_id, &note, Some(response))
    }

    /// Fill an existing document from an already parsed note.
    pub fn fill_note(
        &mut self,
        document_id: &str,
        note: &ExtractedNote,
    ) -> Result<FillReport, PipelineError> {
        self.run(document_id, note, None)
    }

    fn parse(&self, response: &str) -> Result<ExtractedNote, PipelineError> {
        let keys = self.department.payload_keys();
        Ok(parse_extraction_response(response, &keys)?)
    }

    fn run(
        &mut self,
        document_id: &str,
        note: &ExtractedNote,
        response: Option<&str>,
    ) -> Result<FillReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let dump_dir: Option<PathBuf> = self
            .config
            .dump_dir
            .as_deref()
            .and_then(|base| dump_dir_for(base, &run_id));

        tracing::info!(
            run_id = %run_id,
            document_id = %document_id,
            department = %self.department,
            grids = note.grids.len(),
            "Starting discharge fill"
        );

        if let Some(dir) = &dump_dir {
            if let Some(response) = response {
                dump_text(dir, "00-response.txt", response);
            }
            dump_json(dir, "00-extraction.json", note);
        }

        let mut grids = Vec::new();
        for grid in self.department.grids() {
            let Some(data) = note.grid(grid.payload_key) else {
                grids.push(GridOutcome {
                    name: grid.name.to_string(),
                    anchor: grid.anchor.to_string(),
                    status: GridStatus::NoData,
                    requests: 0,
                    diagnostics: FillDiagnostics::default(),
                });
                continue;
            };

            let snapshot = self.store.fetch(document_id)?;
            let plan = plan_grid_fill(
                &snapshot,
                grid.anchor,
                data,
                grid.test_order,
                self.config.anchor_cleanup,
            );

            // an empty grid still submits its anchor cleanup
            let status = if plan.is_empty() {
                GridStatus::AnchorNotFound
            } else {
                self.store.batch_update(document_id, &plan.requests)?;
                if data.is_empty() {
                    GridStatus::NoData
                } else {
                    GridStatus::Filled
                }
            };

            if status == GridStatus::Filled && plan.diagnostics.value_inserts == 0 {
                tracing::warn!(
                    grid = grid.name,
                    dates = data.len(),
                    missing = plan.diagnostics.count(SkipReason::MissingValue),
                    skipped = ?plan.diagnostics.counts(),
                    "Grid had data but no values were written"
                );
            }
            if let Some(dir) = &dump_dir {
                dump_json(dir, &format!("01-grid-{}.json", grid.name), &plan);
            }

            grids.push(GridOutcome {
                name: grid.name.to_string(),
                anchor: grid.anchor.to_string(),
                status,
                requests: plan.requests.len(),
                diagnostics: plan.diagnostics,
            });
        }

        let defaults = self.department.defaults();
        let placeholder_requests = build_placeholder_requests(&note.fields, defaults);
        if !placeholder_requests.is_empty() {
            self.store.batch_update(document_id, &placeholder_requests)?;
        }
        if let Some(dir) = &dump_dir {
            dump_json(dir, "02-placeholders.json", &placeholder_requests);
        }

        let report = FillReport {
            run_id,
            department: self.department,
            document_id: document_id.to_string(),
            document_link: document_link(document_id),
            file_name: None,
            grids,
            rejected_grids: note.rejected_grids.clone(),
            placeholder_requests: placeholder_requests.len(),
        };

        if let Some(dir) = &dump_dir {
            dump_json(dir, "03-report.json", &report);
        }
        tracing::info!(
            run_id = %run_id,
            filled = report.grids.iter().filter(|g| g.status == GridStatus::Filled).count(),
            placeholders = report.placeholder_requests,
            "Discharge fill complete"
        );
        Ok(report)
    }
}
