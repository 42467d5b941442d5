pub mod diagnostic; // Fill diagnostic dump (SCRIBE_DUMP_DIR / SCRIBE_DIAGNOSTICS)
pub mod orchestrator;
pub mod template;

pub use orchestrator::{DischargeFiller, FillReport, GridOutcome, GridStatus};
pub use template::build_template;

use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}
