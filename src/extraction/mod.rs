//! Model response handling: turns the extraction model's raw reply into
//! grid data and placeholder fields.

pub mod parser;
pub mod types;

pub use parser::parse_extraction_response;
pub use types::{ExtractedNote, RejectedGrid};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}
