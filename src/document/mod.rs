//! Read-only snapshot of a structured document and the edit requests that
//! can be submitted against it.
//!
//! Offsets everywhere in this module are in the document store's unit:
//! UTF-16 code units, counted from the start of the body. A snapshot is
//! never mutated by the fill engine; `apply` exists for the in-memory store
//! and for simulating a batch before it is submitted.

pub mod apply;
pub mod builder;
pub mod requests;
pub mod text;
pub mod types;

pub use apply::*;
pub use builder::*;
pub use requests::*;
pub use text::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No text run contains offset {0}")]
    OffsetOutsideText(usize),

    #[error("Invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Offset {offset} splits a UTF-16 surrogate pair")]
    SplitCharacter { offset: usize },

    #[error("Empty search text in replaceAllText")]
    EmptySearchText,
}
