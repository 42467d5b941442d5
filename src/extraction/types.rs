use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::grid::LabData;
use crate::profiles::PATIENT_NAME_KEY;

/// A grid payload that could not be normalized. The grid is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedGrid {
    pub payload_key: String,
    pub reason: String,
}

/// Parsed model output, split into grids and placeholder fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedNote {
    /// Grid data keyed by payload key (`{{labs_json}}`, ...).
    pub grids: BTreeMap<String, LabData>,
    pub rejected_grids: Vec<RejectedGrid>,
    /// Everything else, keyed by placeholder.
    pub fields: Map<String, Value>,
}

impl ExtractedNote {
    pub fn grid(&self, payload_key: &str) -> Option<&LabData> {
        self.grids.get(payload_key)
    }

    /// Patient name for the output title, `"Unknown"` when absent.
    pub fn patient_name(&self) -> String {
        match self.fields.get(PATIENT_NAME_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => "Unknown".to_string(),
        }
    }
}
