//! The trust boundary for grid data.
//!
//! Model output hands over a grid either as a JSON object or as a string
//! containing one. Both are normalized here into [`LabData`]; nothing
//! stringly-typed reaches the filler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Grid payload is not valid JSON: {0}")]
    JsonParsing(String),

    #[error("Grid payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A grid as delivered by the extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridPayload {
    Structured(Map<String, Value>),
    Raw(String),
}

/// date → (test key → value), normalized and ready for the filler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabData(BTreeMap<String, BTreeMap<String, String>>);

impl GridPayload {
    /// Classify an arbitrary JSON value found under a grid key.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(map) => Ok(Self::Structured(map)),
            Value::String(raw) => Ok(Self::Raw(raw)),
            other => Err(PayloadError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse-or-reject step. Date entries that are not objects are dropped
    /// with a warning; a non-object top level rejects the whole payload.
    pub fn into_lab_data(self) -> Result<LabData, PayloadError> {
        let map = match self {
            Self::Structured(map) => map,
            Self::Raw(raw) => match parse_stringified(&raw)? {
                Value::Object(map) => map,
                other => return Err(PayloadError::NotAnObject(json_kind(&other))),
            },
        };

        let mut dates = BTreeMap::new();
        for (date, entry) in map {
            let tests = match entry {
                Value::Object(tests) => tests,
                other => {
                    tracing::warn!(
                        date = %date,
                        kind = json_kind(&other),
                        "Dropping grid date whose values are not an object"
                    );
                    continue;
                }
            };
            let values: BTreeMap<String, String> = tests
                .into_iter()
                .filter_map(|(key, value)| cell_text(value).map(|text| (key, text)))
                .collect();
            dates.insert(date, values);
        }
        Ok(LabData(dates))
    }
}

impl LabData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        date: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0
            .entry(date.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values_for(&self, date: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(date)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<D, K, V> FromIterator<(D, K, V)> for LabData
where
    D: Into<String>,
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (D, K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (date, key, value) in iter {
            data.insert(date, key, value);
        }
        data
    }
}

/// Parse a grid the model returned as a string. Code fences are dropped;
/// single quotes are swapped for double quotes only when the text does not
/// already parse, so apostrophes inside valid values survive.
fn parse_stringified(raw: &str) -> Result<Value, PayloadError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    let err = match serde_json::from_str(cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => PayloadError::JsonParsing(e.to_string()),
    };
    if !cleaned.starts_with('{') || !cleaned.contains('\'') {
        return Err(err);
    }
    serde_json::from_str(&cleaned.replace('\'', "\"")).map_err(|_| err)
}

/// Text written into a cell for a JSON value; `null` means "no value".
fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // composite readings (e.g. a DLC breakdown) keep their text; brackets
        // are stripped later by the filler
        other => Some(other.to_string()),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
