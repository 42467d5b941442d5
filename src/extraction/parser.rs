use serde_json::Value;

use super::types::{ExtractedNote, RejectedGrid};
use super::ExtractionError;
use crate::grid::payload::json_kind;
use crate::grid::GridPayload;

/// Parse the extraction model's reply.
///
/// The reply may wrap its JSON object in prose or code fences; everything
/// from the first `{` to the last `}` is taken as the object. Keys listed in
/// `grid_keys` are normalized into grid data; a grid that cannot be
/// normalized is reported in `rejected_grids` and does not fail the parse.
pub fn parse_extraction_response(
    response: &str,
    grid_keys: &[&str],
) -> Result<ExtractedNote, ExtractionError> {
    let json_str = extract_json_object(response)?;
    let value: Value =
        serde_json::from_str(json_str).map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;
    let mut fields = match value {
        Value::Object(map) => map,
        other => {
            return Err(ExtractionError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut note = ExtractedNote::default();
    for key in grid_keys {
        let Some(raw) = fields.remove(*key) else {
            continue;
        };
        match GridPayload::from_value(raw).and_then(GridPayload::into_lab_data) {
            Ok(data) => {
                note.grids.insert(key.to_string(), data);
            }
            Err(e) => {
                tracing::warn!(payload_key = %key, error = %e, "Skipping grid payload");
                note.rejected_grids.push(RejectedGrid {
                    payload_key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
    note.fields = fields;

    tracing::debug!(
        grids = note.grids.len(),
        rejected = note.rejected_grids.len(),
        fields = note.fields.len(),
        "Extraction response parsed"
    );
    Ok(note)
}

fn extract_json_object(response: &str) -> Result<&str, ExtractionError> {
    let malformed = |msg: &str| ExtractionError::MalformedResponse(msg.into());
    let start = response
        .find('{')
        .ok_or_else(|| malformed("No JSON object found"))?;
    let end = response
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| malformed("Unclosed JSON object"))?;
    Ok(&response[start..=end])
}
