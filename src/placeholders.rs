//! Placeholder text fields: everything in the model's reply that is not a
//! grid becomes one document-wide replacement.

use serde_json::{Map, Value};

use crate::document::{strip_brackets, EditRequest};

const BLANK_MARKERS: &[&str] = &["none", "null", "not_found", "not found"];

/// True when a model value means "nothing found".
fn is_absent(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || BLANK_MARKERS.iter().any(|m| text.eq_ignore_ascii_case(m))
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) | Value::Array(_) => None,
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Merge `defaults` into `fields`: a default is used when the field is
/// missing, empty or an absent marker.
pub fn apply_defaults(
    fields: &Map<String, Value>,
    defaults: &[(&str, &str)],
) -> Map<String, Value> {
    let mut merged = fields.clone();
    for (key, default) in defaults {
        let current = fields.get(*key).and_then(field_text).unwrap_or_default();
        let value = if is_absent(&current) {
            default.to_string()
        } else {
            current.trim().to_string()
        };
        merged.insert(key.to_string(), Value::String(value));
    }
    merged
}

/// One case-sensitive `replaceAllText` per placeholder. Object and array
/// values are skipped; absent markers become empty text.
pub fn build_placeholder_requests(
    fields: &Map<String, Value>,
    defaults: &[(&str, &str)],
) -> Vec<EditRequest> {
    let merged = apply_defaults(fields, defaults);
    let mut requests = Vec::with_capacity(merged.len());
    for (placeholder, value) in &merged {
        let Some(text) = field_text(value) else {
            tracing::debug!(placeholder = %placeholder, "Skipping structured placeholder value");
            continue;
        };
        let text = strip_brackets(&text);
        let text = if is_absent(&text) { String::new() } else { text };
        requests.push(EditRequest::replace_all_text(placeholder.as_str(), text));
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn replacement(requests: &[EditRequest], placeholder: &str) -> Option<String> {
        requests.iter().find_map(|r| match r {
            EditRequest::ReplaceAllText(rep) if rep.contains_text.text == placeholder => {
                Some(rep.replace_text.clone())
            }
            _ => None,
        })
    }

    #[test]
    fn one_case_sensitive_replacement_per_placeholder() {
        let requests = build_placeholder_requests(
            &fields(json!({"{{age}}": 45, "{{diagnosis}}": "[Dengue fever]"})),
            &[],
        );
        assert_eq!(requests.len(), 2);
        assert_eq!(replacement(&requests, "{{age}}").as_deref(), Some("45"));
        assert_eq!(
            replacement(&requests, "{{diagnosis}}").as_deref(),
            Some("Dengue fever")
        );
        assert!(requests.iter().all(|r| matches!(
            r,
            EditRequest::ReplaceAllText(rep) if rep.contains_text.match_case
        )));
    }

    #[test]
    fn absent_markers_are_blanked() {
        let note = json!({
            "{{a}}": "NOT_FOUND",
            "{{b}}": "None",
            "{{c}}": null,
            "{{d}}": "not found"
        });
        let requests = build_placeholder_requests(&fields(note), &[]);
        for key in ["{{a}}", "{{b}}", "{{c}}", "{{d}}"] {
            assert_eq!(replacement(&requests, key).as_deref(), Some(""), "{key}");
        }
    }

    #[test]
    fn structured_values_are_skipped() {
        let note = json!({
            "{{hplc}}": {"hba": "97"},
            "{{usg}}": ["a"],
            "{{x}}": "y"
        });
        let requests = build_placeholder_requests(&fields(note), &[]);
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn defaults_fill_missing_and_absent_values() {
        let defaults = [
            ("{{ncct_imp}}", "Normal NCCT Brain study."),
            ("{{mri_imp}}", "Normal MRI."),
        ];
        let note = json!({"{{ncct_imp}}": "NULL", "{{mri_imp}}": " Old infarct. "});
        let requests = build_placeholder_requests(&fields(note), &defaults);
        assert_eq!(
            replacement(&requests, "{{ncct_imp}}").as_deref(),
            Some("Normal NCCT Brain study.")
        );
        assert_eq!(
            replacement(&requests, "{{mri_imp}}").as_deref(),
            Some("Old infarct.")
        );
    }

    #[test]
    fn defaults_are_added_for_unmentioned_placeholders() {
        let defaults = [("{{date_ncct}}", ""), ("{{bronch_imp}}", "Normal.")];
        let merged = apply_defaults(&Map::new(), &defaults);
        assert_eq!(merged.get("{{date_ncct}}"), Some(&json!("")));
        assert_eq!(merged.get("{{bronch_imp}}"), Some(&json!("Normal.")));
    }
}
