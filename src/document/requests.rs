use serde::{Deserialize, Serialize};

/// One positional or content-match edit, serialized in the store's
/// batch-update shape, e.g. `{"insertText": {"location": {"index": 41}, "text": "11.1"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditRequest {
    InsertText(InsertText),
    ReplaceAllText(ReplaceAllText),
    DeleteContentRange(DeleteContentRange),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertText {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllText {
    pub contains_text: SubstringMatch,
    pub replace_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatch {
    pub text: String,
    pub match_case: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentRange {
    pub range: OffsetRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl EditRequest {
    pub fn insert_text(index: usize, text: impl Into<String>) -> Self {
        Self::InsertText(InsertText {
            location: Location { index },
            text: text.into(),
        })
    }

    /// Case-sensitive replacement of every occurrence of `search`.
    pub fn replace_all_text(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::ReplaceAllText(ReplaceAllText {
            contains_text: SubstringMatch {
                text: search.into(),
                match_case: true,
            },
            replace_text: replacement.into(),
        })
    }

    pub fn delete_content_range(start_index: usize, end_index: usize) -> Self {
        Self::DeleteContentRange(DeleteContentRange {
            range: OffsetRange {
                start_index,
                end_index,
            },
        })
    }

    /// The offset this request is pinned to, if any.
    ///
    /// Content-match replacements have none: they find their target by text.
    pub fn offset_key(&self) -> Option<usize> {
        match self {
            Self::InsertText(insert) => Some(insert.location.index),
            Self::DeleteContentRange(delete) => Some(delete.range.start_index),
            Self::ReplaceAllText(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsertText(_) => "insert_text",
            Self::ReplaceAllText(_) => "replace_all_text",
            Self::DeleteContentRange(_) => "delete_content_range",
        }
    }
}
