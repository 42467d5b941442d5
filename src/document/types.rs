use serde::{Deserialize, Serialize};

/// A document snapshot as returned by the document store.
///
/// Mirrors the store's JSON shape (camelCase, optional "oneof" members).
/// Unknown fields (styles, lists, headers) are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One block-level element. Exactly one of `paragraph`, `table` or
/// `section_break` is set in well-formed input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_break: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

/// A text run together with the offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRef<'a> {
    pub start_index: Option<usize>,
    pub content: &'a str,
}

impl Document {
    /// The table stored at `index` among the body's structural elements.
    pub fn table_at(&self, index: usize) -> Option<&Table> {
        self.body.content.get(index)?.table.as_ref()
    }

    /// Every text run of the body in document order, descending into tables.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in collect_runs(&self.body.content) {
            out.push_str(run.content);
        }
        out
    }
}

impl Table {
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.table_rows.get(row)?.table_cells.get(column)
    }

    pub fn row_count(&self) -> usize {
        self.table_rows.len()
    }

    /// Column bound used by the grid filler: the cell count of the first row.
    pub fn header_width(&self) -> usize {
        self.table_rows
            .first()
            .map(|row| row.table_cells.len())
            .unwrap_or(0)
    }
}

impl TableCell {
    /// The cell's ending offset, derived from its last content element when
    /// the store omitted it.
    pub fn end_offset(&self) -> Option<usize> {
        self.end_index
            .or_else(|| self.content.last().and_then(|el| el.end_index))
    }

    /// Offset just before the cell's terminating newline, where inserted text
    /// stays inside the cell.
    pub fn insertion_offset(&self) -> Option<usize> {
        self.end_offset()?.checked_sub(1)
    }

    /// Text runs of every paragraph in the cell, in order.
    pub fn runs(&self) -> Vec<RunRef<'_>> {
        collect_runs(&self.content)
    }

    /// All run text of the cell concatenated.
    pub fn text(&self) -> String {
        self.runs().iter().map(|r| r.content).collect()
    }
}

fn collect_runs(elements: &[StructuralElement]) -> Vec<RunRef<'_>> {
    let mut runs = Vec::new();
    for element in elements {
        if let Some(paragraph) = &element.paragraph {
            for pe in &paragraph.elements {
                if let Some(run) = &pe.text_run {
                    runs.push(RunRef {
                        start_index: pe.start_index,
                        content: &run.content,
                    });
                }
            }
        }
        if let Some(table) = &element.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    runs.extend(collect_runs(&cell.content));
                }
            }
        }
    }
    runs
}
