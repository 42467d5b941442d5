//! Builds snapshots with the same offset layout the document store produces:
//! a section break at `0..1`, one paragraph per block, and tables whose
//! table, row and cell openings each occupy one offset. Every paragraph ends
//! with `\n`, so a cell's `endIndex - 1` is its terminating newline.

use super::text::utf16_len;
use super::types::{
    Body, Document, Paragraph, ParagraphElement, StructuralElement, Table, TableCell, TableRow,
    TextRun,
};

#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    document_id: String,
    title: Option<String>,
    content: Vec<StructuralElement>,
    cursor: usize,
}

impl DocumentBuilder {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: None,
            content: vec![StructuralElement {
                start_index: None,
                end_index: Some(1),
                section_break: Some(serde_json::json!({})),
                ..Default::default()
            }],
            cursor: 1,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a body paragraph. A trailing newline is added when missing.
    pub fn paragraph(mut self, text: &str) -> Self {
        let element = paragraph_element(&mut self.cursor, text);
        self.content.push(element);
        self
    }

    /// Append a table; each inner sequence is one row of cell texts.
    pub fn table<R, C>(mut self, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let table_start = self.cursor;
        self.cursor += 1;

        let mut table_rows = Vec::new();
        for row in rows {
            let row_start = self.cursor;
            self.cursor += 1;
            let mut cells = Vec::new();
            for text in row {
                let cell_start = self.cursor;
                self.cursor += 1;
                let paragraph = paragraph_element(&mut self.cursor, text.as_ref());
                cells.push(TableCell {
                    start_index: Some(cell_start),
                    end_index: Some(self.cursor),
                    content: vec![paragraph],
                });
            }
            table_rows.push(TableRow {
                start_index: Some(row_start),
                end_index: Some(self.cursor),
                table_cells: cells,
            });
        }
        self.cursor += 1;

        let columns = table_rows
            .iter()
            .map(|r| r.table_cells.len())
            .max()
            .unwrap_or(0);
        self.content.push(StructuralElement {
            start_index: Some(table_start),
            end_index: Some(self.cursor),
            table: Some(Table {
                rows: Some(table_rows.len()),
                columns: Some(columns),
                table_rows,
            }),
            ..Default::default()
        });
        self
    }

    /// Append an empty lab grid: the header row holds `header_label`, then
    /// `anchor` in the first date column; one labelled row per test key.
    pub fn grid_table(
        self,
        header_label: &str,
        anchor: &str,
        row_labels: &[&str],
        date_columns: usize,
    ) -> Self {
        let width = date_columns.max(1);
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(row_labels.len() + 1);

        let mut header = vec![header_label.to_string(), anchor.to_string()];
        header.resize(width + 1, String::new());
        rows.push(header);

        for label in row_labels {
            let mut row = vec![label.to_string()];
            row.resize(width + 1, String::new());
            rows.push(row);
        }
        self.table(rows)
    }

    pub fn build(self) -> Document {
        Document {
            document_id: Some(self.document_id),
            title: self.title,
            body: Body {
                content: self.content,
            },
        }
    }
}

fn paragraph_element(cursor: &mut usize, text: &str) -> StructuralElement {
    let mut content = text.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    let start = *cursor;
    *cursor += utf16_len(&content);
    StructuralElement {
        start_index: Some(start),
        end_index: Some(*cursor),
        paragraph: Some(Paragraph {
            elements: vec![ParagraphElement {
                start_index: Some(start),
                end_index: Some(*cursor),
                text_run: Some(TextRun { content }),
            }],
        }),
        ..Default::default()
    }
}
