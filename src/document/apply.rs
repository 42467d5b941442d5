//! Applies edit requests to a snapshot with the store's offset semantics.
//!
//! - insert `L` units at `O`: every index `> O` moves by `L`
//! - delete `[s, e)`: indices `>= e` move back by `e - s`, indices inside clamp to `s`
//! - replace-all: each match is rewritten inside its run, later indices move by the length delta
//!
//! Matches never span runs.

use super::requests::EditRequest;
use super::text::{byte_offset_for_utf16, utf16_len};
use super::types::{Document, ParagraphElement, StructuralElement};
use super::DocumentError;

pub fn apply_request(doc: &mut Document, request: &EditRequest) -> Result<(), DocumentError> {
    match request {
        EditRequest::InsertText(insert) => insert_text(doc, insert.location.index, &insert.text),
        EditRequest::DeleteContentRange(delete) => {
            delete_range(doc, delete.range.start_index, delete.range.end_index)
        }
        EditRequest::ReplaceAllText(replace) => replace_all(
            doc,
            &replace.contains_text.text,
            replace.contains_text.match_case,
            &replace.replace_text,
        )
        .map(|_| ()),
    }
}

pub fn insert_text(doc: &mut Document, at: usize, text: &str) -> Result<(), DocumentError> {
    let inserted = utf16_len(text);
    if inserted == 0 {
        return Ok(());
    }

    {
        let mut runs = Vec::new();
        runs_mut(&mut doc.body.content, &mut runs);
        let target = runs
            .into_iter()
            .find(|pe| run_span(pe).is_some_and(|(s, e)| s <= at && at < e))
            .ok_or(DocumentError::OffsetOutsideText(at))?;

        let start = target.start_index.unwrap_or_default();
        let Some(run) = target.text_run.as_mut() else {
            return Err(DocumentError::OffsetOutsideText(at));
        };
        let byte = byte_offset_for_utf16(&run.content, at - start)
            .ok_or(DocumentError::SplitCharacter { offset: at })?;
        run.content.insert_str(byte, text);
    }

    shift_indices(&mut doc.body.content, |idx| {
        if idx > at {
            idx + inserted
        } else {
            idx
        }
    });
    Ok(())
}

pub fn delete_range(doc: &mut Document, start: usize, end: usize) -> Result<(), DocumentError> {
    if start >= end {
        return Err(DocumentError::InvalidRange { start, end });
    }

    {
        let mut runs = Vec::new();
        runs_mut(&mut doc.body.content, &mut runs);

        let covered: usize = runs
            .iter()
            .filter_map(|pe| run_span(pe))
            .map(|(s, e)| e.min(end).saturating_sub(s.max(start)))
            .sum();
        if covered != end - start {
            return Err(DocumentError::InvalidRange { start, end });
        }

        for pe in runs {
            let Some((run_start, run_end)) = run_span(pe) else {
                continue;
            };
            let from = run_start.max(start);
            let to = run_end.min(end);
            if from >= to {
                continue;
            }
            let Some(run) = pe.text_run.as_mut() else {
                continue;
            };
            let byte_from = byte_offset_for_utf16(&run.content, from - run_start)
                .ok_or(DocumentError::SplitCharacter { offset: from })?;
            let byte_to = byte_offset_for_utf16(&run.content, to - run_start)
                .ok_or(DocumentError::SplitCharacter { offset: to })?;
            run.content.replace_range(byte_from..byte_to, "");
        }
    }

    let removed = end - start;
    shift_indices(&mut doc.body.content, |idx| {
        if idx >= end {
            idx - removed
        } else if idx > start {
            start
        } else {
            idx
        }
    });
    Ok(())
}

/// Replace every occurrence of `search`; returns the number of replacements.
pub fn replace_all(
    doc: &mut Document,
    search: &str,
    match_case: bool,
    replacement: &str,
) -> Result<usize, DocumentError> {
    if search.is_empty() {
        return Err(DocumentError::EmptySearchText);
    }

    let old_len = utf16_len(search);
    let new_len = utf16_len(replacement);
    let mut cursor = 0;
    let mut count = 0;

    loop {
        let found = {
            let mut runs = Vec::new();
            runs_mut(&mut doc.body.content, &mut runs);
            runs.into_iter().find_map(|pe| {
                let (run_start, run_end) = run_span(pe)?;
                if run_end <= cursor {
                    return None;
                }
                let run = pe.text_run.as_mut()?;
                let skip = byte_offset_for_utf16(&run.content, cursor.saturating_sub(run_start))?;
                let hit = skip + find_match(&run.content[skip..], search, match_case)?;
                let at = run_start + utf16_len(&run.content[..hit]);
                let end = hit + search.len();
                run.content.replace_range(hit..end, replacement);
                Some(at)
            })
        };
        let Some(at) = found else {
            break;
        };

        let old_end = at + old_len;
        shift_indices(&mut doc.body.content, |idx| {
            if idx >= old_end {
                idx - old_len + new_len
            } else {
                idx
            }
        });
        cursor = at + new_len;
        count += 1;
    }

    Ok(count)
}

fn find_match(haystack: &str, needle: &str, match_case: bool) -> Option<usize> {
    if match_case {
        return haystack.find(needle);
    }
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        haystack
            .get(i..i + needle.len())
            .is_some_and(|slice| slice.eq_ignore_ascii_case(needle))
    })
}

/// `(start, end)` of a text run, computed from its content length.
fn run_span(pe: &ParagraphElement) -> Option<(usize, usize)> {
    let start = pe.start_index?;
    let run = pe.text_run.as_ref()?;
    Some((start, start + utf16_len(&run.content)))
}

fn runs_mut<'a>(elements: &'a mut [StructuralElement], out: &mut Vec<&'a mut ParagraphElement>) {
    for element in elements {
        if let Some(paragraph) = element.paragraph.as_mut() {
            for pe in &mut paragraph.elements {
                if pe.text_run.is_some() {
                    out.push(pe);
                }
            }
        }
        if let Some(table) = element.table.as_mut() {
            for row in &mut table.table_rows {
                for cell in &mut row.table_cells {
                    runs_mut(&mut cell.content, out);
                }
            }
        }
    }
}

fn shift_indices(elements: &mut [StructuralElement], shift: impl Fn(usize) -> usize + Copy) {
    let apply = |slot: &mut Option<usize>| {
        if let Some(idx) = slot.as_mut() {
            *idx = shift(*idx);
        }
    };
    for element in elements {
        apply(&mut element.start_index);
        apply(&mut element.end_index);
        if let Some(paragraph) = element.paragraph.as_mut() {
            for pe in &mut paragraph.elements {
                apply(&mut pe.start_index);
                apply(&mut pe.end_index);
            }
        }
        if let Some(table) = element.table.as_mut() {
            for row in &mut table.table_rows {
                apply(&mut row.start_index);
                apply(&mut row.end_index);
                for cell in &mut row.table_cells {
                    apply(&mut cell.start_index);
                    apply(&mut cell.end_index);
                    shift_indices(&mut cell.content, shift);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::builder::DocumentBuilder;
    use crate::document::types::Table;

    fn grid() -> Document {
        DocumentBuilder::new("d")
            .paragraph("Labs")
            .table([["Test", "{{LAB_ANCHOR}}", ""], ["hb", "", ""]])
            .paragraph("Advice: {{follow_up}}")
            .build()
    }

    fn cell_text(doc: &Document, row: usize, col: usize) -> String {
        doc.table_at(2).unwrap().cell(row, col).unwrap().text()
    }

    fn insertion_at(doc: &Document, row: usize, col: usize) -> usize {
        doc.table_at(2)
            .unwrap()
            .cell(row, col)
            .unwrap()
            .insertion_offset()
            .unwrap()
    }

    fn end_of(table: &Table, row: usize, col: usize) -> Option<usize> {
        table.cell(row, col).unwrap().end_offset()
    }

    #[test]
    fn insert_lands_before_cell_newline() {
        let mut doc = grid();
        let at = insertion_at(&doc, 1, 1);

        insert_text(&mut doc, at, "11.1").unwrap();

        assert_eq!(cell_text(&doc, 1, 1), "11.1\n");
        assert_eq!(cell_text(&doc, 1, 2), "\n");
    }

    #[test]
    fn insert_shifts_later_offsets_only() {
        let mut doc = grid();
        let before = doc.clone();
        let at = insertion_at(&before, 0, 2);

        insert_text(&mut doc, at, "abc").unwrap();

        let old = before.table_at(2).unwrap();
        let new = doc.table_at(2).unwrap();
        // earlier cells unchanged
        assert_eq!(end_of(new, 0, 1), end_of(old, 0, 1));
        // the edited cell grows, later cells move
        assert_eq!(end_of(new, 0, 2), end_of(old, 0, 2).map(|e| e + 3));
        let old_row_start = old.cell(1, 0).unwrap().start_index;
        assert_eq!(
            new.cell(1, 0).unwrap().start_index,
            old_row_start.map(|s| s + 3)
        );
        let old_tail_end = before.body.content[3].end_index;
        assert_eq!(doc.body.content[3].end_index, old_tail_end.map(|e| e + 3));
    }

    #[test]
    fn insert_outside_any_run_is_rejected() {
        let mut doc = grid();
        let table_start = doc.body.content[2].start_index.unwrap();
        assert_eq!(
            insert_text(&mut doc, table_start, "x"),
            Err(DocumentError::OffsetOutsideText(table_start))
        );
        assert_eq!(doc, grid());
    }

    #[test]
    fn delete_removes_text_and_pulls_offsets_back() {
        let mut doc = grid();
        let cell = doc.table_at(2).unwrap().cell(0, 1).unwrap().clone();
        let start = cell.content[0].start_index.unwrap();
        let end = start + "{{LAB_ANCHOR}}".len();
        let tail_before = doc.body.content[3].start_index.unwrap();

        delete_range(&mut doc, start, end).unwrap();

        assert_eq!(cell_text(&doc, 0, 1), "\n");
        assert_eq!(doc.body.content[3].start_index, Some(tail_before - 14));
    }

    #[test]
    fn delete_rejects_empty_and_uncovered_ranges() {
        let mut doc = grid();
        assert!(matches!(
            delete_range(&mut doc, 5, 5),
            Err(DocumentError::InvalidRange { .. })
        ));
        let table_start = doc.body.content[2].start_index.unwrap();
        assert!(matches!(
            delete_range(&mut doc, table_start, table_start + 3),
            Err(DocumentError::InvalidRange { .. })
        ));
    }

    #[test]
    fn replace_all_rewrites_every_match_and_shifts() {
        let mut doc = DocumentBuilder::new("d")
            .paragraph("{{x}} and {{x}}")
            .paragraph("tail {{X}}")
            .build();

        let count = replace_all(&mut doc, "{{x}}", true, "yes").unwrap();

        assert_eq!(count, 2);
        assert_eq!(doc.plain_text(), "yes and yes\ntail {{X}}\n");
        assert_eq!(doc.body.content[2].start_index, Some(13));
    }

    #[test]
    fn replace_all_case_insensitive_and_empty_replacement() {
        let mut doc = DocumentBuilder::new("d").paragraph("Tag TAG tag").build();
        let count = replace_all(&mut doc, "tag", false, "").unwrap();
        assert_eq!(count, 3);
        assert_eq!(doc.plain_text(), "  \n");
        assert_eq!(doc.body.content[1].end_index, Some(4));
    }

    #[test]
    fn replace_all_does_not_rematch_its_own_output() {
        let mut doc = DocumentBuilder::new("d").paragraph("a").build();
        assert_eq!(replace_all(&mut doc, "a", true, "aa").unwrap(), 1);
        assert_eq!(doc.plain_text(), "aa\n");
    }

    #[test]
    fn replace_all_rejects_empty_search() {
        let mut doc = grid();
        assert_eq!(
            replace_all(&mut doc, "", true, "x"),
            Err(DocumentError::EmptySearchText)
        );
    }

    #[test]
    fn apply_request_dispatches_each_kind() {
        let mut doc = grid();
        let replace = EditRequest::replace_all_text("{{follow_up}}", "OPD Monday");
        apply_request(&mut doc, &replace).unwrap();
        let insert = EditRequest::insert_text(insertion_at(&doc, 1, 2), "12");
        apply_request(&mut doc, &insert).unwrap();

        assert!(doc.plain_text().ends_with("Advice: OPD Monday\n"));
        assert_eq!(cell_text(&doc, 1, 2), "12\n");
    }
}
