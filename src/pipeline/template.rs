//! Blank discharge templates, laid out the way the filler expects them.

use crate::document::{Document, DocumentBuilder};
use crate::profiles::{Department, PATIENT_NAME_KEY};

/// A blank template for `department`: the patient line, one grid per
/// profile grid with `date_columns` date columns, then one line per
/// defaulted placeholder.
pub fn build_template(department: Department, date_columns: usize) -> Document {
    let mut builder = DocumentBuilder::new(format!("template-{}", department.as_str()))
        .title(format!("Discharge Summary Template ({department})"))
        .paragraph("DISCHARGE SUMMARY")
        .paragraph(&format!("Patient: {PATIENT_NAME_KEY}"));

    for grid in department.grids() {
        builder = builder
            .paragraph(&grid.name.to_uppercase())
            .grid_table("Test", grid.anchor, grid.test_order, date_columns);
    }

    for (placeholder, _) in department.defaults() {
        builder = builder.paragraph(placeholder);
    }

    builder.build()
}
