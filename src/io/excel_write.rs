use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::layout::DETAIL_FIELDS;
use crate::model::DetailRecord;

/// Sheet holding the reviewable copy of the submission data.
const SHEET_NAME: &str = "DegreeVerify";

/// Writes the review workbook for registrar inspection: one column per
/// reported detail field, one row per record.
pub fn write_workbook(path: &Path, records: &[DetailRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let columns: Vec<&str> = DETAIL_FIELDS
        .iter()
        .map(|field| field.name)
        .filter(|name| !name.starts_with("Filler"))
        .collect();

    for (col_idx, header) in columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, *header)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        for (col_idx, name) in columns.iter().enumerate() {
            let value = record.field(name).unwrap_or_default();
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, value)?;
        }
    }

    let mut table = rust_xlsxwriter::Table::new();
    table.set_autofilter(true);
    let col_end = (columns.len() as u16).saturating_sub(1);
    let row_end = if records.is_empty() {
        0
    } else {
        records.len() as u32
    };
    worksheet.add_table(0, 0, row_end, col_end, &table)?;

    workbook.save(path)?;
    Ok(())
}
