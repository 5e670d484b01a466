//! Spreadsheet output for the holds report.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::{HoldsRow, REPORT_HEADERS};

pub const SHEET_NAME: &str = "Holds";

/// Write `rows` under the fixed header row to a single-sheet workbook at `path`.
pub fn write_holds_workbook(rows: &[HoldsRow], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, title) in REPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row32 = idx as u32 + 1;
        worksheet.write_string(row32, 0, &row.first_name)?;
        worksheet.write_string(row32, 1, &row.last_name)?;
        worksheet.write_number(row32, 2, row.hold_count as f64)?;
        worksheet.write_string(row32, 3, &row.holds)?;
    }

    worksheet.set_column_width(0, 16)?;
    worksheet.set_column_width(1, 16)?;
    worksheet.set_column_width(2, 16)?;
    worksheet.set_column_width(3, 60)?;
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}
