//! Spreadsheet access through `calamine`.
//!
//! Worksheets are flattened into rows of [`CellValue`] addressed from cell
//! `A1`, so column positions match what the user sees in the spreadsheet even
//! when the used range starts further down or right.

use crate::domain::model::{CellValue, RawWorkbook, Schedule, SheetLayout, SheetRows};
use crate::domain::services::load_schedule;
use crate::utils::error::{ProgramError, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn read_workbook(path: &Path, layout: &SheetLayout) -> Result<RawWorkbook> {
    tracing::debug!("Opening workbook {}", path.display());
    let mut workbook = open_workbook_auto(path)?;

    let types = read_sheet(&mut workbook, &layout.types_sheet)?;
    let program = read_sheet(&mut workbook, &layout.program_sheet)?;

    tracing::debug!(
        "Read {} type rows and {} program rows",
        types.len(),
        program.len()
    );
    Ok(RawWorkbook { types, program })
}

/// Reads the workbook and builds the schedule in one go.
pub fn load_schedule_from(path: &Path, layout: &SheetLayout) -> Result<Schedule> {
    let raw = read_workbook(path, layout)?;
    Ok(load_schedule(&raw, layout))
}

fn read_sheet(workbook: &mut Sheets<BufReader<File>>, name: &str) -> Result<SheetRows> {
    if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
        return Err(ProgramError::MissingSheetError {
            name: name.to_string(),
        });
    }

    let range = workbook.worksheet_range(name)?;
    Ok(range_to_rows(&range))
}

pub fn range_to_rows(range: &Range<Data>) -> SheetRows {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| range.get_value((row, col)).map_or(CellValue::Empty, to_cell))
                .collect()
        })
        .collect()
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_date()
            .map_or_else(|| CellValue::Text(data.to_string()), CellValue::Date),
        other => CellValue::Text(other.to_string()),
    }
}
