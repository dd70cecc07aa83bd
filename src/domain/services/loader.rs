use crate::domain::model::{CellValue, ProgramDate, RawWorkbook, Schedule, SheetLayout, TypeEntry, TypeTable};
use crate::domain::services::builder::ScheduleBuilder;

static EMPTY: CellValue = CellValue::Empty;

fn cell(row: &[CellValue], index: usize) -> &CellValue {
    row.get(index).unwrap_or(&EMPTY)
}

/// One data row of the program sheet, positionally decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRow {
    pub date: ProgramDate,
    pub festive: bool,
    pub end_of_month: bool,
    pub activities: Vec<String>,
    pub notes: String,
}

impl ProgramRow {
    /// Returns `None` for blank and `#` comment rows. Short rows are padded.
    pub fn from_cells(row: &[CellValue], first_unit_column: usize, unit_count: usize) -> Option<Self> {
        let first = cell(row, 0);
        if first.is_comment_or_blank() {
            return None;
        }

        let date = match first {
            CellValue::Date(d) => ProgramDate::Day(*d),
            other => ProgramDate::Label(other.to_text()),
        };

        let activities = (0..unit_count)
            .map(|i| cell(row, first_unit_column + i).to_text())
            .collect();

        Some(Self {
            date,
            festive: cell(row, 1).is_flag_set(),
            end_of_month: cell(row, 2).is_flag_set(),
            activities,
            notes: cell(row, first_unit_column + unit_count).to_text(),
        })
    }
}

/// Reads `(code, description, class)` rows after the header row.
pub fn load_types(rows: &[Vec<CellValue>]) -> TypeTable {
    let mut table = TypeTable::new();
    for row in rows.iter().skip(1) {
        let code = cell(row, 0).to_text();
        if code.is_empty() {
            continue;
        }
        table.insert(TypeEntry {
            code,
            description: cell(row, 1).to_text(),
            class_label: cell(row, 2).to_text(),
        });
    }
    table
}

/// Unit names from the header row, up to the notes column.
pub fn load_units(header: &[CellValue], layout: &SheetLayout) -> Vec<String> {
    let notes = layout.notes_header.to_lowercase();
    header
        .iter()
        .skip(layout.unit_column_offset)
        .map(CellValue::to_text)
        .take_while(|name| !name.is_empty() && name.to_lowercase() != notes)
        .collect()
}

pub fn load_schedule(workbook: &RawWorkbook, layout: &SheetLayout) -> Schedule {
    let types = load_types(&workbook.types);
    let units = workbook
        .program
        .first()
        .map(|header| load_units(header, layout))
        .unwrap_or_default();

    tracing::debug!("Loaded {} types and {} units", types.len(), units.len());

    let rows = workbook
        .program
        .iter()
        .skip(1)
        .filter_map(|row| ProgramRow::from_cells(row, layout.unit_column_offset, units.len()));

    let builder = ScheduleBuilder::new(&types, units.len(), &layout.weekday_names);
    let (entries, year) = builder.build(rows);

    Schedule {
        types,
        units,
        entries,
        year,
    }
}
