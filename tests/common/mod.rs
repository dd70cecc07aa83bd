#![allow(dead_code)]

use quarter_program::domain::ports::{CommandRunner, ToolInvocation};
use quarter_program::{ProgramError, Result};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A program sheet row: date, festive flag, end-of-month flag, one code per
/// unit and the notes.
pub struct Row<'a> {
    pub date: Option<(u16, u8, u8)>,
    pub label: &'a str,
    pub festive: bool,
    pub codes: &'a [&'a str],
    pub notes: &'a str,
}

impl<'a> Row<'a> {
    pub fn day(year: u16, month: u8, day: u8, codes: &'a [&'a str]) -> Self {
        Self {
            date: Some((year, month, day)),
            label: "",
            festive: false,
            codes,
            notes: "",
        }
    }

    pub fn label(label: &'a str, codes: &'a [&'a str]) -> Self {
        Self {
            date: None,
            label,
            festive: false,
            codes,
            notes: "",
        }
    }
}

/// Writes a planning workbook with the `Classi` and `Programma` sheets.
pub fn write_workbook(
    path: &Path,
    types: &[(&str, &str, &str)],
    units: &[&str],
    rows: &[Row],
) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    {
        let sheet = workbook.add_worksheet().set_name("Classi")?;
        sheet.write_string(0, 0, "Codice")?;
        sheet.write_string(0, 1, "Descrizione")?;
        sheet.write_string(0, 2, "Classe")?;
        for (i, (code, description, class)) in types.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *code)?;
            sheet.write_string(row, 1, *description)?;
            sheet.write_string(row, 2, *class)?;
        }
    }

    {
        let sheet = workbook.add_worksheet().set_name("Programma")?;
        sheet.write_string(0, 0, "Data")?;
        sheet.write_string(0, 1, "F")?;
        sheet.write_string(0, 2, "EOM")?;
        for (i, unit) in units.iter().enumerate() {
            sheet.write_string(0, 3 + i as u16, *unit)?;
        }
        let notes_col = 3 + units.len() as u16;
        sheet.write_string(0, notes_col, "Note")?;

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            match row.date {
                Some((y, m, d)) => {
                    let date = ExcelDateTime::from_ymd(y, m, d)?;
                    sheet.write_datetime_with_format(r, 0, &date, &date_format)?;
                }
                None => {
                    sheet.write_string(r, 0, row.label)?;
                }
            }
            if row.festive {
                sheet.write_number(r, 1, 1)?;
            }
            for (j, code) in row.codes.iter().enumerate() {
                if !code.is_empty() {
                    sheet.write_string(r, 3 + j as u16, *code)?;
                }
            }
            if !row.notes.is_empty() {
                sheet.write_string(r, notes_col, row.notes)?;
            }
        }
    }

    workbook.save(path)
}

/// Records invocations and writes the file each tool would have produced.
#[derive(Clone, Default)]
pub struct FakeRunner {
    pub calls: Arc<Mutex<Vec<ToolInvocation>>>,
    pub failing_tool: Option<String>,
}

impl FakeRunner {
    pub fn failing(tool: &str) -> Self {
        Self {
            failing_tool: Some(tool.to_string()),
            ..Self::default()
        }
    }

    pub fn tools(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.tool.clone())
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());
        if self.failing_tool.as_deref() == Some(invocation.tool.as_str()) {
            return Err(ProgramError::external_tool(&invocation.tool, "exit status: 1"));
        }
        let produced = match invocation.tool.as_str() {
            "pdf-converter" => &invocation.args[2],
            "pdf-duplicator" => &invocation.args[invocation.args.len() - 1],
            "archiver" => &invocation.args[1],
            _ => return Ok(()),
        };
        std::fs::write(invocation.working_dir.join(produced), b"%PDF-1.4 fake")?;
        Ok(())
    }
}
