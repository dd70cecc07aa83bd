use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single spreadsheet cell, detached from the spreadsheet library.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for codes, labels and notes.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
        }
    }

    /// Flag columns count as set only for the value `1`.
    pub fn is_flag_set(&self) -> bool {
        match self {
            CellValue::Number(n) => *n == 1.0,
            CellValue::Bool(b) => *b,
            _ => false,
        }
    }

    /// Blank rows and `#` comment rows carry no schedule data.
    pub fn is_comment_or_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => {
                let trimmed = s.trim_start();
                trimmed.is_empty() || trimmed.starts_with('#')
            }
            _ => false,
        }
    }
}

pub type SheetRows = Vec<Vec<CellValue>>;

/// The two worksheets the program is built from, as raw cells.
#[derive(Debug, Clone, Default)]
pub struct RawWorkbook {
    pub types: SheetRows,
    pub program: SheetRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub code: String,
    pub description: String,
    pub class_label: String,
}

impl TypeEntry {
    /// Stand-in for a code missing from the types sheet.
    pub fn unknown(code: &str) -> Self {
        Self {
            code: code.to_string(),
            description: code.to_string(),
            class_label: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    entries: HashMap<String, TypeEntry>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same code replace earlier ones.
    pub fn insert(&mut self, entry: TypeEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    pub fn get(&self, code: &str) -> Option<&TypeEntry> {
        self.entries.get(code)
    }

    pub fn resolve(&self, code: &str) -> TypeEntry {
        self.get(code)
            .cloned()
            .unwrap_or_else(|| TypeEntry::unknown(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramDate {
    Day(NaiveDate),
    Label(String),
}

impl ProgramDate {
    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            ProgramDate::Day(d) => Some(*d),
            ProgramDate::Label(_) => None,
        }
    }
}

impl fmt::Display for ProgramDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramDate::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            ProgramDate::Label(l) => f.write_str(l),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramEntry {
    pub date: ProgramDate,
    pub formatted_date: String,
    pub is_date: bool,
    pub is_festive: bool,
    pub end_of_month: bool,
    /// One list per unit, in unit order.
    pub unit_activities: Vec<Vec<TypeEntry>>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub types: TypeTable,
    pub units: Vec<String>,
    pub entries: Vec<ProgramEntry>,
    pub year: Option<i32>,
}

impl Schedule {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.iter().find_map(|e| e.date.as_day())
    }

    pub fn dated_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.is_date).count()
    }
}

/// Organization reporting period derived from the first dated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter {
    pub year: i32,
    pub bucket: QuarterBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterBucket {
    Q1,
    Q2,
    Q4,
}

impl QuarterBucket {
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => QuarterBucket::Q1,
            4..=8 => QuarterBucket::Q2,
            _ => QuarterBucket::Q4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuarterBucket::Q1 => "Q1",
            QuarterBucket::Q2 => "Q2",
            QuarterBucket::Q4 => "Q4",
        }
    }
}

impl Quarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            bucket: QuarterBucket::from_month(date.month()),
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.year, self.bucket.as_str())
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub const DEFAULT_WEEKDAYS: [&str; 7] = ["Lu", "Ma", "Me", "Gio", "Ve", "Sa", "Do"];

fn default_types_sheet() -> String {
    "Classi".to_string()
}

fn default_program_sheet() -> String {
    "Programma".to_string()
}

fn default_notes_header() -> String {
    "Note".to_string()
}

fn default_unit_column_offset() -> usize {
    3
}

fn default_weekday_names() -> Vec<String> {
    DEFAULT_WEEKDAYS.iter().map(|d| d.to_string()).collect()
}

/// Where things live inside the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    #[serde(default = "default_types_sheet")]
    pub types_sheet: String,
    #[serde(default = "default_program_sheet")]
    pub program_sheet: String,
    #[serde(default = "default_notes_header")]
    pub notes_header: String,
    #[serde(default = "default_unit_column_offset")]
    pub unit_column_offset: usize,
    /// Monday first.
    #[serde(default = "default_weekday_names")]
    pub weekday_names: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            types_sheet: default_types_sheet(),
            program_sheet: default_program_sheet(),
            notes_header: default_notes_header(),
            unit_column_offset: default_unit_column_offset(),
            weekday_names: default_weekday_names(),
        }
    }
}

fn default_pdf_scale() -> f32 {
    0.8
}

fn default_paper_format() -> String {
    "A4".to_string()
}

fn default_true() -> bool {
    true
}

/// Layout options handed to the HTML to PDF converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfOptions {
    #[serde(default = "default_pdf_scale")]
    pub scale: f32,
    #[serde(default = "default_paper_format")]
    pub paper_format: String,
    #[serde(default = "default_true")]
    pub print_background: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            scale: default_pdf_scale(),
            paper_format: default_paper_format(),
            print_background: true,
        }
    }
}

fn default_converter() -> String {
    "puppeteer-pdf".to_string()
}

fn default_duplicator() -> String {
    "pdftk".to_string()
}

fn default_archiver() -> String {
    "7z".to_string()
}

/// Executable names of the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommands {
    #[serde(default = "default_converter")]
    pub converter: String,
    #[serde(default = "default_duplicator")]
    pub duplicator: String,
    #[serde(default = "default_archiver")]
    pub archiver: String,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            converter: default_converter(),
            duplicator: default_duplicator(),
            archiver: default_archiver(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// External `7z` binary.
    #[default]
    SevenZip,
    /// In-process zip archive.
    Zip,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::SevenZip => "7z",
            ArchiveFormat::Zip => "zip",
        }
    }
}

impl std::str::FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sevenzip" | "7z" => Ok(ArchiveFormat::SevenZip),
            "zip" => Ok(ArchiveFormat::Zip),
            other => Err(format!("unknown archive format '{}', expected sevenzip or zip", other)),
        }
    }
}

/// Files produced by a run, relative to the output root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputReport {
    pub quarter: String,
    pub directory: String,
    pub html: String,
    pub pdf: Option<String>,
    pub archive: Option<String>,
    pub workbook_copy: String,
}
