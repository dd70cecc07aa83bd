use crate::domain::model::{ProgramEntry, Schedule};
use crate::utils::error::Result;
use askama::Template;
use chrono::NaiveDateTime;

pub const LINE_BREAK: &str = "<br />";

/// Cell text is emitted as written in the workbook, so markup typed into a
/// note reaches the page untouched.
#[derive(Template)]
#[template(path = "program.html", escape = "none")]
pub struct ProgramPage<'a> {
    pub title: &'a str,
    /// Unit headings with newlines already turned into `<br />`.
    pub units: Vec<String>,
    pub entries: &'a [ProgramEntry],
    pub year: Option<i32>,
    pub generated_at: String,
}

mod filters {
    pub fn with_breaks<T: std::fmt::Display>(s: T) -> ::askama::Result<String> {
        Ok(super::with_line_breaks(&s.to_string()))
    }
}

pub fn with_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK)
}

impl<'a> ProgramPage<'a> {
    pub fn new(schedule: &'a Schedule, title: &'a str, generated_at: NaiveDateTime) -> Self {
        Self {
            title,
            units: schedule.units.iter().map(|u| with_line_breaks(u)).collect(),
            entries: &schedule.entries,
            year: schedule.year,
            generated_at: generated_at.format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}

pub fn render_program(schedule: &Schedule, title: &str, generated_at: NaiveDateTime) -> Result<String> {
    let page = ProgramPage::new(schedule, title, generated_at);
    let html = page.render()?;
    tracing::debug!(
        "Rendered {} entries for {} units ({} bytes)",
        schedule.entries.len(),
        schedule.units.len(),
        html.len()
    );
    Ok(html)
}
