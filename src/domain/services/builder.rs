use crate::domain::model::{ProgramDate, ProgramEntry, TypeTable};
use crate::domain::services::loader::ProgramRow;
use chrono::{Datelike, NaiveDate, Weekday};

/// Folds decoded rows into schedule entries, merging consecutive rows that
/// share a date.
pub struct ScheduleBuilder<'a> {
    types: &'a TypeTable,
    unit_count: usize,
    weekday_names: &'a [String],
}

#[derive(Debug, Default)]
struct FoldState {
    entries: Vec<ProgramEntry>,
    last_date: Option<ProgramDate>,
    last_month: Option<u32>,
    year: Option<i32>,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(types: &'a TypeTable, unit_count: usize, weekday_names: &'a [String]) -> Self {
        Self {
            types,
            unit_count,
            weekday_names,
        }
    }

    /// Returns the entries and the year of the first real date.
    pub fn build<I>(&self, rows: I) -> (Vec<ProgramEntry>, Option<i32>)
    where
        I: IntoIterator<Item = ProgramRow>,
    {
        let state = rows
            .into_iter()
            .fold(FoldState::default(), |state, row| self.step(state, row));
        (state.entries, state.year)
    }

    fn step(&self, mut state: FoldState, row: ProgramRow) -> FoldState {
        if state.last_date.as_ref() == Some(&row.date) {
            if let Some(entry) = state.entries.last_mut() {
                for (list, code) in entry.unit_activities.iter_mut().zip(&row.activities) {
                    list.push(self.types.resolve(code));
                }
            }
            return state;
        }

        let mut is_festive = row.festive;
        let mut end_of_month = row.end_of_month;
        let formatted_date = match &row.date {
            ProgramDate::Day(day) => {
                if day.weekday() == Weekday::Sun {
                    is_festive = true;
                }
                if state.last_month.is_some_and(|m| m != day.month()) {
                    end_of_month = true;
                }
                state.last_month = Some(day.month());
                if state.year.is_none() {
                    state.year = Some(day.year());
                }
                self.format_day(*day)
            }
            ProgramDate::Label(label) => label.clone(),
        };

        let mut unit_activities: Vec<Vec<_>> = row
            .activities
            .iter()
            .map(|code| vec![self.types.resolve(code)])
            .collect();
        unit_activities.resize_with(self.unit_count, Vec::new);

        state.entries.push(ProgramEntry {
            is_date: matches!(row.date, ProgramDate::Day(_)),
            date: row.date.clone(),
            formatted_date,
            is_festive,
            end_of_month,
            unit_activities,
            notes: row.notes,
        });
        state.last_date = Some(row.date);
        state
    }

    fn format_day(&self, day: NaiveDate) -> String {
        let index = day.weekday().num_days_from_monday() as usize;
        let name = self
            .weekday_names
            .get(index)
            .map(String::as_str)
            .unwrap_or_default();
        format!("{} {}", name, day.format("%d/%m"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{TypeEntry, DEFAULT_WEEKDAYS};

    fn weekdays() -> Vec<String> {
        DEFAULT_WEEKDAYS.iter().map(|d| d.to_string()).collect()
    }

    fn types() -> TypeTable {
        let mut table = TypeTable::new();
        table.insert(TypeEntry {
            code: "A".into(),
            description: "Activity A".into(),
            class_label: "Class1".into(),
        });
        table.insert(TypeEntry {
            code: "B".into(),
            description: "Activity B".into(),
            class_label: "Class2".into(),
        });
        table
    }

    fn day(y: i32, m: u32, d: u32) -> ProgramDate {
        ProgramDate::Day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn row(date: ProgramDate, codes: &[&str]) -> ProgramRow {
        ProgramRow {
            date,
            festive: false,
            end_of_month: false,
            activities: codes.iter().map(|c| c.to_string()).collect(),
            notes: String::new(),
        }
    }

    fn build(rows: Vec<ProgramRow>, units: usize) -> (Vec<ProgramEntry>, Option<i32>) {
        let types = types();
        let names = weekdays();
        ScheduleBuilder::new(&types, units, &names).build(rows)
    }

    #[test]
    fn test_consecutive_same_date_rows_merge() {
        let rows = vec![
            row(day(2024, 1, 13), &["A", "B"]),
            row(day(2024, 1, 13), &["B", ""]),
            row(day(2024, 1, 13), &["X", "A"]),
            row(day(2024, 1, 20), &["A", "A"]),
        ];
        let (entries, _) = build(rows, 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].unit_activities[0].len(), 3);
        assert_eq!(entries[0].unit_activities[1].len(), 3);
        assert_eq!(entries[1].unit_activities[0].len(), 1);
        assert_eq!(entries[0].unit_activities[0][1].description, "Activity B");
        assert_eq!(entries[0].unit_activities[0][2].description, "X");
        assert_eq!(entries[0].unit_activities[1][1].description, "");
    }

    #[test]
    fn test_same_date_after_gap_starts_new_entry() {
        let rows = vec![
            row(day(2024, 1, 13), &["A"]),
            row(ProgramDate::Label("Pausa".into()), &[""]),
            row(day(2024, 1, 13), &["B"]),
        ];
        let (entries, _) = build(rows, 1);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_unknown_codes_resolve_to_themselves() {
        let (entries, _) = build(vec![row(day(2024, 2, 6), &["ZZ"])], 1);
        let activity = &entries[0].unit_activities[0][0];
        assert_eq!(activity.description, "ZZ");
        assert_eq!(activity.class_label, "");
    }

    #[test]
    fn test_sunday_is_festive() {
        // 2024-01-14 is a Sunday, 2024-01-16 a Tuesday.
        let mut flagged = row(day(2024, 1, 23), &["A"]);
        flagged.festive = true;
        let rows = vec![
            row(day(2024, 1, 14), &["A"]),
            row(day(2024, 1, 16), &["A"]),
            flagged,
        ];
        let (entries, _) = build(rows, 1);
        assert!(entries[0].is_festive);
        assert!(!entries[1].is_festive);
        assert!(entries[2].is_festive);
        assert_eq!(entries[0].formatted_date, "Do 14/01");
        assert_eq!(entries[1].formatted_date, "Ma 16/01");
    }

    #[test]
    fn test_month_change_marks_end_of_month() {
        let rows = vec![
            row(day(2024, 1, 6), &["A"]),
            row(day(2024, 1, 20), &["A"]),
            row(day(2024, 2, 3), &["A"]),
        ];
        let (entries, _) = build(rows, 1);
        assert!(!entries[0].end_of_month);
        assert!(!entries[1].end_of_month);
        assert!(entries[2].end_of_month);
    }

    #[test]
    fn test_explicit_end_of_month_flag() {
        let mut first = row(day(2024, 1, 6), &["A"]);
        first.end_of_month = true;
        let (entries, _) = build(vec![first], 1);
        assert!(entries[0].end_of_month);
    }

    #[test]
    fn test_labels_do_not_touch_month_tracking() {
        let rows = vec![
            row(day(2024, 3, 30), &["A"]),
            row(ProgramDate::Label("Vacanze di Pasqua".into()), &[""]),
            row(day(2024, 3, 31), &["A"]),
            row(day(2024, 4, 6), &["A"]),
        ];
        let (entries, _) = build(rows, 1);
        assert_eq!(entries[1].formatted_date, "Vacanze di Pasqua");
        assert!(!entries[1].is_date);
        assert!(!entries[2].end_of_month);
        assert!(entries[3].end_of_month);
    }

    #[test]
    fn test_year_comes_from_first_date() {
        let rows = vec![
            row(ProgramDate::Label("Inizio".into()), &[""]),
            row(day(2024, 12, 21), &["A"]),
            row(day(2025, 1, 11), &["A"]),
        ];
        let (_, year) = build(rows, 1);
        assert_eq!(year, Some(2024));
    }

    #[test]
    fn test_no_dates_means_no_year() {
        let (entries, year) = build(vec![row(ProgramDate::Label("Solo testo".into()), &["A"])], 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(year, None);
    }
}
