use crate::domain::model::{Quarter, Schedule};
use crate::utils::error::{ProgramError, Result};

/// Reporting period of the schedule, taken from its first dated entry.
pub fn quarter_of(schedule: &Schedule) -> Result<Quarter> {
    schedule
        .first_date()
        .map(Quarter::from_date)
        .ok_or(ProgramError::NoDatedEntryError)
}
