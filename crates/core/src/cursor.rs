//! Day-based pagination over the search results.

use chrono::NaiveDate;

/// Page requested on `today`: days elapsed since `project_start`, plus one,
/// never below 1.
pub fn page_for(today: NaiveDate, project_start: NaiveDate) -> u32 {
    let day_number = (today - project_start).num_days() + 1;
    u32::try_from(day_number.max(1)).unwrap_or(u32::MAX)
}
