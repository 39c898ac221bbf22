//! Calendar calculations for rent schedules and reporting windows.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

use crate::server::error::Error;

/// Due dates on `due_day` of every month falling within `[start, end]`.
///
/// `due_day` is expected to be within 1..=28 so that every month has it.
///
/// # Example
/// ```ignore
/// // Lease from 2026-01-15 to 2026-04-10, rent due on the 1st
/// let dates = rent_schedule(start, end, 1)?;
/// // dates == [2026-02-01, 2026-03-01, 2026-04-01]
/// ```
pub fn rent_schedule(
    start: NaiveDate,
    end: NaiveDate,
    due_day: u32,
) -> Result<Vec<NaiveDate>, Error> {
    let mut dates = Vec::new();
    if end < start {
        return Ok(dates);
    }

    let mut due = NaiveDate::from_ymd_opt(start.year(), start.month(), due_day).ok_or_else(|| {
        Error::ParseError(format!(
            "Invalid rent due day {} for {}-{:02}",
            due_day,
            start.year(),
            start.month()
        ))
    })?;
    if due < start {
        due = next_month(due)?;
    }

    while due <= end {
        dates.push(due);
        due = next_month(due)?;
    }

    Ok(dates)
}

fn next_month(date: NaiveDate) -> Result<NaiveDate, Error> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| Error::ParseError(format!("Date overflow after {}", date)))
}

/// Start of the month containing `date` and start of the following month.
pub fn month_bounds(date: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime), Error> {
    let first = date.with_day(1).ok_or_else(|| {
        Error::ParseError(format!("Failed to find first day of month for {}", date))
    })?;
    let next = next_month(first)?;

    Ok((first.and_time(Default::default()), next.and_time(Default::default())))
}
