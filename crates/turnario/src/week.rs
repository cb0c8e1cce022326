//! Monday-starting week arithmetic and column labels.

use chrono::{Datelike, Days, Local, NaiveDate, TimeDelta};

use crate::config::ColumnStyle;
use crate::error::WeekError;

/// Seven consecutive dates, Monday through Sunday
pub type Week = [NaiveDate; 7];

/// Source of "today". Injected so week math stays deterministic in tests.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Compute the week `offset_weeks` weeks away from the one containing `reference`.
///
/// The weekday is taken in the Sunday=0..Saturday=6 convention; Sunday belongs
/// to the week that started six days earlier.
pub fn compute_week(reference: NaiveDate, offset_weeks: i64) -> Result<Week, WeekError> {
    let weekday = reference.weekday().num_days_from_sunday() as i64;
    let to_monday = if weekday == 0 { -6 } else { 1 - weekday };

    let out_of_range = || WeekError::OutOfRange(offset_weeks);

    let shift = offset_weeks
        .checked_mul(7)
        .and_then(|days| days.checked_add(to_monday))
        .ok_or_else(out_of_range)?;
    let monday = TimeDelta::try_days(shift)
        .and_then(|delta| reference.checked_add_signed(delta))
        .ok_or_else(out_of_range)?;

    let mut week = [monday; 7];
    for (i, slot) in week.iter_mut().enumerate().skip(1) {
        *slot = monday
            .checked_add_days(Days::new(i as u64))
            .ok_or_else(out_of_range)?;
    }
    Ok(week)
}

/// Column label for a single day
pub fn day_label(date: NaiveDate, style: ColumnStyle) -> String {
    match style {
        ColumnStyle::Static => date.format("%A").to_string(),
        ColumnStyle::Dated => date.format("%A %d/%m").to_string(),
    }
}

/// Column labels for a whole week, Monday first
pub fn column_labels(week: &Week, style: ColumnStyle) -> Vec<String> {
    week.iter().map(|date| day_label(*date, style)).collect()
}

/// Header text shown above the grid
pub fn week_range_label(week: &Week) -> String {
    format!(
        "Week of {} – {}",
        week[0].format("%d/%m/%Y"),
        week[6].format("%d/%m/%Y")
    )
}
