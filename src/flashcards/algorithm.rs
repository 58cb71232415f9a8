//! Review scheduling
//!
//! A fixed, stateless mapping from recall quality to the next interval:
//! the card's previous intervals are not consulted, so repeated "easy"
//! grades do not compound. Dates are calendar days in the reviewer's local
//! date so cards never become due halfway through a day.
//!
//! Quality ratings (0-3):
//! - 0: Again, not recalled
//! - 1: Hard, recalled with serious difficulty
//! - 2: Good, recalled after some hesitation
//! - 3: Easy, recalled instantly

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::{FlashcardError, Result};
use super::models::{Quality, ScheduleResult};

/// Interval in days for each quality rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalTable {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            again: 0,
            hard: 1,
            good: 3,
            easy: 7,
        }
    }
}

impl IntervalTable {
    /// Reject tables where a better grade would give a shorter interval
    pub fn validate(&self) -> Result<()> {
        let ordered = self.again <= self.hard && self.hard <= self.good && self.good <= self.easy;
        if !ordered {
            return Err(FlashcardError::InvalidIntervals(format!(
                "intervals must not decrease with quality (again {}, hard {}, good {}, easy {})",
                self.again, self.hard, self.good, self.easy
            )));
        }
        Ok(())
    }

    pub fn interval(&self, quality: Quality) -> u32 {
        match quality {
            Quality::Again => self.again,
            Quality::Hard => self.hard,
            Quality::Good => self.good,
            Quality::Easy => self.easy,
        }
    }
}

/// Calculate the next review with the default interval table
pub fn schedule(quality: Quality, today: NaiveDate) -> ScheduleResult {
    schedule_with(&IntervalTable::default(), quality, today)
}

/// Calculate the next review from an explicit interval table
pub fn schedule_with(table: &IntervalTable, quality: Quality, today: NaiveDate) -> ScheduleResult {
    let interval_days = table.interval(quality);
    let next_review_date = today
        .checked_add_days(Days::new(u64::from(interval_days)))
        .unwrap_or(NaiveDate::MAX);

    ScheduleResult {
        interval_days,
        next_review_date,
    }
}

/// Schedule relative to the reviewer's local date
pub fn schedule_today(table: &IntervalTable, quality: Quality) -> ScheduleResult {
    schedule_with(table, quality, Local::now().date_naive())
}

/// Intervals for each rating, used to label the grading buttons.
/// Returns intervals for: Again, Hard, Good, Easy
pub fn preview_intervals(table: &IntervalTable) -> [u32; 4] {
    Quality::ALL.map(|quality| table.interval(quality))
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "today".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_intervals() {
        let today = day(2026, 3, 10);
        assert_eq!(schedule(Quality::Again, today).interval_days, 0);
        assert_eq!(schedule(Quality::Again, today).next_review_date, today);
        assert_eq!(schedule(Quality::Hard, today).next_review_date, day(2026, 3, 11));
        assert_eq!(schedule(Quality::Good, today).next_review_date, day(2026, 3, 13));
        assert_eq!(schedule(Quality::Easy, today).next_review_date, day(2026, 3, 17));
    }

    #[test]
    fn test_intervals_are_monotonic() {
        let today = day(2026, 1, 1);
        let intervals: Vec<u32> = Quality::ALL
            .iter()
            .map(|q| schedule(*q, today).interval_days)
            .collect();
        assert!(intervals.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(IntervalTable::default().validate().is_ok());
    }

    #[test]
    fn test_calendar_arithmetic_crosses_month_and_year() {
        assert_eq!(schedule(Quality::Easy, day(2026, 12, 28)).next_review_date, day(2027, 1, 4));
        assert_eq!(schedule(Quality::Good, day(2028, 2, 27)).next_review_date, day(2028, 3, 1));
    }

    #[test]
    fn test_schedule_is_history_independent() {
        let today = day(2026, 5, 1);
        let first_easy = schedule(Quality::Easy, today);
        let again = schedule(Quality::Again, today);
        let second_easy = schedule(Quality::Easy, today);

        assert_eq!(first_easy, second_easy);
        assert_eq!(again, schedule(Quality::Again, today));
    }

    #[test]
    fn test_custom_table() {
        let table = IntervalTable {
            again: 1,
            hard: 2,
            good: 5,
            easy: 10,
        };
        assert!(table.validate().is_ok());
        assert_eq!(preview_intervals(&table), [1, 2, 5, 10]);
        assert_eq!(
            schedule_with(&table, Quality::Good, day(2026, 1, 1)).next_review_date,
            day(2026, 1, 6)
        );
    }

    #[test]
    fn test_decreasing_table_is_rejected() {
        let table = IntervalTable {
            good: 10,
            easy: 4,
            ..IntervalTable::default()
        };
        assert!(matches!(table.validate(), Err(FlashcardError::InvalidIntervals(_))));
    }

    #[test]
    fn test_far_future_saturates() {
        let table = IntervalTable {
            easy: u32::MAX,
            ..IntervalTable::default()
        };
        let result = schedule_with(&table, Quality::Easy, day(2026, 1, 1));
        assert_eq!(result.next_review_date, NaiveDate::MAX);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "today");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
