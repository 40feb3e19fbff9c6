//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type: one calendar month of one
//! year, the unit that payroll is generated for.

use std::str::FromStr;

use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// A calendar month for which payroll is generated.
///
/// # Example
///
/// ```
/// use hr_system::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert_eq!(period.label(), "February 2024");
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 through 12.
    pub month: u32,
}

impl PayPeriod {
    /// Creates a pay period, rejecting out-of-range months and years.
    pub fn new(year: i32, month: u32) -> HrResult<Self> {
        let period = Self { year, month };
        period.validate()?;
        Ok(period)
    }

    /// Builds a pay period from a stored month name such as `"January"`.
    pub fn from_month_name(year: i32, name: &str) -> HrResult<Self> {
        let month = Month::from_str(name.trim()).map_err(|_| {
            HrError::validation("month", format!("unknown month name '{}'", name))
        })?;
        Self::new(year, month.number_from_month())
    }

    /// Checks that the month is 1..=12 and the year is representable.
    pub fn validate(&self) -> HrResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(HrError::validation(
                "month",
                format!("must be between 1 and 12, got {}", self.month),
            ));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, 1).is_none() {
            return Err(HrError::validation(
                "year",
                format!("{} is out of range", self.year),
            ));
        }
        Ok(())
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// The English name of the month, as stored in the payroll table.
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    /// A display label such as `"March 2025"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Returns true if the date falls within the month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Counts how many days of a span starting at `start` and lasting
    /// `days` days fall within this month.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_system::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let january = PayPeriod::new(2025, 1).unwrap();
    /// // 30 Jan .. 3 Feb: two days in January.
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
    /// assert_eq!(january.overlap_days(start, 5), 2);
    /// ```
    pub fn overlap_days(&self, start: NaiveDate, days: u32) -> u32 {
        if days == 0 {
            return 0;
        }
        let end = start
            .checked_add_signed(Duration::days(i64::from(days) - 1))
            .unwrap_or(NaiveDate::MAX);
        let from = start.max(self.first_day());
        let to = end.min(self.last_day());
        if from > to {
            return 0;
        }
        u32::try_from((to - from).num_days() + 1).unwrap_or(0)
    }
}
