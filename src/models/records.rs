//! Performance, leave and attendance records.
//!
//! These are the per-employee records kept alongside payroll. Leave and
//! attendance also feed the payroll calculation and the payslip.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

use super::PayPeriod;

/// Lowest accepted performance rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted performance rating.
pub const MAX_RATING: i64 = 5;
/// Longest single leave, in calendar days.
pub const MAX_LEAVE_DAYS: u32 = 366;

/// A performance review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReview {
    /// Unique identifier for the review.
    pub perf_id: i64,
    /// The reviewed employee.
    pub emp_id: i64,
    /// Rating from 1 (lowest) to 5 (highest).
    pub rating: i64,
    /// Reviewer remarks.
    pub remarks: String,
    /// Date of the review.
    pub date: NaiveDate,
}

/// Payload for adding a performance review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceInput {
    /// Rating from 1 to 5.
    pub rating: i64,
    /// Reviewer remarks.
    #[serde(default)]
    pub remarks: String,
    /// Date of the review.
    pub date: NaiveDate,
}

impl PerformanceInput {
    /// Checks the rating range.
    pub fn validate(&self) -> HrResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(HrError::validation(
                "rating",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_RATING, MAX_RATING, self.rating
                ),
            ));
        }
        Ok(())
    }
}

/// The kind of leave taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Casual leave.
    Casual,
    /// Sick leave.
    Sick,
    /// Earned (annual) leave.
    Earned,
    /// Leave without pay; reduces payroll.
    Unpaid,
}

impl LeaveType {
    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Earned => "earned",
            LeaveType::Unpaid => "unpaid",
        }
    }

    /// Returns true if the leave is unpaid.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, LeaveType::Unpaid)
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "casual" => Ok(LeaveType::Casual),
            "sick" => Ok(LeaveType::Sick),
            "earned" => Ok(LeaveType::Earned),
            "unpaid" => Ok(LeaveType::Unpaid),
            other => Err(HrError::validation(
                "leave_type",
                format!("unknown leave type '{}'", other),
            )),
        }
    }
}

/// A leave taken by an employee, covering `date ..= date + days - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Unique identifier for the leave.
    pub leave_id: i64,
    /// The employee on leave.
    pub emp_id: i64,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// Number of calendar days.
    pub days: u32,
    /// First day of the leave.
    pub date: NaiveDate,
}

impl LeaveRecord {
    /// Days of this leave that fall within the given pay period.
    pub fn days_in(&self, period: &PayPeriod) -> u32 {
        period.overlap_days(self.date, self.days)
    }
}

/// Payload for recording a leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInput {
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// Number of calendar days, at least one.
    pub days: u32,
    /// First day of the leave.
    pub date: NaiveDate,
}

impl LeaveInput {
    /// Checks that the span is between one day and a year and ends on a
    /// representable date.
    pub fn validate(&self) -> HrResult<()> {
        if !(1..=MAX_LEAVE_DAYS).contains(&self.days) {
            return Err(HrError::validation(
                "days",
                format!("must be between 1 and {}, got {}", MAX_LEAVE_DAYS, self.days),
            ));
        }
        if self
            .date
            .checked_add_days(Days::new(u64::from(self.days - 1)))
            .is_none()
        {
            return Err(HrError::validation("date", "leave ends past the last supported date"));
        }
        Ok(())
    }
}

/// Attendance status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present for the full day.
    Present,
    /// Absent.
    Absent,
    /// Present for half the day.
    HalfDay,
    /// On approved leave.
    Leave,
}

impl AttendanceStatus {
    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Leave => "leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "half_day" => Ok(AttendanceStatus::HalfDay),
            "leave" => Ok(AttendanceStatus::Leave),
            other => Err(HrError::validation(
                "status",
                format!("unknown attendance status '{}'", other),
            )),
        }
    }
}

/// Attendance for one employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: i64,
    /// The employee.
    pub emp_id: i64,
    /// The day.
    pub date: NaiveDate,
    /// The status for that day.
    pub status: AttendanceStatus,
}

/// Payload for marking attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInput {
    /// The day.
    pub date: NaiveDate,
    /// The status for that day.
    pub status: AttendanceStatus,
}

/// Counts of attendance statuses within a pay period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days marked present.
    pub present: u32,
    /// Days marked absent.
    pub absent: u32,
    /// Days marked half day.
    pub half_day: u32,
    /// Days marked on leave.
    pub leave: u32,
}

impl AttendanceSummary {
    /// Tallies the records that fall within the period.
    pub fn from_records<'a, I>(records: I, period: &PayPeriod) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut summary = Self::default();
        for record in records
            .into_iter()
            .filter(|r| period.contains_date(r.date))
        {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::HalfDay => summary.half_day += 1,
                AttendanceStatus::Leave => summary.leave += 1,
            }
        }
        summary
    }

    /// Total number of marked days.
    pub fn total(&self) -> u32 {
        self.present + self.absent + self.half_day + self.leave
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attendance(id: i64, day: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id,
            emp_id: 1,
            date: day,
            status,
        }
    }

    #[test]
    fn test_rating_bounds() {
        let mut input = PerformanceInput {
            rating: 5,
            remarks: "Excellent".to_string(),
            date: date(2025, 3, 1),
        };
        assert!(input.validate().is_ok());
        input.rating = 0;
        assert!(input.validate().is_err());
        input.rating = 6;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_leave_type_parsing() {
        assert_eq!("Unpaid".parse::<LeaveType>().unwrap(), LeaveType::Unpaid);
        assert_eq!("sick".parse::<LeaveType>().unwrap(), LeaveType::Sick);
        assert!("vacation".parse::<LeaveType>().is_err());
    }

    #[test]
    fn test_leave_type_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveType::Earned).unwrap(),
            "\"earned\""
        );
        let parsed: LeaveType = serde_json::from_str("\"unpaid\"").unwrap();
        assert!(parsed.is_unpaid());
    }

    #[test]
    fn test_zero_day_leave_rejected() {
        let input = LeaveInput {
            leave_type: LeaveType::Casual,
            days: 0,
            date: date(2025, 3, 1),
        };
        assert!(matches!(input.validate(), Err(HrError::Validation { field, .. }) if field == "days"));
    }

    #[test]
    fn test_leave_longer_than_a_year_rejected() {
        let input = LeaveInput {
            leave_type: LeaveType::Casual,
            days: 4_000_000_000,
            date: date(2025, 3, 1),
        };
        assert!(matches!(input.validate(), Err(HrError::Validation { field, .. }) if field == "days"));

        let year = LeaveInput { days: MAX_LEAVE_DAYS, ..input };
        assert!(year.validate().is_ok());
    }

    #[test]
    fn test_leave_ending_past_max_date_rejected() {
        let input = LeaveInput {
            leave_type: LeaveType::Sick,
            days: 2,
            date: NaiveDate::MAX,
        };
        assert!(matches!(input.validate(), Err(HrError::Validation { field, .. }) if field == "date"));
    }

    #[test]
    fn test_leave_days_in_period() {
        let leave = LeaveRecord {
            leave_id: 1,
            emp_id: 1,
            leave_type: LeaveType::Unpaid,
            days: 3,
            date: date(2025, 4, 29),
        };
        assert_eq!(leave.days_in(&PayPeriod::new(2025, 4).unwrap()), 2);
        assert_eq!(leave.days_in(&PayPeriod::new(2025, 5).unwrap()), 1);
        assert_eq!(leave.days_in(&PayPeriod::new(2025, 6).unwrap()), 0);
    }

    #[test]
    fn test_attendance_status_parsing_variants() {
        assert_eq!(
            "Half Day".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            "half-day".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            "PRESENT".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn test_attendance_summary_counts_only_period() {
        let records = vec![
            attendance(1, date(2025, 3, 3), AttendanceStatus::Present),
            attendance(2, date(2025, 3, 4), AttendanceStatus::Present),
            attendance(3, date(2025, 3, 5), AttendanceStatus::Absent),
            attendance(4, date(2025, 3, 6), AttendanceStatus::HalfDay),
            attendance(5, date(2025, 4, 1), AttendanceStatus::Present),
        ];
        let summary = AttendanceSummary::from_records(&records, &PayPeriod::new(2025, 3).unwrap());
        assert_eq!(summary.present, 2);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.half_day, 1);
        assert_eq!(summary.leave, 0);
        assert_eq!(summary.total(), 4);
    }
}
