//! Performance reviews, leave and attendance.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{HrError, HrResult};
use crate::models::{
    AttendanceInput, AttendanceRecord, AttendanceSummary, LeaveInput, LeaveRecord, PayPeriod,
    PerformanceInput, PerformanceReview,
};

use super::{HrStore, conflict_on_unique, parse_column};

#[derive(sqlx::FromRow)]
struct LeaveRow {
    leave_id: i64,
    emp_id: i64,
    leave_type: String,
    days: i64,
    date: NaiveDate,
}

impl TryFrom<LeaveRow> for LeaveRecord {
    type Error = HrError;

    fn try_from(row: LeaveRow) -> HrResult<Self> {
        Ok(LeaveRecord {
            leave_id: row.leave_id,
            emp_id: row.emp_id,
            leave_type: parse_column("leave_type", &row.leave_type)?,
            days: u32::try_from(row.days).unwrap_or(0),
            date: row.date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: i64,
    emp_id: i64,
    date: NaiveDate,
    status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = HrError;

    fn try_from(row: AttendanceRow) -> HrResult<Self> {
        Ok(AttendanceRecord {
            id: row.id,
            emp_id: row.emp_id,
            date: row.date,
            status: parse_column("status", &row.status)?,
        })
    }
}

impl HrStore {
    async fn delete_by_id(
        &self,
        table: &str,
        id_column: &str,
        entity: &'static str,
        id: i64,
    ) -> HrResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE {} = ?1", table, id_column))
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(HrError::not_found(entity, id));
        }
        info!(table, id, "Deleted record");
        Ok(())
    }

    /// Records a performance review.
    pub async fn add_performance(
        &self,
        emp_id: i64,
        input: PerformanceInput,
    ) -> HrResult<PerformanceReview> {
        input.validate()?;
        self.get_employee(emp_id).await?;

        let remarks = input.remarks.trim().to_string();
        let result = sqlx::query(
            "INSERT INTO performance (emp_id, rating, remarks, date) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(emp_id)
        .bind(input.rating)
        .bind(&remarks)
        .bind(input.date)
        .execute(self.pool())
        .await?;

        Ok(PerformanceReview {
            perf_id: result.last_insert_rowid(),
            emp_id,
            rating: input.rating,
            remarks,
            date: input.date,
        })
    }

    /// Lists an employee's reviews, newest first.
    pub async fn list_performance(&self, emp_id: i64) -> HrResult<Vec<PerformanceReview>> {
        let rows: Vec<(i64, i64, i64, String, NaiveDate)> = sqlx::query_as(
            "SELECT perf_id, emp_id, rating, remarks, date FROM performance WHERE emp_id = ?1 ORDER BY date DESC, perf_id DESC",
        )
        .bind(emp_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(perf_id, emp_id, rating, remarks, date)| PerformanceReview {
                perf_id,
                emp_id,
                rating,
                remarks,
                date,
            })
            .collect())
    }

    /// Deletes a performance review.
    pub async fn delete_performance(&self, perf_id: i64) -> HrResult<()> {
        self.delete_by_id("performance", "perf_id", "performance review", perf_id)
            .await
    }

    /// Records a leave.
    pub async fn add_leave(&self, emp_id: i64, input: LeaveInput) -> HrResult<LeaveRecord> {
        input.validate()?;
        self.get_employee(emp_id).await?;

        let result = sqlx::query(
            "INSERT INTO leaves (emp_id, leave_type, days, date) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(emp_id)
        .bind(input.leave_type.as_str())
        .bind(i64::from(input.days))
        .bind(input.date)
        .execute(self.pool())
        .await?;

        info!(emp_id, leave_type = %input.leave_type, days = input.days, "Recorded leave");
        Ok(LeaveRecord {
            leave_id: result.last_insert_rowid(),
            emp_id,
            leave_type: input.leave_type,
            days: input.days,
            date: input.date,
        })
    }

    /// Lists an employee's leaves, newest first.
    pub async fn list_leaves(&self, emp_id: i64) -> HrResult<Vec<LeaveRecord>> {
        sqlx::query_as::<_, LeaveRow>(
            "SELECT leave_id, emp_id, leave_type, days, date FROM leaves WHERE emp_id = ?1 ORDER BY date DESC, leave_id DESC",
        )
        .bind(emp_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(LeaveRecord::try_from)
        .collect()
    }

    /// Lists an employee's leaves that touch the given month.
    pub async fn leaves_in_period(
        &self,
        emp_id: i64,
        period: &PayPeriod,
    ) -> HrResult<Vec<LeaveRecord>> {
        Ok(self
            .list_leaves(emp_id)
            .await?
            .into_iter()
            .filter(|leave| leave.days_in(period) > 0)
            .collect())
    }

    /// Deletes a leave.
    pub async fn delete_leave(&self, leave_id: i64) -> HrResult<()> {
        self.delete_by_id("leaves", "leave_id", "leave", leave_id).await
    }

    /// Marks attendance for one day.
    ///
    /// Fails with `Conflict` if the day is already marked.
    pub async fn mark_attendance(
        &self,
        emp_id: i64,
        input: AttendanceInput,
    ) -> HrResult<AttendanceRecord> {
        self.get_employee(emp_id).await?;

        let result = sqlx::query(
            "INSERT INTO attendance (emp_id, date, status) VALUES (?1, ?2, ?3)",
        )
        .bind(emp_id)
        .bind(input.date)
        .bind(input.status.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!(
                    "attendance for employee {} on {} is already marked",
                    emp_id, input.date
                )
            })
        })?;

        Ok(AttendanceRecord {
            id: result.last_insert_rowid(),
            emp_id,
            date: input.date,
            status: input.status,
        })
    }

    /// Lists an employee's attendance, newest first.
    pub async fn list_attendance(&self, emp_id: i64) -> HrResult<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRow>(
            "SELECT id, emp_id, date, status FROM attendance WHERE emp_id = ?1 ORDER BY date DESC",
        )
        .bind(emp_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(AttendanceRecord::try_from)
        .collect()
    }

    /// Counts an employee's attendance statuses within a month.
    pub async fn attendance_summary(
        &self,
        emp_id: i64,
        period: &PayPeriod,
    ) -> HrResult<AttendanceSummary> {
        let records = self.list_attendance(emp_id).await?;
        Ok(AttendanceSummary::from_records(&records, period))
    }

    /// Deletes an attendance record.
    pub async fn delete_attendance(&self, id: i64) -> HrResult<()> {
        self.delete_by_id("attendance", "id", "attendance record", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, EmployeeInput, LeaveType};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (HrStore, i64) {
        let store = HrStore::in_memory().await.unwrap();
        let emp = store
            .create_employee(EmployeeInput {
                name: "Kiran".to_string(),
                department: "Support".to_string(),
                designation: "Agent".to_string(),
                basic_salary: Decimal::new(20000, 0),
            })
            .await
            .unwrap();
        (store, emp.emp_id)
    }

    #[tokio::test]
    async fn test_performance_round_trip_newest_first() {
        let (store, emp_id) = setup().await;
        for (rating, day) in [(3, 1), (5, 20)] {
            store
                .add_performance(
                    emp_id,
                    PerformanceInput {
                        rating,
                        remarks: format!("  review {} ", rating),
                        date: date(2025, 3, day),
                    },
                )
                .await
                .unwrap();
        }

        let reviews = store.list_performance(emp_id).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[1].remarks, "review 3");
    }

    #[tokio::test]
    async fn test_performance_rejects_bad_rating_and_unknown_employee() {
        let (store, emp_id) = setup().await;
        let bad = PerformanceInput {
            rating: 9,
            remarks: String::new(),
            date: date(2025, 3, 1),
        };
        assert!(matches!(
            store.add_performance(emp_id, bad.clone()).await,
            Err(HrError::Validation { .. })
        ));

        let good = PerformanceInput { rating: 4, ..bad };
        assert!(matches!(
            store.add_performance(emp_id + 100, good).await,
            Err(HrError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_leaves_in_period_filters_by_overlap() {
        let (store, emp_id) = setup().await;
        for (leave_type, days, d) in [
            (LeaveType::Unpaid, 3, date(2025, 2, 27)),
            (LeaveType::Sick, 1, date(2025, 3, 15)),
            (LeaveType::Earned, 2, date(2025, 4, 1)),
        ] {
            store
                .add_leave(emp_id, LeaveInput { leave_type, days, date: d })
                .await
                .unwrap();
        }

        let march = PayPeriod::new(2025, 3).unwrap();
        let leaves = store.leaves_in_period(emp_id, &march).await.unwrap();
        let types: Vec<_> = leaves.iter().map(|l| l.leave_type).collect();
        assert_eq!(types, vec![LeaveType::Sick, LeaveType::Unpaid]);
    }

    #[tokio::test]
    async fn test_attendance_double_marking_conflicts() {
        let (store, emp_id) = setup().await;
        let input = AttendanceInput {
            date: date(2025, 3, 3),
            status: AttendanceStatus::Present,
        };
        store.mark_attendance(emp_id, input.clone()).await.unwrap();

        let again = store
            .mark_attendance(
                emp_id,
                AttendanceInput {
                    status: AttendanceStatus::Absent,
                    ..input
                },
            )
            .await;
        assert!(matches!(again, Err(HrError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_attendance_summary_for_month() {
        let (store, emp_id) = setup().await;
        for (day, status) in [
            (date(2025, 3, 3), AttendanceStatus::Present),
            (date(2025, 3, 4), AttendanceStatus::HalfDay),
            (date(2025, 3, 5), AttendanceStatus::Absent),
            (date(2025, 4, 1), AttendanceStatus::Present),
        ] {
            store
                .mark_attendance(emp_id, AttendanceInput { date: day, status })
                .await
                .unwrap();
        }

        let summary = store
            .attendance_summary(emp_id, &PayPeriod::new(2025, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(summary.present, 1);
        assert_eq!(summary.half_day, 1);
        assert_eq!(summary.absent, 1);
    }

    #[tokio::test]
    async fn test_delete_records() {
        let (store, emp_id) = setup().await;
        let leave = store
            .add_leave(
                emp_id,
                LeaveInput {
                    leave_type: LeaveType::Casual,
                    days: 1,
                    date: date(2025, 3, 3),
                },
            )
            .await
            .unwrap();

        store.delete_leave(leave.leave_id).await.unwrap();
        assert!(store.list_leaves(emp_id).await.unwrap().is_empty());
        assert!(matches!(
            store.delete_leave(leave.leave_id).await,
            Err(HrError::NotFound { entity: "leave", .. })
        ));
        assert!(store.delete_attendance(1).await.is_err());
        assert!(store.delete_performance(1).await.is_err());
    }
}
