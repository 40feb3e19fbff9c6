//! Payroll generation and history.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::PayrollRules;
use crate::error::{HrError, HrResult};
use crate::models::{PayPeriod, PayrollComputation, PayrollRecord, PayrollTotals};
use crate::payroll::{PayrollInput, calculate_payroll};

use super::{HrStore, conflict_on_unique, parse_amount};

#[derive(sqlx::FromRow)]
struct PayrollRow {
    payroll_id: i64,
    emp_id: i64,
    month: String,
    year: i32,
    basic: String,
    hra: String,
    allowances: String,
    deductions: String,
    net_pay: String,
    generated_on: NaiveDate,
    components: String,
}

impl TryFrom<PayrollRow> for PayrollRecord {
    type Error = HrError;

    fn try_from(row: PayrollRow) -> HrResult<Self> {
        let components = serde_json::from_str(&row.components).map_err(|e| {
            HrError::Database(sqlx::Error::ColumnDecode {
                index: "components".to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(PayrollRecord {
            payroll_id: row.payroll_id,
            emp_id: row.emp_id,
            month: row.month,
            year: row.year,
            totals: PayrollTotals {
                basic: parse_amount("basic", &row.basic)?,
                hra: parse_amount("hra", &row.hra)?,
                allowances: parse_amount("allowances", &row.allowances)?,
                deductions: parse_amount("deductions", &row.deductions)?,
                net_pay: parse_amount("net_pay", &row.net_pay)?,
            },
            generated_on: row.generated_on,
            components,
        })
    }
}

const PAYROLL_COLUMNS: &str = "payroll_id, emp_id, month, year, basic, hra, allowances, deductions, net_pay, generated_on, components";

/// A request to compute one month's payroll.
#[derive(Debug, Clone, Copy)]
pub struct PayrollRequest {
    /// The employee to pay.
    pub emp_id: i64,
    /// The month to pay.
    pub period: PayPeriod,
    /// Extra allowances.
    pub allowances: Decimal,
    /// Extra deductions.
    pub deductions: Decimal,
}

impl HrStore {
    /// Computes payroll from stored employee and leave data without saving it.
    pub async fn preview_payroll(
        &self,
        request: PayrollRequest,
        rules: &PayrollRules,
    ) -> HrResult<PayrollComputation> {
        request.period.validate()?;
        let employee = self.get_employee(request.emp_id).await?;
        let leaves = self.leaves_in_period(request.emp_id, &request.period).await?;

        calculate_payroll(
            &PayrollInput {
                employee: &employee,
                period: request.period,
                allowances: request.allowances,
                deductions: request.deductions,
                leaves: &leaves,
            },
            rules,
        )
    }

    /// Computes and stores payroll.
    ///
    /// Fails with `Conflict` if payroll for the employee and month exists.
    pub async fn generate_payroll(
        &self,
        request: PayrollRequest,
        rules: &PayrollRules,
    ) -> HrResult<PayrollRecord> {
        let computation = self.preview_payroll(request, rules).await?;
        self.insert_payroll(&computation, Utc::now().date_naive())
            .await
    }

    /// Stores a computed payroll.
    pub async fn insert_payroll(
        &self,
        computation: &PayrollComputation,
        generated_on: NaiveDate,
    ) -> HrResult<PayrollRecord> {
        let period = computation.period;
        let totals = &computation.totals;
        let components = serde_json::to_string(&computation.components).map_err(|e| {
            HrError::Calculation {
                message: format!("could not encode payroll breakdown: {}", e),
            }
        })?;

        let result = sqlx::query(
            "INSERT INTO payroll (emp_id, month, year, basic, hra, allowances, deductions, net_pay, generated_on, components) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(computation.emp_id)
        .bind(period.month_name())
        .bind(period.year)
        .bind(totals.basic.to_string())
        .bind(totals.hra.to_string())
        .bind(totals.allowances.to_string())
        .bind(totals.deductions.to_string())
        .bind(totals.net_pay.to_string())
        .bind(generated_on)
        .bind(&components)
        .execute(self.pool())
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!(
                    "payroll for employee {} in {} already exists",
                    computation.emp_id,
                    period.label()
                )
            })
        })?;

        let record = PayrollRecord {
            payroll_id: result.last_insert_rowid(),
            emp_id: computation.emp_id,
            month: period.month_name().to_string(),
            year: period.year,
            totals: totals.clone(),
            generated_on,
            components: computation.components.clone(),
        };
        info!(
            payroll_id = record.payroll_id,
            emp_id = record.emp_id,
            period = %period.label(),
            net_pay = %record.totals.net_pay,
            "Generated payroll"
        );
        Ok(record)
    }

    /// Fetches a payroll by id.
    pub async fn get_payroll(&self, payroll_id: i64) -> HrResult<PayrollRecord> {
        sqlx::query_as::<_, PayrollRow>(&format!(
            "SELECT {} FROM payroll WHERE payroll_id = ?1",
            PAYROLL_COLUMNS
        ))
        .bind(payroll_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| HrError::not_found("payroll", payroll_id))?
        .try_into()
    }

    /// Lists an employee's payroll history, newest period first.
    pub async fn list_payroll(&self, emp_id: i64) -> HrResult<Vec<PayrollRecord>> {
        let mut records = sqlx::query_as::<_, PayrollRow>(&format!(
            "SELECT {} FROM payroll WHERE emp_id = ?1",
            PAYROLL_COLUMNS
        ))
        .bind(emp_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(PayrollRecord::try_from)
        .collect::<HrResult<Vec<_>>>()?;

        // Month names do not sort chronologically in SQL.
        records.sort_by_key(|r| {
            let month = PayPeriod::from_month_name(r.year, &r.month)
                .map(|p| p.month)
                .unwrap_or(0);
            std::cmp::Reverse((r.year, month, r.payroll_id))
        });
        Ok(records)
    }

    /// Deletes a payroll.
    pub async fn delete_payroll(&self, payroll_id: i64) -> HrResult<()> {
        let result = sqlx::query("DELETE FROM payroll WHERE payroll_id = ?1")
            .bind(payroll_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(HrError::not_found("payroll", payroll_id));
        }
        info!(payroll_id, "Deleted payroll");
        Ok(())
    }
}
