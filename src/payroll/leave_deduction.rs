//! Loss of pay for unpaid leave.
//!
//! Each unpaid leave day inside the pay month costs one day of basic
//! salary, where a day is `basic / days_in_month`. The deduction never
//! exceeds the basic salary.

use rust_decimal::Decimal;

use crate::error::HrResult;
use crate::models::{ComponentKind, LeaveRecord, PayComponent, PayPeriod};

use super::{overflow, round_currency};

/// The result of the unpaid leave deduction.
#[derive(Debug, Clone)]
pub struct LeaveDeductionResult {
    /// Unpaid leave days falling inside the period.
    pub unpaid_days: u32,
    /// The deduction amount, rounded to cents.
    pub amount: Decimal,
    /// The payslip line, absent when nothing is deducted.
    pub component: Option<PayComponent>,
}

/// Counts unpaid leave days of one employee inside a period.
pub fn unpaid_leave_days(emp_id: i64, leaves: &[LeaveRecord], period: &PayPeriod) -> u32 {
    leaves
        .iter()
        .filter(|l| l.emp_id == emp_id && l.leave_type.is_unpaid())
        .map(|l| l.days_in(period))
        .fold(0u32, u32::saturating_add)
}

/// Computes the unpaid leave deduction.
///
/// Overlapping leave records are counted as recorded; the cap at basic
/// salary bounds the effect of double entry.
///
/// # Examples
///
/// ```
/// use hr_system::models::{LeaveRecord, LeaveType, PayPeriod};
/// use hr_system::payroll::calculate_leave_deduction;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let leaves = vec![LeaveRecord {
///     leave_id: 1,
///     emp_id: 7,
///     leave_type: LeaveType::Unpaid,
///     days: 3,
///     date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
/// }];
/// let april = PayPeriod::new(2025, 4).unwrap();
/// let result = calculate_leave_deduction(7, Decimal::new(30000, 0), &leaves, &april).unwrap();
/// assert_eq!(result.unpaid_days, 3);
/// assert_eq!(result.amount, Decimal::new(300000, 2));
/// ```
pub fn calculate_leave_deduction(
    emp_id: i64,
    basic: Decimal,
    leaves: &[LeaveRecord],
    period: &PayPeriod,
) -> HrResult<LeaveDeductionResult> {
    let unpaid_days = unpaid_leave_days(emp_id, leaves, period);
    if unpaid_days == 0 || basic.is_zero() {
        return Ok(LeaveDeductionResult {
            unpaid_days,
            amount: Decimal::ZERO,
            component: None,
        });
    }

    let days_in_month = Decimal::from(period.days_in_month());
    let raw = basic
        .checked_mul(Decimal::from(unpaid_days))
        .and_then(|total| total.checked_div(days_in_month))
        .ok_or_else(|| overflow("unpaid leave deduction"))?;
    let amount = round_currency(raw).min(basic);

    Ok(LeaveDeductionResult {
        unpaid_days,
        amount,
        component: Some(PayComponent {
            kind: ComponentKind::Deduction,
            code: "unpaid_leave".to_string(),
            description: format!(
                "Unpaid leave ({} day{})",
                unpaid_days,
                if unpaid_days == 1 { "" } else { "s" }
            ),
            amount,
        }),
    })
}
