//! Payroll calculation.
//!
//! This module turns an employee's basic salary, the configured
//! [`PayrollRules`] and the month's unpaid leave into a
//! [`PayrollComputation`]: totals plus an itemised breakdown.
//!
//! ```text
//! gross      = basic + hra + allowances
//! deductions = unpaid leave + other deductions
//! net_pay    = gross - deductions        (must not be negative)
//! ```
//!
//! All amounts are rounded to cents, half away from zero.

mod hra;
mod leave_deduction;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PayrollRules;
use crate::error::{HrError, HrResult};
use crate::models::{
    ComponentKind, Employee, LeaveRecord, PayComponent, PayPeriod, PayrollComputation,
    PayrollTotals,
};

pub use hra::{HraResult, calculate_hra};
pub use leave_deduction::{LeaveDeductionResult, calculate_leave_deduction, unpaid_leave_days};

/// Rounds an amount to cents, half away from zero, always keeping two
/// decimal places.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Everything needed to compute one month's payroll for one employee.
#[derive(Debug, Clone)]
pub struct PayrollInput<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The month being paid.
    pub period: PayPeriod,
    /// Extra allowances for the month.
    pub allowances: Decimal,
    /// Extra deductions for the month, on top of unpaid leave.
    pub deductions: Decimal,
    /// Leave records; only the employee's unpaid leave inside the period counts.
    pub leaves: &'a [LeaveRecord],
}

fn overflow(what: &str) -> HrError {
    HrError::Calculation {
        message: format!("{} is too large to compute", what),
    }
}

fn non_negative(field: &str, value: Decimal) -> HrResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(HrError::validation(field, "must not be negative"));
    }
    Ok(round_currency(value))
}

/// Computes payroll for one employee and one month.
///
/// # Errors
///
/// - `Validation` if the period is invalid or an input amount is negative.
/// - `Calculation` if deductions exceed gross pay or an amount overflows.
///
/// # Examples
///
/// ```
/// use hr_system::config::PayrollRules;
/// use hr_system::models::{Employee, PayPeriod};
/// use hr_system::payroll::{PayrollInput, calculate_payroll};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = Employee {
///     emp_id: 1,
///     name: "Asha Rao".to_string(),
///     department: "Finance".to_string(),
///     designation: "Accountant".to_string(),
///     basic_salary: Decimal::from_str("30000").unwrap(),
/// };
/// let input = PayrollInput {
///     employee: &employee,
///     period: PayPeriod::new(2025, 3).unwrap(),
///     allowances: Decimal::from_str("1500").unwrap(),
///     deductions: Decimal::from_str("2000").unwrap(),
///     leaves: &[],
/// };
/// let result = calculate_payroll(&input, &PayrollRules::default()).unwrap();
/// // 30000 + 6000 + 1500 - 2000
/// assert_eq!(result.totals.net_pay, Decimal::from_str("35500").unwrap());
/// ```
pub fn calculate_payroll(
    input: &PayrollInput<'_>,
    rules: &PayrollRules,
) -> HrResult<PayrollComputation> {
    input.period.validate()?;
    let basic = non_negative("basic_salary", input.employee.basic_salary)?;
    let allowances = non_negative("allowances", input.allowances)?;
    let other_deductions = non_negative("deductions", input.deductions)?;
    if rules.hra_rate < Decimal::ZERO {
        return Err(HrError::validation("hra_rate", "must not be negative"));
    }

    let mut components = vec![PayComponent {
        kind: ComponentKind::Earning,
        code: "basic".to_string(),
        description: "Basic salary".to_string(),
        amount: basic,
    }];

    let hra = calculate_hra(basic, rules.hra_rate)?;
    components.push(hra.component);

    if !allowances.is_zero() {
        components.push(PayComponent {
            kind: ComponentKind::Earning,
            code: "allowances".to_string(),
            description: "Other allowances".to_string(),
            amount: allowances,
        });
    }

    let leave = if rules.unpaid_leave_deduction {
        calculate_leave_deduction(input.employee.emp_id, basic, input.leaves, &input.period)?
    } else {
        LeaveDeductionResult {
            unpaid_days: unpaid_leave_days(input.employee.emp_id, input.leaves, &input.period),
            amount: Decimal::ZERO,
            component: None,
        }
    };
    components.extend(leave.component);

    if !other_deductions.is_zero() {
        components.push(PayComponent {
            kind: ComponentKind::Deduction,
            code: "other_deductions".to_string(),
            description: "Other deductions".to_string(),
            amount: other_deductions,
        });
    }

    let gross = basic
        .checked_add(hra.amount)
        .and_then(|sum| sum.checked_add(allowances))
        .ok_or_else(|| overflow("gross pay"))?;
    let deductions = leave
        .amount
        .checked_add(other_deductions)
        .ok_or_else(|| overflow("total deductions"))?;
    let net_pay = gross - deductions;
    if net_pay < Decimal::ZERO {
        return Err(HrError::Calculation {
            message: format!(
                "deductions {} exceed gross pay {} for employee {} in {}",
                deductions,
                gross,
                input.employee.emp_id,
                input.period.label()
            ),
        });
    }

    Ok(PayrollComputation {
        emp_id: input.employee.emp_id,
        period: input.period,
        totals: PayrollTotals {
            basic,
            hra: hra.amount,
            allowances,
            deductions,
            net_pay,
        },
        unpaid_leave_days: leave.unpaid_days,
        components,
    })
}
