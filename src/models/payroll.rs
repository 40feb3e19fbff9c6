//! Payroll result models.
//!
//! This module contains the [`PayrollRecord`] type and the itemised
//! [`PayComponent`] breakdown that backs every payslip.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Adds to gross pay.
    Earning,
    /// Subtracted from gross pay.
    Deduction,
}

/// A single line of a payslip.
///
/// # Example
///
/// ```
/// use hr_system::models::{ComponentKind, PayComponent};
/// use rust_decimal::Decimal;
///
/// let hra = PayComponent {
///     kind: ComponentKind::Earning,
///     code: "hra".to_string(),
///     description: "House rent allowance (20% of basic)".to_string(),
///     amount: Decimal::new(600000, 2),
/// };
/// assert_eq!(hra.amount.to_string(), "6000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponent {
    /// Earning or deduction.
    pub kind: ComponentKind,
    /// Stable machine-readable code (e.g. "basic", "hra", "unpaid_leave").
    pub code: String,
    /// Human-readable description printed on the payslip.
    pub description: String,
    /// The amount, always non-negative.
    pub amount: Decimal,
}

/// Aggregated payroll figures for one employee and one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Monthly basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Other allowances.
    pub allowances: Decimal,
    /// All deductions, including unpaid leave.
    pub deductions: Decimal,
    /// Pay after deductions.
    pub net_pay: Decimal,
}

impl PayrollTotals {
    /// Basic plus HRA plus allowances.
    pub fn gross(&self) -> Decimal {
        self.basic + self.hra + self.allowances
    }
}

/// The outcome of a payroll calculation before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// The employee paid.
    pub emp_id: i64,
    /// The month paid.
    pub period: PayPeriod,
    /// Totals.
    pub totals: PayrollTotals,
    /// Unpaid leave days counted in the month.
    pub unpaid_leave_days: u32,
    /// Ordered breakdown: earnings first, then deductions.
    pub components: Vec<PayComponent>,
}

/// A generated and stored payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the payroll.
    pub payroll_id: i64,
    /// The employee paid.
    pub emp_id: i64,
    /// English month name (e.g. "January").
    pub month: String,
    /// The calendar year.
    pub year: i32,
    /// Totals.
    #[serde(flatten)]
    pub totals: PayrollTotals,
    /// The date the payroll was generated.
    pub generated_on: NaiveDate,
    /// Ordered breakdown: earnings first, then deductions.
    pub components: Vec<PayComponent>,
}

impl PayrollRecord {
    /// Earning components in payslip order.
    pub fn earnings(&self) -> impl Iterator<Item = &PayComponent> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Earning)
    }

    /// Deduction components in payslip order.
    pub fn deductions(&self) -> impl Iterator<Item = &PayComponent> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Deduction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn component(kind: ComponentKind, code: &str, amount: &str) -> PayComponent {
        PayComponent {
            kind,
            code: code.to_string(),
            description: code.to_string(),
            amount: dec(amount),
        }
    }

    fn record() -> PayrollRecord {
        PayrollRecord {
            payroll_id: 1,
            emp_id: 7,
            month: "March".to_string(),
            year: 2025,
            totals: PayrollTotals {
                basic: dec("30000.00"),
                hra: dec("6000.00"),
                allowances: dec("1500.00"),
                deductions: dec("2000.00"),
                net_pay: dec("35500.00"),
            },
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            components: vec![
                component(ComponentKind::Earning, "basic", "30000.00"),
                component(ComponentKind::Earning, "hra", "6000.00"),
                component(ComponentKind::Earning, "allowances", "1500.00"),
                component(ComponentKind::Deduction, "other", "2000.00"),
            ],
        }
    }

    #[test]
    fn test_gross_is_sum_of_earnings() {
        assert_eq!(record().totals.gross(), dec("37500.00"));
    }

    #[test]
    fn test_earnings_and_deductions_split() {
        let record = record();
        let earnings: Vec<_> = record.earnings().map(|c| c.code.as_str()).collect();
        let deductions: Vec<_> = record.deductions().map(|c| c.code.as_str()).collect();
        assert_eq!(earnings, vec!["basic", "hra", "allowances"]);
        assert_eq!(deductions, vec!["other"]);
    }

    #[test]
    fn test_record_serializes_totals_flat_and_amounts_as_strings() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["net_pay"], "35500.00");
        assert_eq!(json["basic"], "30000.00");
        assert_eq!(json["month"], "March");
        assert_eq!(json["components"][1]["kind"], "earning");
    }
}
