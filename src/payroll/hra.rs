//! House rent allowance.

use rust_decimal::Decimal;

use crate::error::HrResult;
use crate::models::{ComponentKind, PayComponent};

use super::{overflow, round_currency};

/// The result of the HRA calculation.
#[derive(Debug, Clone)]
pub struct HraResult {
    /// The allowance amount, rounded to cents.
    pub amount: Decimal,
    /// The payslip line.
    pub component: PayComponent,
}

/// Computes HRA as a fraction of basic salary.
///
/// Fails with `Calculation` if the product does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use hr_system::payroll::calculate_hra;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_hra(Decimal::from_str("30000").unwrap(), Decimal::from_str("0.20").unwrap())
///     .unwrap();
/// assert_eq!(result.amount, Decimal::from_str("6000.00").unwrap());
/// assert_eq!(result.component.description, "House rent allowance (20% of basic)");
/// ```
pub fn calculate_hra(basic: Decimal, rate: Decimal) -> HrResult<HraResult> {
    let amount = round_currency(basic.checked_mul(rate).ok_or_else(|| overflow("HRA"))?);
    let percent = rate
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| overflow("HRA rate"))?
        .normalize();

    Ok(HraResult {
        amount,
        component: PayComponent {
            kind: ComponentKind::Earning,
            code: "hra".to_string(),
            description: format!("House rent allowance ({}% of basic)", percent),
            amount,
        },
    })
}
