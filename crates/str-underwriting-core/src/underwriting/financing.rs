use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{Money, Rate};
use crate::underwriting::assumptions::ResolvedInputs;
use crate::UnderwritingResult;

const ONE_HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: u32 = 12;
const HIGH_LTV: Rate = dec!(0.80);

/// Upfront cash and loan terms, shared by every scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    /// Down payment plus closing, renovation and furniture costs
    pub total_investment: Money,
    pub down_payment: Money,
    pub loan_amount: Money,
    pub monthly_mortgage_payment: Money,
}

impl InvestmentSummary {
    pub fn annual_debt_service(&self) -> Money {
        self.monthly_mortgage_payment * Decimal::from(MONTHS_PER_YEAR)
    }
}

/// Convert purchase price and loan terms into upfront cash and a monthly payment.
pub fn compute_investment_summary(
    inputs: &ResolvedInputs,
    warnings: &mut Vec<String>,
) -> UnderwritingResult<InvestmentSummary> {
    if inputs.purchase_price <= Decimal::ZERO {
        return Err(UnderwritingError::validation(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    if inputs.down_payment_percent < Decimal::ZERO || inputs.down_payment_percent > ONE_HUNDRED {
        return Err(UnderwritingError::validation(
            "down_payment_percent",
            "Down payment percent must be between 0 and 100",
        ));
    }

    let down_payment = inputs
        .purchase_price
        .checked_mul(inputs.down_payment_percent)
        .ok_or_else(|| UnderwritingError::overflow("down payment"))?
        / ONE_HUNDRED;
    let loan_amount = inputs.purchase_price - down_payment;
    let total_investment = [
        inputs.closing_costs,
        inputs.renovation_costs,
        inputs.furniture_costs,
    ]
    .into_iter()
    .try_fold(down_payment, |acc, cost| acc.checked_add(cost))
    .ok_or_else(|| UnderwritingError::overflow("total investment"))?;

    let monthly_rate = inputs.loan_interest_rate / ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
    let total_months = inputs
        .loan_term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| UnderwritingError::overflow("loan term in months"))?;
    let monthly_mortgage_payment = compute_monthly_payment(loan_amount, monthly_rate, total_months)?;

    let ltv = loan_amount / inputs.purchase_price;
    if ltv > HIGH_LTV {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80%: high leverage",
            ltv * ONE_HUNDRED
        ));
    }

    tracing::debug!(
        %down_payment,
        %loan_amount,
        %monthly_mortgage_payment,
        "financing computed"
    );

    Ok(InvestmentSummary {
        total_investment,
        down_payment,
        loan_amount,
        monthly_mortgage_payment,
    })
}

/// Fixed-rate amortising payment: `P × r(1+r)^n / ((1+r)^n − 1)`.
///
/// A zero rate pays the principal off in equal instalments.
pub fn compute_monthly_payment(
    principal: Money,
    monthly_rate: Rate,
    total_months: u32,
) -> UnderwritingResult<Money> {
    if total_months == 0 {
        return Err(UnderwritingError::DivisionByZero {
            context: "monthly payment over zero months".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    // (1 + r)^n via iterative multiplication
    let growth = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        compound = compound
            .checked_mul(growth)
            .ok_or_else(|| UnderwritingError::overflow("mortgage compounding"))?;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(UnderwritingError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    // r(1+r)^n / ((1+r)^n - 1), then scaled by the principal
    let factor = monthly_rate
        .checked_mul(compound)
        .ok_or_else(|| UnderwritingError::overflow("mortgage payment"))?
        / denominator;
    principal
        .checked_mul(factor)
        .ok_or_else(|| UnderwritingError::overflow("mortgage payment"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
