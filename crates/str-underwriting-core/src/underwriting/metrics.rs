use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{ByScenario, CoverageRatio, Money, PaybackPeriod, Percent};
use crate::underwriting::cash_flow::{CashFlowAnalysis, CashFlowScenario};
use crate::underwriting::financing::InvestmentSummary;
use crate::underwriting::scenarios::RevenueScenario;
use crate::UnderwritingResult;

const ONE_HUNDRED: Decimal = dec!(100);
const MIN_COMFORTABLE_DSCR: Decimal = dec!(1.2);

/// Return on cash invested for a single case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReturns {
    pub roi_percent: Percent,
    pub payback_years: PaybackPeriod,
}

/// Per-case returns plus average-case property metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub returns: ByScenario<ScenarioReturns>,
    /// Average-case NOI over purchase price
    pub cap_rate_percent: Percent,
    /// Average-case cash flow over total investment
    pub cash_on_cash_return_percent: Percent,
    /// Average-case NOI over annual debt service; undefined without a loan
    pub debt_service_coverage_ratio: CoverageRatio,
    /// Average-case revenue less operating expenses, before debt service
    pub net_operating_income: Money,
}

/// Compute ROI, payback, cap rate, cash-on-cash and DSCR.
///
/// A zero denominator yields a sentinel or zero (with a warning) so the
/// remaining metrics are still reported. Only a quotient too large for
/// `Decimal` is an error.
pub fn compute_metrics(
    summary: &InvestmentSummary,
    revenue: &ByScenario<RevenueScenario>,
    cash_flows: &CashFlowAnalysis,
    purchase_price: Money,
    warnings: &mut Vec<String>,
) -> UnderwritingResult<MetricsResult> {
    let total_investment = summary.total_investment;

    if total_investment <= Decimal::ZERO {
        warnings.push(
            "Total investment is zero; ROI and cash-on-cash return are reported as 0".into(),
        );
    }

    let returns_for = |flow: &CashFlowScenario| -> UnderwritingResult<ScenarioReturns> {
        Ok(ScenarioReturns {
            roi_percent: percent_of(flow.annual_cash_flow, total_investment, "ROI")?,
            payback_years: payback_period(total_investment, flow.annual_cash_flow)?,
        })
    };
    let flows = &cash_flows.scenarios;
    let returns = ByScenario {
        best_case: returns_for(&flows.best_case)?,
        average_case: returns_for(&flows.average_case)?,
        worst_case: returns_for(&flows.worst_case)?,
    };

    let net_operating_income =
        revenue.average_case.annual_revenue - cash_flows.operating_expenses.average_case;

    let cap_rate_percent = percent_of(net_operating_income, purchase_price, "cap rate")?;

    let average_cash_flow = cash_flows.scenarios.average_case.annual_cash_flow;
    let cash_on_cash_return_percent =
        percent_of(average_cash_flow, total_investment, "cash-on-cash return")?;

    let debt_service_coverage_ratio = if cash_flows.annual_debt_service.is_zero() {
        CoverageRatio::Undefined
    } else {
        CoverageRatio::Ratio(
            net_operating_income
                .checked_div(cash_flows.annual_debt_service)
                .ok_or_else(|| UnderwritingError::overflow("debt service coverage ratio"))?,
        )
    };

    // --- Warnings ---
    if let CoverageRatio::Ratio(dscr) = debt_service_coverage_ratio {
        if dscr < MIN_COMFORTABLE_DSCR {
            warnings.push(format!(
                "DSCR of {dscr:.2} is below 1.20x: lender covenant risk"
            ));
        }
    }

    if average_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Average case cash flow is negative ({average_cash_flow:.2} per year)"
        ));
    }

    tracing::debug!(
        %cap_rate_percent,
        %cash_on_cash_return_percent,
        %net_operating_income,
        "investment metrics computed"
    );

    Ok(MetricsResult {
        returns,
        cap_rate_percent,
        cash_on_cash_return_percent,
        debt_service_coverage_ratio,
        net_operating_income,
    })
}

/// Years to recover `total_investment`; `Never` unless cash flow is positive.
pub fn payback_period(
    total_investment: Money,
    annual_cash_flow: Money,
) -> UnderwritingResult<PaybackPeriod> {
    if annual_cash_flow <= Decimal::ZERO {
        return Ok(PaybackPeriod::Never);
    }
    total_investment
        .checked_div(annual_cash_flow)
        .map(PaybackPeriod::Years)
        .ok_or_else(|| UnderwritingError::overflow("payback period"))
}

fn percent_of(numerator: Money, denominator: Money, context: &str) -> UnderwritingResult<Percent> {
    if denominator <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
        .ok_or_else(|| UnderwritingError::overflow(context))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
