use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{ByScenario, Money};
use crate::underwriting::assumptions::ResolvedInputs;
use crate::underwriting::financing::InvestmentSummary;
use crate::underwriting::scenarios::RevenueScenario;

const ONE_HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Net cash flow after operating costs and debt service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowScenario {
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
}

/// Average-case operating expenses, excluding debt service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub monthly_operating_expenses: Money,
    pub annual_operating_expenses: Money,
}

/// Cash flows for all three cases plus the expense breakdown behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowAnalysis {
    pub scenarios: ByScenario<CashFlowScenario>,
    /// Management fee plus fixed costs, before debt service
    pub operating_expenses: ByScenario<Money>,
    pub annual_debt_service: Money,
    /// Fixed costs common to every case (zero unless line items are set)
    pub other_annual_expenses: Money,
    pub average_case_expenses: ExpenseSummary,
}

/// Subtract management fees, fixed costs and debt service from each case's revenue.
///
/// No floor is applied; a case may run at a loss.
pub fn compute_cash_flows(
    revenue: &ByScenario<RevenueScenario>,
    summary: &InvestmentSummary,
    inputs: &ResolvedInputs,
) -> CashFlowAnalysis {
    let annual_debt_service = summary.annual_debt_service();
    let other_annual_expenses = inputs.annual_other_expenses();

    let operating_expenses = revenue.map(|_, scenario| {
        let management = scenario.annual_revenue * inputs.property_management_percent / ONE_HUNDRED;
        management + other_annual_expenses
    });

    let scenarios = revenue.map(|kind, scenario| {
        let annual_cash_flow =
            scenario.annual_revenue - *operating_expenses.get(kind) - annual_debt_service;
        CashFlowScenario {
            monthly_cash_flow: annual_cash_flow / MONTHS_PER_YEAR,
            annual_cash_flow,
        }
    });

    let average_annual = operating_expenses.average_case;
    let average_case_expenses = ExpenseSummary {
        monthly_operating_expenses: average_annual / MONTHS_PER_YEAR,
        annual_operating_expenses: average_annual,
    };

    CashFlowAnalysis {
        scenarios,
        operating_expenses,
        annual_debt_service,
        other_annual_expenses,
        average_case_expenses,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
