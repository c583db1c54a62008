pub mod assumptions;
pub mod cash_flow;
pub mod comparables;
pub mod financing;
pub mod metrics;
pub mod property;
pub mod report;
pub mod scenarios;

use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::UnderwritingResult;

use assumptions::{
    check_stay_length, resolve_inputs, Assumptions, FinancialInputs, PurchasePriceSource,
};
use cash_flow::compute_cash_flows;
use comparables::{aggregate_comparables, MarketStats};
use financing::{compute_investment_summary, InvestmentSummary};
use metrics::compute_metrics;
use property::PropertyRecord;
use report::{ReportAssembler, UnderwritingReport};
use scenarios::generate_scenarios;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A subject listing, its comparables and the caller's deal terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingRequest {
    pub subject_property: PropertyRecord,
    #[serde(default)]
    pub comparable_properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub financial_inputs: FinancialInputs,
}

/// Financing terms on their own, without a market analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOutput {
    pub investment_summary: InvestmentSummary,
    pub annual_debt_service: Money,
    pub purchase_price_source: PurchasePriceSource,
    pub warnings: Vec<String>,
}

/// Market statistics for a comparable set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutput {
    pub market: MarketStats,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline and assemble a report.
///
/// Pure function of its arguments: the same request and assumptions always
/// produce the same report. Only invalid input is an error; thin market data
/// and degenerate ratios surface as warnings and sentinels.
#[tracing::instrument(skip_all, fields(comparables = request.comparable_properties.len()))]
pub fn underwrite(
    request: &UnderwritingRequest,
    assumptions: &Assumptions,
) -> UnderwritingResult<UnderwritingReport> {
    validate_request(request, assumptions)?;

    let mut warnings: Vec<String> = Vec::new();

    let (inputs, price_source) = resolve_inputs(
        &request.financial_inputs,
        &request.subject_property,
        assumptions,
        &mut warnings,
    )?;

    let market = aggregate_comparables(
        &request.subject_property,
        &request.comparable_properties,
        inputs.average_stay_length,
        assumptions,
        &mut warnings,
    );

    let investment = compute_investment_summary(&inputs, &mut warnings)?;
    let revenue = generate_scenarios(&market, &inputs);
    let cash_flows = compute_cash_flows(&revenue, &investment, &inputs);
    let metrics = compute_metrics(
        &investment,
        &revenue,
        &cash_flows,
        inputs.purchase_price,
        &mut warnings,
    )?;

    tracing::debug!(warnings = warnings.len(), "underwriting complete");

    ReportAssembler::new()
        .subject(request.subject_property.clone())
        .comparables(request.comparable_properties.clone())
        .inputs(inputs, price_source)
        .market(market)
        .investment(investment)
        .revenue(revenue)
        .cash_flows(cash_flows)
        .metrics(metrics)
        .warnings(warnings)
        .build()
}

/// Resolve deal terms and compute the investment summary alone.
///
/// Without a subject listing a missing purchase price falls straight to
/// `assumptions.fallback_purchase_price`.
pub fn summarize_financing(
    inputs: &FinancialInputs,
    assumptions: &Assumptions,
) -> UnderwritingResult<FinancingOutput> {
    assumptions.validate()?;

    let mut warnings = Vec::new();
    let (resolved, purchase_price_source) =
        resolve_inputs(inputs, &PropertyRecord::default(), assumptions, &mut warnings)?;
    let investment_summary = compute_investment_summary(&resolved, &mut warnings)?;

    Ok(FinancingOutput {
        annual_debt_service: investment_summary.annual_debt_service(),
        investment_summary,
        purchase_price_source,
        warnings,
    })
}

/// Aggregate the request's comparables into market statistics.
pub fn analyze_market(
    request: &UnderwritingRequest,
    assumptions: &Assumptions,
) -> UnderwritingResult<MarketOutput> {
    validate_request(request, assumptions)?;

    let stay_length = request
        .financial_inputs
        .average_stay_length
        .unwrap_or(assumptions.average_stay_length);
    check_stay_length(stay_length)?;

    let mut warnings = Vec::new();
    let market = aggregate_comparables(
        &request.subject_property,
        &request.comparable_properties,
        stay_length,
        assumptions,
        &mut warnings,
    );

    Ok(MarketOutput { market, warnings })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_request(
    request: &UnderwritingRequest,
    assumptions: &Assumptions,
) -> UnderwritingResult<()> {
    assumptions.validate()?;
    request.subject_property.validate("subject_property")?;
    for (i, comp) in request.comparable_properties.iter().enumerate() {
        comp.validate(&format!("comparable_properties[{i}]"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
