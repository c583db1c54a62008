use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{ByScenario, CoverageRatio, Money, PaybackPeriod, Percent, Rate};
use crate::underwriting::assumptions::{PurchasePriceSource, ResolvedInputs};
use crate::underwriting::cash_flow::{CashFlowAnalysis, CashFlowScenario, ExpenseSummary};
use crate::underwriting::comparables::{MarketDataSource, MarketStats};
use crate::underwriting::financing::InvestmentSummary;
use crate::underwriting::metrics::MetricsResult;
use crate::underwriting::property::PropertyRecord;
use crate::underwriting::scenarios::RevenueScenario;
use crate::UnderwritingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The complete underwriting output for one subject property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingReport {
    pub subject_property: PropertyRecord,
    pub comparable_properties: Vec<PropertyRecord>,
    pub underwriting_analysis: UnderwritingAnalysis,
    /// Non-fatal conditions encountered along the way, in pipeline order
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingAnalysis {
    pub investment_summary: InvestmentSummary,
    pub revenue_scenarios: ByScenario<RevenueScenario>,
    pub expenses: ExpenseSummary,
    pub cash_flow_analysis: ByScenario<CashFlowScenario>,
    pub roi_analysis: RoiAnalysis,
    pub additional_metrics: AdditionalMetrics,
    pub assumptions: ReportAssumptions,
}

/// Flat per-case ROI and payback, keyed `<case>_roi_percent` / `<case>_payback_years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiAnalysis {
    pub best_case_roi_percent: Percent,
    pub average_case_roi_percent: Percent,
    pub worst_case_roi_percent: Percent,
    pub best_case_payback_years: PaybackPeriod,
    pub average_case_payback_years: PaybackPeriod,
    pub worst_case_payback_years: PaybackPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalMetrics {
    pub cap_rate_percent: Percent,
    pub cash_on_cash_return_percent: Percent,
    pub debt_service_coverage_ratio: CoverageRatio,
}

/// The inputs the numbers were computed from, after defaults were applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAssumptions {
    #[serde(flatten)]
    pub inputs: ResolvedInputs,
    pub purchase_price_source: PurchasePriceSource,
    pub market_data_source: MarketDataSource,
    pub comparables_used: usize,
    pub market_average_daily_rate: Money,
    pub baseline_occupancy_rate: Rate,
}

impl From<&MetricsResult> for RoiAnalysis {
    fn from(metrics: &MetricsResult) -> Self {
        let r = &metrics.returns;
        RoiAnalysis {
            best_case_roi_percent: r.best_case.roi_percent,
            average_case_roi_percent: r.average_case.roi_percent,
            worst_case_roi_percent: r.worst_case.roi_percent,
            best_case_payback_years: r.best_case.payback_years,
            average_case_payback_years: r.average_case.payback_years,
            worst_case_payback_years: r.worst_case.payback_years,
        }
    }
}

impl From<&MetricsResult> for AdditionalMetrics {
    fn from(metrics: &MetricsResult) -> Self {
        AdditionalMetrics {
            cap_rate_percent: metrics.cap_rate_percent,
            cash_on_cash_return_percent: metrics.cash_on_cash_return_percent,
            debt_service_coverage_ratio: metrics.debt_service_coverage_ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Collects pipeline outputs and arranges them into an [`UnderwritingReport`].
///
/// Only reshapes; every figure must already be computed. `build` fails with
/// [`UnderwritingError::MissingComponent`] rather than emitting a partial
/// report.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    subject: Option<PropertyRecord>,
    comparables: Option<Vec<PropertyRecord>>,
    inputs: Option<(ResolvedInputs, PurchasePriceSource)>,
    market: Option<MarketStats>,
    investment: Option<InvestmentSummary>,
    revenue: Option<ByScenario<RevenueScenario>>,
    cash_flows: Option<CashFlowAnalysis>,
    metrics: Option<MetricsResult>,
    warnings: Vec<String>,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: PropertyRecord) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn comparables(mut self, comparables: Vec<PropertyRecord>) -> Self {
        self.comparables = Some(comparables);
        self
    }

    pub fn inputs(mut self, inputs: ResolvedInputs, source: PurchasePriceSource) -> Self {
        self.inputs = Some((inputs, source));
        self
    }

    pub fn market(mut self, market: MarketStats) -> Self {
        self.market = Some(market);
        self
    }

    pub fn investment(mut self, summary: InvestmentSummary) -> Self {
        self.investment = Some(summary);
        self
    }

    pub fn revenue(mut self, revenue: ByScenario<RevenueScenario>) -> Self {
        self.revenue = Some(revenue);
        self
    }

    pub fn cash_flows(mut self, cash_flows: CashFlowAnalysis) -> Self {
        self.cash_flows = Some(cash_flows);
        self
    }

    pub fn metrics(mut self, metrics: MetricsResult) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn build(self) -> UnderwritingResult<UnderwritingReport> {
        let subject_property = self.subject.ok_or_else(|| missing("subject_property"))?;
        let comparable_properties = self
            .comparables
            .ok_or_else(|| missing("comparable_properties"))?;
        let (inputs, purchase_price_source) = self.inputs.ok_or_else(|| missing("inputs"))?;
        let market = self.market.ok_or_else(|| missing("market_stats"))?;
        let investment_summary = self
            .investment
            .ok_or_else(|| missing("investment_summary"))?;
        let revenue_scenarios = self.revenue.ok_or_else(|| missing("revenue_scenarios"))?;
        let cash_flows = self.cash_flows.ok_or_else(|| missing("cash_flow_analysis"))?;
        let metrics = self.metrics.ok_or_else(|| missing("metrics"))?;

        let assumptions = ReportAssumptions {
            inputs,
            purchase_price_source,
            market_data_source: market.source,
            comparables_used: market.comparables_used,
            market_average_daily_rate: market.average_daily_rate,
            baseline_occupancy_rate: market.baseline_occupancy,
        };

        Ok(UnderwritingReport {
            subject_property,
            comparable_properties,
            underwriting_analysis: UnderwritingAnalysis {
                investment_summary,
                revenue_scenarios,
                expenses: cash_flows.average_case_expenses,
                cash_flow_analysis: cash_flows.scenarios,
                roi_analysis: RoiAnalysis::from(&metrics),
                additional_metrics: AdditionalMetrics::from(&metrics),
                assumptions,
            },
            warnings: self.warnings,
        })
    }
}

fn missing(component: &str) -> UnderwritingError {
    UnderwritingError::MissingComponent {
        component: component.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
