use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{ByScenario, Money, Rate, ScenarioKind};
use crate::underwriting::assumptions::ResolvedInputs;
use crate::underwriting::comparables::MarketStats;

/// Best case books at a flat 85% regardless of market history.
pub const BEST_CASE_OCCUPANCY: Rate = dec!(0.85);
/// Best case prices 10% above market.
pub const BEST_CASE_RATE_FACTOR: Decimal = dec!(1.10);
/// Worst case books 70% of the average case's nights.
pub const WORST_CASE_OCCUPANCY_FACTOR: Decimal = dec!(0.70);
/// Worst case prices 15% below market.
pub const WORST_CASE_RATE_FACTOR: Decimal = dec!(0.85);

const NIGHTS_PER_YEAR: Decimal = dec!(365);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Occupancy, nightly rate and resulting gross revenue for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueScenario {
    pub scenario_name: String,
    pub annual_revenue: Money,
    pub monthly_revenue: Money,
    /// Share of the year booked, in [0, 1]
    pub occupancy_rate: Rate,
    #[serde(rename = "adr")]
    pub average_daily_rate: Money,
    /// Whole nights booked per year
    pub total_nights_booked: u32,
    /// Bookings per year at the average stay length
    pub estimated_stays: Decimal,
    /// Cleaning fees collected over those stays, reported apart from `annual_revenue`
    pub cleaning_revenue: Money,
}

/// Derive best, average and worst revenue from market statistics.
///
/// Annual revenue is `occupancy × 365 × rate` for every case. With
/// non-negative inputs the cases are ordered best ≥ average ≥ worst.
pub fn generate_scenarios(
    market: &MarketStats,
    inputs: &ResolvedInputs,
) -> ByScenario<RevenueScenario> {
    let market_rate = market.average_daily_rate;
    let average_occupancy =
        clip_unit(market.baseline_occupancy * (Decimal::ONE - inputs.vacancy_rate));

    let scenarios = ByScenario::from_fn(|kind| {
        let (occupancy, rate) = match kind {
            ScenarioKind::Best => (
                clip_unit(BEST_CASE_OCCUPANCY),
                market_rate * BEST_CASE_RATE_FACTOR,
            ),
            ScenarioKind::Average => (average_occupancy, market_rate),
            ScenarioKind::Worst => (
                clip_unit(average_occupancy * WORST_CASE_OCCUPANCY_FACTOR),
                market_rate * WORST_CASE_RATE_FACTOR,
            ),
        };
        build_scenario(
            kind,
            occupancy,
            rate,
            inputs.average_stay_length,
            market.average_cleaning_fee,
        )
    });

    tracing::debug!(
        best = %scenarios.best_case.annual_revenue,
        average = %scenarios.average_case.annual_revenue,
        worst = %scenarios.worst_case.annual_revenue,
        "revenue scenarios generated"
    );

    scenarios
}

fn build_scenario(
    kind: ScenarioKind,
    occupancy: Rate,
    rate: Money,
    average_stay_length: Decimal,
    cleaning_fee: Money,
) -> RevenueScenario {
    let annual_revenue = occupancy * NIGHTS_PER_YEAR * rate;
    let nights = (occupancy * NIGHTS_PER_YEAR).floor();
    let estimated_stays = if average_stay_length > Decimal::ZERO {
        nights / average_stay_length
    } else {
        Decimal::ZERO
    };

    RevenueScenario {
        scenario_name: kind.label().to_string(),
        annual_revenue,
        monthly_revenue: annual_revenue / MONTHS_PER_YEAR,
        occupancy_rate: occupancy,
        average_daily_rate: rate,
        total_nights_booked: nights.to_u32().unwrap_or(0),
        estimated_stays,
        cleaning_revenue: estimated_stays * cleaning_fee,
    }
}

fn clip_unit(value: Rate) -> Rate {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::underwriting::comparables::MarketDataSource;

    fn market(rate: Decimal, occupancy: Decimal) -> MarketStats {
        MarketStats {
            average_daily_rate: rate,
            average_review_count: dec!(50),
            baseline_occupancy: occupancy,
            comparables_used: 2,
            source: MarketDataSource::Comparables,
            average_cleaning_fee: dec!(60),
        }
    }

    fn inputs(vacancy: Decimal) -> ResolvedInputs {
        ResolvedInputs {
            purchase_price: dec!(500000),
            down_payment_percent: dec!(25),
            loan_interest_rate: dec!(6),
            loan_term_years: 30,
            closing_costs: Decimal::ZERO,
            renovation_costs: Decimal::ZERO,
            furniture_costs: Decimal::ZERO,
            property_tax_monthly: Decimal::ZERO,
            insurance_monthly: Decimal::ZERO,
            hoa_fees_monthly: Decimal::ZERO,
            utilities_monthly: Decimal::ZERO,
            internet_monthly: Decimal::ZERO,
            maintenance_monthly: Decimal::ZERO,
            property_management_percent: dec!(10),
            average_stay_length: dec!(3),
            vacancy_rate: vacancy,
        }
    }

    #[test]
    fn test_best_case_is_flat_occupancy_and_premium_rate() {
        let s = generate_scenarios(&market(dec!(150), dec!(0.60)), &inputs(dec!(0.15)));
        assert_eq!(s.best_case.occupancy_rate, dec!(0.85));
        assert_eq!(s.best_case.average_daily_rate, dec!(165));
        assert_eq!(s.best_case.scenario_name, "Best Case");
    }

    #[test]
    fn test_average_case_applies_vacancy() {
        let s = generate_scenarios(&market(dec!(150), dec!(0.80)), &inputs(dec!(0.15)));
        // 0.80 * 0.85 = 0.68
        assert_eq!(s.average_case.occupancy_rate, dec!(0.68));
        assert_eq!(s.average_case.average_daily_rate, dec!(150));
        // 0.68 * 365 * 150 = 37,230
        assert_eq!(s.average_case.annual_revenue, dec!(37230));
        assert_eq!(s.average_case.monthly_revenue, dec!(3102.5));
        assert_eq!(s.average_case.total_nights_booked, 248);
    }

    #[test]
    fn test_worst_case_discounts_average() {
        let s = generate_scenarios(&market(dec!(200), dec!(0.80)), &inputs(dec!(0.15)));
        assert_eq!(s.worst_case.occupancy_rate, dec!(0.68) * dec!(0.70));
        assert_eq!(s.worst_case.average_daily_rate, dec!(170));
    }

    #[test]
    fn test_revenue_ordering_holds_across_inputs() {
        for rate in [dec!(0), dec!(45), dec!(150), dec!(999)] {
            for occ in [dec!(0.30), dec!(0.55), dec!(0.85)] {
                for vacancy in [dec!(0), dec!(0.15), dec!(0.5), dec!(1)] {
                    let s = generate_scenarios(&market(rate, occ), &inputs(vacancy));
                    assert!(s.best_case.annual_revenue >= s.average_case.annual_revenue);
                    assert!(s.average_case.annual_revenue >= s.worst_case.annual_revenue);
                }
            }
        }
    }

    #[test]
    fn test_full_vacancy_zeroes_average_and_worst() {
        let s = generate_scenarios(&market(dec!(150), dec!(0.70)), &inputs(Decimal::ONE));
        assert_eq!(s.average_case.annual_revenue, Decimal::ZERO);
        assert_eq!(s.worst_case.annual_revenue, Decimal::ZERO);
        assert_eq!(s.worst_case.total_nights_booked, 0);
    }

    #[test]
    fn test_stays_follow_stay_length() {
        let s = generate_scenarios(&market(dec!(100), dec!(0.60)), &inputs(Decimal::ZERO));
        // 0.60 * 365 = 219 nights / 3 = 73 stays
        assert_eq!(s.average_case.total_nights_booked, 219);
        assert_eq!(s.average_case.estimated_stays, dec!(73));
    }

    #[test]
    fn test_cleaning_revenue_is_reported_apart_from_room_revenue() {
        let s = generate_scenarios(&market(dec!(100), dec!(0.60)), &inputs(Decimal::ZERO));
        // 73 stays * 60 fee
        assert_eq!(s.average_case.cleaning_revenue, dec!(4380));
        // 0.60 * 365 * 100, no cleaning fees folded in
        assert_eq!(s.average_case.annual_revenue, dec!(21900));

        let json = serde_json::to_value(&s.worst_case).unwrap();
        assert!(json.get("cleaning_revenue").is_some());
    }

    #[test]
    fn test_adr_serializes_under_short_key() {
        let s = generate_scenarios(&market(dec!(150), dec!(0.60)), &inputs(dec!(0.15)));
        let json = serde_json::to_value(&s.best_case).unwrap();
        assert!(json.get("adr").is_some());
        assert!(json.get("average_daily_rate").is_none());
    }
}
