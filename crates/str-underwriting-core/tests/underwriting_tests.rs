use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use str_underwriting_core::underwriting::assumptions::{Assumptions, PurchasePriceSource};
use str_underwriting_core::underwriting::comparables::MarketDataSource;
use str_underwriting_core::{underwrite, PaybackPeriod, UnderwritingError, UnderwritingRequest};

fn request(financial_inputs: Value) -> UnderwritingRequest {
    serde_json::from_value(json!({
        "subject_property": {
            "listing_url": "https://www.airbnb.com/rooms/123",
            "listing_id": "123",
            "title": "Test Subject Property",
            "price_per_night": 150.0,
            "currency": "USD",
            "description": "A nice place.",
            "guest_capacity": 4,
            "num_bedrooms": 2,
            "num_bathrooms": 1.5,
            "average_rating": 4.5,
            "num_reviews": 100,
            "amenities": ["Wifi", "Kitchen"],
            "address_neighborhood": "Test City, CA",
            "cleaning_fee": 60.0
        },
        "comparable_properties": [
            {
                "listing_id": "comp1",
                "price_per_night": 140.0,
                "num_bedrooms": 2,
                "num_bathrooms": 1.0,
                "num_reviews": 80,
                "average_rating": 4.4,
                "cleaning_fee": 50.0,
                "availability_365": 300
            },
            {
                "listing_id": "comp2",
                "price_per_night": 160.0,
                "num_bedrooms": 2,
                "num_bathrooms": 2.0,
                "num_reviews": 120,
                "average_rating": 4.6,
                "cleaning_fee": 70.0,
                "availability_365": 320
            }
        ],
        "financial_inputs": financial_inputs
    }))
    .unwrap()
}

fn base_inputs() -> Value {
    json!({
        "purchase_price": 300000.0,
        "down_payment_percent": 20.0,
        "loan_interest_rate": 6.0,
        "loan_term_years": 30,
        "closing_costs": 5000.0,
        "renovation_costs": 10000.0,
        "furniture_costs": 15000.0,
        "property_tax_monthly": 300.0,
        "insurance_monthly": 100.0,
        "hoa_fees_monthly": 0.0,
        "utilities_monthly": 150.0,
        "internet_monthly": 60.0,
        "maintenance_monthly": 100.0,
        "property_management_percent": 10.0,
        "average_stay_length": 3.0,
        "vacancy_rate": 0.10
    })
}

fn with(mut inputs: Value, key: &str, value: Value) -> Value {
    inputs[key] = value;
    inputs
}

// ===========================================================================
// Financing
// ===========================================================================

#[test]
fn test_basic_deal_financing() {
    let report = underwrite(&request(base_inputs()), &Assumptions::default()).unwrap();
    let summary = &report.underwriting_analysis.investment_summary;

    assert_eq!(summary.down_payment, dec!(60000));
    assert_eq!(summary.loan_amount, dec!(240000));
    // 60,000 down + 5,000 closing + 10,000 renovation + 15,000 furniture
    assert_eq!(summary.total_investment, dec!(90000));
    assert!(
        (summary.monthly_mortgage_payment - dec!(1438.92)).abs() < dec!(0.01),
        "Expected ~1438.92/month, got {}",
        summary.monthly_mortgage_payment
    );
}

#[test]
fn test_zero_rate_loan_is_straight_line() {
    let inputs = with(base_inputs(), "loan_interest_rate", json!(0));
    let report = underwrite(&request(inputs), &Assumptions::default()).unwrap();
    assert_eq!(
        report.underwriting_analysis.investment_summary.monthly_mortgage_payment,
        dec!(240000) / dec!(360)
    );
}

// ===========================================================================
// Purchase price resolution
// ===========================================================================

#[test]
fn test_missing_price_is_estimated_from_listing() {
    let mut inputs = base_inputs();
    inputs.as_object_mut().unwrap().remove("purchase_price");
    let report = underwrite(&request(inputs), &Assumptions::default()).unwrap();
    let analysis = &report.underwriting_analysis;

    // 150 * 365 * 15 * (1 + 2 * 0.2) * (1 + 1.5 * 0.1)
    assert_eq!(analysis.assumptions.inputs.purchase_price, dec!(1322212.5));
    assert_eq!(analysis.assumptions.purchase_price_source, PurchasePriceSource::Estimated);
    assert_eq!(analysis.investment_summary.down_payment, dec!(264442.5));
    assert_eq!(analysis.investment_summary.loan_amount, dec!(1057770));
    assert!(report.warnings.iter().any(|w| w.contains("estimated")));
}

#[test]
fn test_unvaluable_listing_uses_fallback_price() {
    let mut req = request(base_inputs());
    req.subject_property = Default::default();
    req.financial_inputs.purchase_price = None;

    let report = underwrite(&req, &Assumptions::default()).unwrap();
    let analysis = &report.underwriting_analysis;
    assert_eq!(analysis.assumptions.inputs.purchase_price, dec!(250000));
    assert_eq!(analysis.assumptions.purchase_price_source, PurchasePriceSource::Default);
    assert_eq!(analysis.investment_summary.down_payment, dec!(50000));
    assert_eq!(analysis.investment_summary.loan_amount, dec!(200000));
}

#[test]
fn test_zero_price_is_rejected() {
    let inputs = with(base_inputs(), "purchase_price", json!(0));
    let err = underwrite(&request(inputs), &Assumptions::default()).unwrap_err();
    assert!(matches!(err, UnderwritingError::Validation { ref field, .. } if field == "purchase_price"));
}

#[test]
fn test_extreme_inputs_are_rejected_not_panicking() {
    let cases = [
        ("loan_interest_rate", json!(1000)),
        ("loan_term_years", json!(10_000)),
        ("loan_term_years", json!(400_000_000)),
        ("purchase_price", json!(1e20)),
    ];
    for (key, value) in cases {
        let inputs = with(base_inputs(), key, value.clone());
        let err = underwrite(&request(inputs), &Assumptions::default()).unwrap_err();
        assert!(
            matches!(err, UnderwritingError::Validation { ref field, .. } if field == key),
            "{key} = {value} gave {err:?}"
        );
    }
}

// ===========================================================================
// Market and scenarios
// ===========================================================================

#[test]
fn test_revenue_scenarios_follow_market() {
    let report = underwrite(&request(base_inputs()), &Assumptions::default()).unwrap();
    let revenue = &report.underwriting_analysis.revenue_scenarios;

    assert_eq!(revenue.average_case.average_daily_rate, dec!(150));
    assert_eq!(revenue.best_case.average_daily_rate, dec!(165));
    assert_eq!(revenue.worst_case.average_daily_rate, dec!(127.5));
    assert!(revenue.best_case.annual_revenue >= revenue.average_case.annual_revenue);
    assert!(revenue.worst_case.annual_revenue <= revenue.average_case.annual_revenue);
}

#[test]
fn test_zero_comparables_fall_back_to_subject() {
    let mut req = request(base_inputs());
    req.comparable_properties.clear();
    let report = underwrite(&req, &Assumptions::default()).unwrap();
    let analysis = &report.underwriting_analysis;

    assert_eq!(analysis.revenue_scenarios.average_case.average_daily_rate, dec!(150));
    // default 0.65 baseline less 10% vacancy
    assert_eq!(analysis.revenue_scenarios.average_case.occupancy_rate, dec!(0.585));
    assert_eq!(analysis.assumptions.market_data_source, MarketDataSource::SubjectFallback);
    assert_eq!(analysis.assumptions.comparables_used, 0);
}

#[test]
fn test_custom_assumptions_change_fallback_occupancy() {
    let mut req = request(base_inputs());
    req.comparable_properties.clear();
    let assumptions = Assumptions {
        default_occupancy: dec!(0.50),
        ..Default::default()
    };
    let report = underwrite(&req, &assumptions).unwrap();
    assert_eq!(
        report.underwriting_analysis.revenue_scenarios.average_case.occupancy_rate,
        dec!(0.45)
    );
}

// ===========================================================================
// Cash flow and returns
// ===========================================================================

#[test]
fn test_heavy_expenses_give_negative_returns() {
    let inputs = with(base_inputs(), "maintenance_monthly", json!(5000));
    let report = underwrite(&request(inputs), &Assumptions::default()).unwrap();
    let analysis = &report.underwriting_analysis;

    assert!(analysis.cash_flow_analysis.average_case.annual_cash_flow < Decimal::ZERO);
    assert!(analysis.roi_analysis.average_case_roi_percent < Decimal::ZERO);
    assert_eq!(analysis.roi_analysis.average_case_payback_years, PaybackPeriod::Never);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["underwriting_analysis"]["roi_analysis"]["average_case_payback_years"],
        json!("Infinity")
    );
}

#[test]
fn test_expense_section_matches_average_case() {
    let report = underwrite(&request(base_inputs()), &Assumptions::default()).unwrap();
    let analysis = &report.underwriting_analysis;
    let revenue = analysis.revenue_scenarios.average_case.annual_revenue;

    // 10% management plus (300 + 100 + 150 + 60 + 100) * 12 fixed
    let expected = revenue * dec!(0.10) + dec!(8520);
    assert_eq!(analysis.expenses.annual_operating_expenses, expected);
    assert_eq!(analysis.expenses.monthly_operating_expenses, expected / dec!(12));
}

// ===========================================================================
// Report shape
// ===========================================================================

#[test]
fn test_report_sections_present() {
    let report = underwrite(&request(base_inputs()), &Assumptions::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in ["subject_property", "comparable_properties", "underwriting_analysis", "warnings"] {
        assert!(json.get(key).is_some(), "missing top-level {key}");
    }
    let analysis = &json["underwriting_analysis"];
    for key in [
        "investment_summary",
        "revenue_scenarios",
        "expenses",
        "cash_flow_analysis",
        "roi_analysis",
        "additional_metrics",
        "assumptions",
    ] {
        assert!(analysis.get(key).is_some(), "missing section {key}");
    }
    for case in ["best_case", "average_case", "worst_case"] {
        let scenario = &analysis["revenue_scenarios"][case];
        for field in [
            "annual_revenue",
            "monthly_revenue",
            "occupancy_rate",
            "adr",
            "total_nights_booked",
            "cleaning_revenue",
        ] {
            assert!(scenario[field].is_number(), "{case}.{field} should be numeric");
        }
    }
}

#[test]
fn test_cleaning_revenue_uses_mean_comparable_fee() {
    let report = underwrite(&request(base_inputs()), &Assumptions::default()).unwrap();
    for (_, scenario) in report.underwriting_analysis.revenue_scenarios.iter() {
        // comparables charge 50 and 70
        assert_eq!(scenario.cleaning_revenue, scenario.estimated_stays * dec!(60));
        assert_eq!(
            scenario.annual_revenue,
            scenario.occupancy_rate * dec!(365) * scenario.average_daily_rate
        );
    }
}

#[test]
fn test_identical_requests_serialize_identically() {
    let req = request(base_inputs());
    let assumptions = Assumptions::default();
    let a = serde_json::to_string(&underwrite(&req, &assumptions).unwrap()).unwrap();
    let b = serde_json::to_string(&underwrite(&req, &assumptions).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_unknown_financial_input_is_warned_not_rejected() {
    let inputs = with(base_inputs(), "hot_tub_budget", json!(4000));
    let report = underwrite(&request(inputs), &Assumptions::default()).unwrap();
    assert!(report.warnings.iter().any(|w| w.contains("hot_tub_budget")));
}
