use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::UnderwritingError;
use crate::types::{Money, Percent, Rate};
use crate::underwriting::property::PropertyRecord;
use crate::UnderwritingResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const ONE_HUNDRED: Decimal = dec!(100);
const MAX_LOAN_TERM_YEARS: u32 = 50;
const MAX_INPUT_AMOUNT: Money = dec!(1000000000000);
const MAX_STAY_NIGHTS: Decimal = dec!(365);
const MAX_STAYS_PER_REVIEW: Decimal = dec!(1000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every default and heuristic knob the engine relies on.
///
/// Values here fill in whatever the caller leaves out of [`FinancialInputs`]
/// and drive the market fallbacks. Load a modified copy to override any of
/// them; nothing else in the engine carries hidden defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub down_payment_percent: Percent,
    /// Annual loan rate as a percentage (6.5 = 6.5%)
    pub loan_interest_rate: Percent,
    pub loan_term_years: u32,
    pub closing_costs: Money,
    pub renovation_costs: Money,
    pub furniture_costs: Money,
    pub property_management_percent: Percent,
    /// Nights per booking
    pub average_stay_length: Decimal,
    /// Share of otherwise-expected nights that go unbooked
    pub vacancy_rate: Rate,
    pub property_tax_monthly: Money,
    pub insurance_monthly: Money,
    pub hoa_fees_monthly: Money,
    pub utilities_monthly: Money,
    pub internet_monthly: Money,
    pub maintenance_monthly: Money,
    /// Purchase price used when none is given and the listing cannot be valued
    pub fallback_purchase_price: Money,
    /// Nightly rate used when neither comparables nor the subject carry a price
    pub fallback_nightly_rate: Money,
    /// Baseline occupancy used when there are no comparables
    pub default_occupancy: Rate,
    /// Bookable nights per year when comparables do not report availability
    pub default_available_nights: u32,
    /// Bookings represented by each review
    pub stays_per_review: Decimal,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            down_payment_percent: dec!(20),
            loan_interest_rate: dec!(6.5),
            loan_term_years: 30,
            closing_costs: Decimal::ZERO,
            renovation_costs: Decimal::ZERO,
            furniture_costs: dec!(15000),
            property_management_percent: dec!(10),
            average_stay_length: dec!(3),
            vacancy_rate: dec!(0.15),
            property_tax_monthly: Decimal::ZERO,
            insurance_monthly: Decimal::ZERO,
            hoa_fees_monthly: Decimal::ZERO,
            utilities_monthly: Decimal::ZERO,
            internet_monthly: Decimal::ZERO,
            maintenance_monthly: Decimal::ZERO,
            fallback_purchase_price: dec!(250000),
            fallback_nightly_rate: dec!(100),
            default_occupancy: dec!(0.65),
            default_available_nights: 300,
            stays_per_review: dec!(4),
        }
    }
}

/// Financing and operating inputs as supplied by the caller.
///
/// Every field is optional; absent values are taken from [`Assumptions`].
/// Keys the engine does not know are kept so they can be reported back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_interest_rate: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_term_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renovation_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furniture_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_management_percent: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_stay_length: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacancy_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_tax_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoa_fees_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilities_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_monthly: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_monthly: Option<Money>,
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

/// Where the purchase price in a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePriceSource {
    Provided,
    Estimated,
    Default,
}

/// Fully-defaulted, validated inputs. Echoed in the report's assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInputs {
    pub purchase_price: Money,
    pub down_payment_percent: Percent,
    pub loan_interest_rate: Percent,
    pub loan_term_years: u32,
    pub closing_costs: Money,
    pub renovation_costs: Money,
    pub furniture_costs: Money,
    pub property_tax_monthly: Money,
    pub insurance_monthly: Money,
    pub hoa_fees_monthly: Money,
    pub utilities_monthly: Money,
    pub internet_monthly: Money,
    pub maintenance_monthly: Money,
    pub property_management_percent: Percent,
    pub average_stay_length: Decimal,
    pub vacancy_rate: Rate,
}

impl ResolvedInputs {
    /// Fixed monthly operating costs, excluding management fees and debt service.
    pub fn monthly_fixed_expenses(&self) -> Money {
        self.property_tax_monthly
            + self.insurance_monthly
            + self.hoa_fees_monthly
            + self.utilities_monthly
            + self.internet_monthly
            + self.maintenance_monthly
    }

    /// The "other expenses" term of the cash-flow equation.
    pub fn annual_other_expenses(&self) -> Money {
        self.monthly_fixed_expenses() * MONTHS_PER_YEAR
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Assumptions {
    /// Reject knob values that would make the market heuristics meaningless.
    pub fn validate(&self) -> UnderwritingResult<()> {
        if self.default_occupancy < Decimal::ZERO || self.default_occupancy > Decimal::ONE {
            return Err(UnderwritingError::validation(
                "assumptions.default_occupancy",
                "Default occupancy must be between 0 and 1",
            ));
        }
        if self.default_available_nights == 0 || self.default_available_nights > 365 {
            return Err(UnderwritingError::validation(
                "assumptions.default_available_nights",
                "Available nights must be between 1 and 365",
            ));
        }
        if self.stays_per_review < Decimal::ZERO || self.stays_per_review > MAX_STAYS_PER_REVIEW {
            return Err(UnderwritingError::validation(
                "assumptions.stays_per_review",
                "Stays per review must be between 0 and 1000",
            ));
        }
        if self.fallback_purchase_price <= Decimal::ZERO
            || self.fallback_purchase_price > MAX_INPUT_AMOUNT
        {
            return Err(UnderwritingError::validation(
                "assumptions.fallback_purchase_price",
                "Fallback purchase price must be positive and at most 1,000,000,000,000",
            ));
        }
        if self.fallback_nightly_rate < Decimal::ZERO || self.fallback_nightly_rate > MAX_INPUT_AMOUNT
        {
            return Err(UnderwritingError::validation(
                "assumptions.fallback_nightly_rate",
                "Fallback nightly rate must be between 0 and 1,000,000,000,000",
            ));
        }
        Ok(())
    }
}

/// Apply defaults to caller inputs and validate the result.
///
/// A missing purchase price is estimated from the subject listing, falling
/// back to `assumptions.fallback_purchase_price`. An explicit price must be
/// positive.
pub fn resolve_inputs(
    inputs: &FinancialInputs,
    subject: &PropertyRecord,
    assumptions: &Assumptions,
    warnings: &mut Vec<String>,
) -> UnderwritingResult<(ResolvedInputs, PurchasePriceSource)> {
    for key in inputs.unrecognized.keys() {
        warnings.push(format!("Ignoring unrecognized financial input '{key}'"));
    }

    let (purchase_price, source) = match inputs.purchase_price {
        Some(price) if price <= Decimal::ZERO => {
            return Err(UnderwritingError::validation(
                "purchase_price",
                "Purchase price must be positive",
            ));
        }
        Some(price) => (price, PurchasePriceSource::Provided),
        None => match subject.estimate_value() {
            Some(estimate) => {
                warnings.push(format!(
                    "Purchase price not provided; estimated {estimate:.2} from listing data"
                ));
                (estimate, PurchasePriceSource::Estimated)
            }
            None => {
                warnings.push(format!(
                    "Purchase price not provided and listing lacks price or room counts; using {:.2}",
                    assumptions.fallback_purchase_price
                ));
                (assumptions.fallback_purchase_price, PurchasePriceSource::Default)
            }
        },
    };

    let resolved = ResolvedInputs {
        purchase_price,
        down_payment_percent: inputs
            .down_payment_percent
            .unwrap_or(assumptions.down_payment_percent),
        loan_interest_rate: inputs
            .loan_interest_rate
            .unwrap_or(assumptions.loan_interest_rate),
        loan_term_years: inputs.loan_term_years.unwrap_or(assumptions.loan_term_years),
        closing_costs: inputs.closing_costs.unwrap_or(assumptions.closing_costs),
        renovation_costs: inputs.renovation_costs.unwrap_or(assumptions.renovation_costs),
        furniture_costs: inputs.furniture_costs.unwrap_or(assumptions.furniture_costs),
        property_tax_monthly: inputs
            .property_tax_monthly
            .unwrap_or(assumptions.property_tax_monthly),
        insurance_monthly: inputs.insurance_monthly.unwrap_or(assumptions.insurance_monthly),
        hoa_fees_monthly: inputs.hoa_fees_monthly.unwrap_or(assumptions.hoa_fees_monthly),
        utilities_monthly: inputs.utilities_monthly.unwrap_or(assumptions.utilities_monthly),
        internet_monthly: inputs.internet_monthly.unwrap_or(assumptions.internet_monthly),
        maintenance_monthly: inputs
            .maintenance_monthly
            .unwrap_or(assumptions.maintenance_monthly),
        property_management_percent: inputs
            .property_management_percent
            .unwrap_or(assumptions.property_management_percent),
        average_stay_length: inputs
            .average_stay_length
            .unwrap_or(assumptions.average_stay_length),
        vacancy_rate: inputs.vacancy_rate.unwrap_or(assumptions.vacancy_rate),
    };

    validate_resolved(&resolved)?;

    Ok((resolved, source))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_resolved(inputs: &ResolvedInputs) -> UnderwritingResult<()> {
    if inputs.purchase_price <= Decimal::ZERO {
        return Err(UnderwritingError::validation(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    if inputs.purchase_price > MAX_INPUT_AMOUNT {
        return Err(UnderwritingError::validation(
            "purchase_price",
            "Purchase price cannot exceed 1,000,000,000,000",
        ));
    }

    check_percent("down_payment_percent", inputs.down_payment_percent)?;
    check_percent("property_management_percent", inputs.property_management_percent)?;
    check_percent("loan_interest_rate", inputs.loan_interest_rate)?;

    if inputs.loan_term_years < 1 || inputs.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(UnderwritingError::validation(
            "loan_term_years",
            "Loan term must be between 1 and 50 years",
        ));
    }

    check_stay_length(inputs.average_stay_length)?;

    if inputs.vacancy_rate < Decimal::ZERO || inputs.vacancy_rate > Decimal::ONE {
        return Err(UnderwritingError::validation(
            "vacancy_rate",
            "Vacancy rate must be between 0 and 1",
        ));
    }

    let non_negative = [
        ("closing_costs", inputs.closing_costs),
        ("renovation_costs", inputs.renovation_costs),
        ("furniture_costs", inputs.furniture_costs),
        ("property_tax_monthly", inputs.property_tax_monthly),
        ("insurance_monthly", inputs.insurance_monthly),
        ("hoa_fees_monthly", inputs.hoa_fees_monthly),
        ("utilities_monthly", inputs.utilities_monthly),
        ("internet_monthly", inputs.internet_monthly),
        ("maintenance_monthly", inputs.maintenance_monthly),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(UnderwritingError::validation(field, "Cost cannot be negative"));
        }
        if value > MAX_INPUT_AMOUNT {
            return Err(UnderwritingError::validation(
                field,
                "Cost cannot exceed 1,000,000,000,000",
            ));
        }
    }

    Ok(())
}

pub(crate) fn check_stay_length(nights: Decimal) -> UnderwritingResult<()> {
    if nights <= Decimal::ZERO || nights > MAX_STAY_NIGHTS {
        return Err(UnderwritingError::validation(
            "average_stay_length",
            "Average stay length must be positive and at most 365 nights",
        ));
    }
    Ok(())
}

fn check_percent(field: &str, value: Percent) -> UnderwritingResult<()> {
    if value < Decimal::ZERO || value > ONE_HUNDRED {
        return Err(UnderwritingError::validation(
            field,
            "Percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> PropertyRecord {
        PropertyRecord {
            price_per_night: Some(dec!(150)),
            num_bedrooms: Some(2),
            num_bathrooms: Some(dec!(1)),
            ..Default::default()
        }
    }

    fn field_of(err: UnderwritingError) -> String {
        match err {
            UnderwritingError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_fill_missing_inputs() {
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(400000)),
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let (resolved, source) =
            resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut warnings).unwrap();

        assert_eq!(source, PurchasePriceSource::Provided);
        assert_eq!(resolved.vacancy_rate, dec!(0.15));
        assert_eq!(resolved.property_management_percent, dec!(10));
        assert_eq!(resolved.average_stay_length, dec!(3));
        assert_eq!(resolved.loan_term_years, 30);
        assert_eq!(resolved.annual_other_expenses(), Decimal::ZERO);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_overridden_assumptions_apply() {
        let assumptions = Assumptions {
            vacancy_rate: dec!(0.25),
            insurance_monthly: dec!(200),
            ..Default::default()
        };
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(400000)),
            utilities_monthly: Some(dec!(150)),
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let (resolved, _) =
            resolve_inputs(&inputs, &subject(), &assumptions, &mut warnings).unwrap();

        assert_eq!(resolved.vacancy_rate, dec!(0.25));
        assert_eq!(resolved.monthly_fixed_expenses(), dec!(350));
        assert_eq!(resolved.annual_other_expenses(), dec!(4200));
    }

    #[test]
    fn test_missing_price_is_estimated() {
        let mut warnings = Vec::new();
        let (resolved, source) = resolve_inputs(
            &FinancialInputs::default(),
            &subject(),
            &Assumptions::default(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(source, PurchasePriceSource::Estimated);
        // 150 * 365 * 15 * 1.4 * 1.1
        assert_eq!(resolved.purchase_price, dec!(1264725));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_missing_price_without_listing_data_uses_fallback() {
        let mut warnings = Vec::new();
        let (resolved, source) = resolve_inputs(
            &FinancialInputs::default(),
            &PropertyRecord::default(),
            &Assumptions::default(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(source, PurchasePriceSource::Default);
        assert_eq!(resolved.purchase_price, dec!(250000));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let inputs = FinancialInputs {
            purchase_price: Some(Decimal::ZERO),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "purchase_price");
    }

    #[test]
    fn test_down_payment_out_of_range_rejected() {
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(300000)),
            down_payment_percent: Some(dec!(101)),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "down_payment_percent");
    }

    #[test]
    fn test_vacancy_out_of_range_rejected() {
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(300000)),
            vacancy_rate: Some(dec!(1.2)),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "vacancy_rate");
    }

    #[test]
    fn test_zero_stay_length_rejected() {
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(300000)),
            average_stay_length: Some(Decimal::ZERO),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "average_stay_length");
    }

    #[test]
    fn test_extreme_loan_terms_rejected() {
        for (term, rate, field) in [
            (30, dec!(1000), "loan_interest_rate"),
            (10_000, dec!(6), "loan_term_years"),
            (400_000_000, dec!(6), "loan_term_years"),
        ] {
            let inputs = FinancialInputs {
                purchase_price: Some(dec!(300000)),
                loan_term_years: Some(term),
                loan_interest_rate: Some(rate),
                ..Default::default()
            };
            let err =
                resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
                    .unwrap_err();
            assert_eq!(field_of(err), field);
        }
    }

    #[test]
    fn test_huge_amounts_rejected() {
        let inputs = FinancialInputs {
            purchase_price: Some(dec!(10000000000000000000000000000)),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "purchase_price");

        let inputs = FinancialInputs {
            purchase_price: Some(dec!(300000)),
            maintenance_monthly: Some(dec!(10000000000000000000000000000)),
            ..Default::default()
        };
        let err = resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut Vec::new())
            .unwrap_err();
        assert_eq!(field_of(err), "maintenance_monthly");
    }

    #[test]
    fn test_unrecognized_keys_are_reported() {
        let inputs: FinancialInputs = serde_json::from_str(
            r#"{"purchase_price": 300000, "annual_revenue_growth": 0.02}"#,
        )
        .unwrap();
        let mut warnings = Vec::new();
        resolve_inputs(&inputs, &subject(), &Assumptions::default(), &mut warnings).unwrap();

        assert_eq!(inputs.purchase_price, Some(dec!(300000)));
        assert_eq!(
            warnings,
            vec!["Ignoring unrecognized financial input 'annual_revenue_growth'".to_string()]
        );
    }

    #[test]
    fn test_assumptions_validate_occupancy() {
        let bad = Assumptions {
            default_occupancy: dec!(1.5),
            ..Default::default()
        };
        assert_eq!(field_of(bad.validate().unwrap_err()), "assumptions.default_occupancy");
        assert!(Assumptions::default().validate().is_ok());
    }
}
