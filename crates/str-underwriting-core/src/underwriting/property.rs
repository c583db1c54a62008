use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::UnderwritingError;
use crate::types::Money;
use crate::UnderwritingResult;

const MAX_RATING: Decimal = dec!(5);
const MAX_NIGHTLY_AMOUNT: Money = dec!(1000000);
const MAX_BATHROOMS: Decimal = dec!(1000);
const DAYS_PER_YEAR: u32 = 365;

// Purchase-price heuristic: a multiple of gross potential room revenue,
// scaled up per bedroom and bathroom.
const GROSS_REVENUE_MULTIPLE: Decimal = dec!(15);
const BEDROOM_PREMIUM: Decimal = dec!(0.2);
const BATHROOM_PREMIUM: Decimal = dec!(0.1);
const MIN_ESTIMATED_VALUE: Money = dec!(50000);
const MAX_ESTIMATED_VALUE: Money = dec!(5000000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A normalized listing as produced by the data collector.
///
/// Every field the collector could not extract is `None` (or empty for
/// amenities). Numeric ranges are checked by [`PropertyRecord::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Advertised nightly rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bedrooms: Option<u32>,
    /// Fractional counts are allowed (1.5 = one full bath plus a half bath)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bathrooms: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_reviews: Option<u32>,
    /// Guest rating on a 0.0-5.0 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<Decimal>,
    pub amenities: BTreeSet<String>,
    /// Free-form location, e.g. "Austin, TX, United States"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_fee: Option<Money>,
    /// Nights per year the listing is open for booking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_365: Option<u32>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl PropertyRecord {
    /// Check numeric ranges. `label` prefixes the field name in errors,
    /// e.g. `subject_property` or `comparable_properties[2]`.
    pub fn validate(&self, label: &str) -> UnderwritingResult<()> {
        if let Some(price) = self.price_per_night {
            if price < Decimal::ZERO {
                return Err(UnderwritingError::validation(
                    format!("{label}.price_per_night"),
                    "Nightly price cannot be negative",
                ));
            }
            if price > MAX_NIGHTLY_AMOUNT {
                return Err(UnderwritingError::validation(
                    format!("{label}.price_per_night"),
                    "Nightly price cannot exceed 1,000,000",
                ));
            }
        }

        if let Some(rating) = self.average_rating {
            if rating < Decimal::ZERO || rating > MAX_RATING {
                return Err(UnderwritingError::validation(
                    format!("{label}.average_rating"),
                    "Rating must be between 0.0 and 5.0",
                ));
            }
        }

        if let Some(baths) = self.num_bathrooms {
            if baths < Decimal::ZERO || baths > MAX_BATHROOMS {
                return Err(UnderwritingError::validation(
                    format!("{label}.num_bathrooms"),
                    "Bathroom count must be between 0 and 1000",
                ));
            }
        }

        if let Some(fee) = self.cleaning_fee {
            if fee < Decimal::ZERO || fee > MAX_NIGHTLY_AMOUNT {
                return Err(UnderwritingError::validation(
                    format!("{label}.cleaning_fee"),
                    "Cleaning fee must be between 0 and 1,000,000",
                ));
            }
        }

        if let Some(nights) = self.availability_365 {
            if nights > DAYS_PER_YEAR {
                return Err(UnderwritingError::validation(
                    format!("{label}.availability_365"),
                    "Availability cannot exceed 365 nights",
                ));
            }
        }

        Ok(())
    }

    /// Rough market value from listing data alone.
    ///
    /// `price × 365 × 15 × (1 + 0.2 × bedrooms) × (1 + 0.1 × bathrooms)`,
    /// clamped to [50k, 5M]. Returns `None` when price, bedrooms or
    /// bathrooms are missing.
    pub fn estimate_value(&self) -> Option<Money> {
        let price = self.price_per_night?;
        let bedrooms = Decimal::from(self.num_bedrooms?);
        let bathrooms = self.num_bathrooms?;

        let base = price * Decimal::from(DAYS_PER_YEAR) * GROSS_REVENUE_MULTIPLE;
        let bedroom_factor = Decimal::ONE + bedrooms * BEDROOM_PREMIUM;
        let bathroom_factor = Decimal::ONE + bathrooms * BATHROOM_PREMIUM;

        let estimate = base * bedroom_factor * bathroom_factor;
        Some(estimate.clamp(MIN_ESTIMATED_VALUE, MAX_ESTIMATED_VALUE))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
