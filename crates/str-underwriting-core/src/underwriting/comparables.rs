use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};
use crate::underwriting::assumptions::Assumptions;
use crate::underwriting::property::PropertyRecord;

/// Lowest baseline occupancy the review heuristic may report.
pub const MIN_BASELINE_OCCUPANCY: Rate = dec!(0.30);
/// Highest baseline occupancy the review heuristic may report.
pub const MAX_BASELINE_OCCUPANCY: Rate = dec!(0.85);

/// Whether market statistics came from the comparable set or a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataSource {
    Comparables,
    SubjectFallback,
}

/// Market statistics derived from a comparable set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Mean nightly rate across priced comparables
    pub average_daily_rate: Money,
    pub average_review_count: Decimal,
    /// Estimated historical occupancy before vacancy, in [0.30, 0.85]
    pub baseline_occupancy: Rate,
    pub comparables_used: usize,
    pub source: MarketDataSource,
    /// Mean cleaning fee across comparables, each defaulting to the subject's
    #[serde(default)]
    pub average_cleaning_fee: Money,
}

/// Reduce comparables to market statistics.
///
/// An empty set is not an error: the subject's own price and
/// `assumptions.default_occupancy` stand in, and a warning is recorded.
pub fn aggregate_comparables(
    subject: &PropertyRecord,
    comparables: &[PropertyRecord],
    average_stay_length: Decimal,
    assumptions: &Assumptions,
    warnings: &mut Vec<String>,
) -> MarketStats {
    let subject_cleaning_fee = subject.cleaning_fee.unwrap_or(Decimal::ZERO);
    if comparables.is_empty() {
        warnings.push(
            "No comparable properties supplied; market rate and occupancy fall back to the subject listing and default assumptions"
                .into(),
        );
        tracing::warn!("empty comparable set, using subject fallback");
        return MarketStats {
            average_daily_rate: subject_rate(subject, assumptions, warnings),
            average_review_count: Decimal::ZERO,
            baseline_occupancy: clip_occupancy(assumptions.default_occupancy),
            comparables_used: 0,
            source: MarketDataSource::SubjectFallback,
            average_cleaning_fee: subject_cleaning_fee,
        };
    }

    let count = Decimal::from(comparables.len() as u64);

    let prices: Vec<Money> = comparables
        .iter()
        .filter_map(|c| c.price_per_night)
        .collect();
    let (average_daily_rate, source) = match mean(&prices) {
        Some(avg) => (avg, MarketDataSource::Comparables),
        None => {
            warnings.push("No comparable property reports a nightly price; using the subject's rate".into());
            (
                subject_rate(subject, assumptions, warnings),
                MarketDataSource::SubjectFallback,
            )
        }
    };

    let total_reviews: Decimal = comparables
        .iter()
        .map(|c| Decimal::from(c.num_reviews.unwrap_or(0)))
        .sum();
    let average_review_count = total_reviews / count;

    let availability: Vec<Decimal> = comparables
        .iter()
        .filter_map(|c| c.availability_365)
        .filter(|nights| *nights > 0)
        .map(Decimal::from)
        .collect();
    let available_nights =
        mean(&availability).unwrap_or_else(|| Decimal::from(assumptions.default_available_nights));

    let baseline_occupancy = occupancy_from_reviews(
        average_review_count,
        average_stay_length,
        available_nights,
        assumptions.stays_per_review,
    );

    let cleaning_fees: Vec<Money> = comparables
        .iter()
        .map(|c| c.cleaning_fee.unwrap_or(subject_cleaning_fee))
        .collect();
    let average_cleaning_fee = mean(&cleaning_fees).unwrap_or(subject_cleaning_fee);

    MarketStats {
        average_daily_rate,
        average_review_count,
        baseline_occupancy,
        comparables_used: comparables.len(),
        source,
        average_cleaning_fee,
    }
}

/// Map review velocity to a historical occupancy estimate.
///
/// Each review stands for `stays_per_review` bookings of `average_stay_length`
/// nights; booked nights over available nights is then clipped to
/// [0.30, 0.85]. Non-decreasing in `average_reviews`.
pub fn occupancy_from_reviews(
    average_reviews: Decimal,
    average_stay_length: Decimal,
    available_nights: Decimal,
    stays_per_review: Decimal,
) -> Rate {
    if available_nights <= Decimal::ZERO {
        return MIN_BASELINE_OCCUPANCY;
    }
    let booked_nights = average_reviews * stays_per_review * average_stay_length;
    clip_occupancy(booked_nights / available_nights)
}

fn clip_occupancy(occupancy: Rate) -> Rate {
    occupancy.clamp(MIN_BASELINE_OCCUPANCY, MAX_BASELINE_OCCUPANCY)
}

fn subject_rate(
    subject: &PropertyRecord,
    assumptions: &Assumptions,
    warnings: &mut Vec<String>,
) -> Money {
    match subject.price_per_night {
        Some(price) => price,
        None => {
            warnings.push(format!(
                "Subject listing has no nightly price; using {:.2}",
                assumptions.fallback_nightly_rate
            ));
            assumptions.fallback_nightly_rate
        }
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().copied().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
