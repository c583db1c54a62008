use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Fractions expressed as decimals (0.15 = 15%), e.g. occupancy and vacancy.
pub type Rate = Decimal;

/// Percentages as quoted by users (6.5 = 6.5%), e.g. loan rate and fees.
pub type Percent = Decimal;

/// JSON label for a payback period that never completes.
pub const INFINITE_PAYBACK: &str = "Infinity";

/// The three underwriting cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Best,
    Average,
    Worst,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Best,
        ScenarioKind::Average,
        ScenarioKind::Worst,
    ];

    /// Human-readable name echoed in revenue scenarios.
    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::Best => "Best Case",
            ScenarioKind::Average => "Average Case",
            ScenarioKind::Worst => "Worst Case",
        }
    }

    /// Key prefix used in flat report sections (`best_case_roi_percent`).
    pub fn key(self) -> &'static str {
        match self {
            ScenarioKind::Best => "best_case",
            ScenarioKind::Average => "average_case",
            ScenarioKind::Worst => "worst_case",
        }
    }
}

/// One value per scenario, serialized as `{best_case, average_case, worst_case}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByScenario<T> {
    pub best_case: T,
    pub average_case: T,
    pub worst_case: T,
}

impl<T> ByScenario<T> {
    pub fn from_fn(mut f: impl FnMut(ScenarioKind) -> T) -> Self {
        ByScenario {
            best_case: f(ScenarioKind::Best),
            average_case: f(ScenarioKind::Average),
            worst_case: f(ScenarioKind::Worst),
        }
    }

    pub fn get(&self, kind: ScenarioKind) -> &T {
        match kind {
            ScenarioKind::Best => &self.best_case,
            ScenarioKind::Average => &self.average_case,
            ScenarioKind::Worst => &self.worst_case,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ScenarioKind, &T) -> U) -> ByScenario<U> {
        ByScenario::from_fn(|kind| f(kind, self.get(kind)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &T)> {
        ScenarioKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Years needed to recover the total investment from annual cash flow.
///
/// `Never` covers zero or negative cash flow. It serializes as the string
/// `"Infinity"`, which existing report consumers expect in place of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaybackPeriod {
    Years(Decimal),
    Never,
}

impl PaybackPeriod {
    pub fn years(&self) -> Option<Decimal> {
        match self {
            PaybackPeriod::Years(y) => Some(*y),
            PaybackPeriod::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, PaybackPeriod::Never)
    }
}

impl Serialize for PaybackPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PaybackPeriod::Years(years) => Serialize::serialize(years, serializer),
            PaybackPeriod::Never => serializer.serialize_str(INFINITE_PAYBACK),
        }
    }
}

impl<'de> Deserialize<'de> for PaybackPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Label(String),
            Years(Decimal),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Years(years) => Ok(PaybackPeriod::Years(years)),
            Repr::Label(label) if label == INFINITE_PAYBACK => Ok(PaybackPeriod::Never),
            Repr::Label(label) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&label),
                &"a number of years or \"Infinity\"",
            )),
        }
    }
}

/// A coverage ratio whose denominator may be zero.
///
/// `Undefined` serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageRatio {
    Ratio(Decimal),
    Undefined,
}

impl CoverageRatio {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            CoverageRatio::Ratio(r) => Some(*r),
            CoverageRatio::Undefined => None,
        }
    }
}

impl Serialize for CoverageRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CoverageRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Decimal>::deserialize(deserializer)? {
            Some(ratio) => CoverageRatio::Ratio(ratio),
            None => CoverageRatio::Undefined,
        })
    }
}
