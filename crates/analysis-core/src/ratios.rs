use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ratios and working-capital day counts derived from a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    CurrentRatio,
    ProfitMargin,
    DebtToEquity,
    AssetTurnover,
    Dso,
    Dio,
    Dpo,
    CashConversionCycle,
}

impl Ratio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "current_ratio",
            Ratio::ProfitMargin => "profit_margin",
            Ratio::DebtToEquity => "debt_to_equity",
            Ratio::AssetTurnover => "asset_turnover",
            Ratio::Dso => "dso",
            Ratio::Dio => "dio",
            Ratio::Dpo => "dpo",
            Ratio::CashConversionCycle => "cash_conversion_cycle",
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed ratio, or the marker for one whose denominator was non-positive.
///
/// Serializes as a number, or `null` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum RatioValue {
    Defined(f64),
    Undefined,
}

impl RatioValue {
    pub fn defined(&self) -> Option<f64> {
        match self {
            RatioValue::Defined(v) => Some(*v),
            RatioValue::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RatioValue::Undefined)
    }
}

impl From<Option<f64>> for RatioValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => RatioValue::Defined(v),
            _ => RatioValue::Undefined,
        }
    }
}

impl From<RatioValue> for Option<f64> {
    fn from(value: RatioValue) -> Self {
        value.defined()
    }
}

/// How to treat a zero or negative denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Legacy behaviour: divide by `max(denominator, 1)`.
    ClampToOne,
    /// Emit [`RatioValue::Undefined`].
    #[default]
    Undefined,
}

impl DenominatorPolicy {
    pub fn divide(&self, numerator: f64, denominator: f64) -> RatioValue {
        match self {
            DenominatorPolicy::ClampToOne => RatioValue::Defined(numerator / denominator.max(1.0)),
            DenominatorPolicy::Undefined if denominator > 0.0 => {
                RatioValue::Defined(numerator / denominator)
            }
            DenominatorPolicy::Undefined => RatioValue::Undefined,
        }
    }
}

/// Ratio name to value. A ratio whose inputs were missing is absent
/// altogether; one whose denominator was unusable is present but undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet {
    values: BTreeMap<Ratio, RatioValue>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ratio: Ratio, value: f64) -> Self {
        self.insert(ratio, RatioValue::Defined(value));
        self
    }

    pub fn insert(&mut self, ratio: Ratio, value: RatioValue) {
        self.values.insert(ratio, value);
    }

    /// Defined value, if any.
    pub fn get(&self, ratio: Ratio) -> Option<f64> {
        self.values.get(&ratio).and_then(RatioValue::defined)
    }

    pub fn value(&self, ratio: Ratio) -> Option<RatioValue> {
        self.values.get(&ratio).copied()
    }

    pub fn contains(&self, ratio: Ratio) -> bool {
        self.values.contains_key(&ratio)
    }

    pub fn is_undefined(&self, ratio: Ratio) -> bool {
        self.value(ratio).is_some_and(|v| v.is_undefined())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ratio, RatioValue)> + '_ {
        self.values.iter().map(|(r, v)| (*r, *v))
    }

    pub fn merge(&mut self, other: RatioSet) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
