//! Threshold policy
//!
//! Every cutoff the engine scores against lives here, as ordered bands of
//! `(comparison, cutoff, outcome)`. Risk assessment, credit assessment,
//! health scoring, report tagging and recommendations all read from these
//! tables, so a policy change is a one-line edit.

use crate::{Grade, Ratio, RiskLevel, Severity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Below,
    Above,
    AtMost,
    AtLeast,
    Always,
}

/// One row of a threshold table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<T> {
    pub comparison: Comparison,
    pub cutoff: f64,
    pub outcome: T,
}

impl<T: Copy> Band<T> {
    pub const fn below(cutoff: f64, outcome: T) -> Self {
        Self { comparison: Comparison::Below, cutoff, outcome }
    }

    pub const fn above(cutoff: f64, outcome: T) -> Self {
        Self { comparison: Comparison::Above, cutoff, outcome }
    }

    pub const fn at_most(cutoff: f64, outcome: T) -> Self {
        Self { comparison: Comparison::AtMost, cutoff, outcome }
    }

    pub const fn at_least(cutoff: f64, outcome: T) -> Self {
        Self { comparison: Comparison::AtLeast, cutoff, outcome }
    }

    pub const fn otherwise(outcome: T) -> Self {
        Self { comparison: Comparison::Always, cutoff: 0.0, outcome }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::Below => value < self.cutoff,
            Comparison::Above => value > self.cutoff,
            Comparison::AtMost => value <= self.cutoff,
            Comparison::AtLeast => value >= self.cutoff,
            Comparison::Always => true,
        }
    }
}

/// First matching band wins; `None` when no band applies.
pub fn classify<T: Copy>(value: f64, bands: &[Band<T>]) -> Option<T> {
    bands.iter().find(|b| b.matches(value)).map(|b| b.outcome)
}

/// Penalty of the first matching band, 0 when none match.
pub fn penalty(value: f64, bands: &[Band<f64>]) -> f64 {
    classify(value, bands).unwrap_or(0.0)
}

/// A tag attached to a ratio when it crosses a cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioRule<T> {
    pub ratio: Ratio,
    pub band: Band<T>,
}

// ---------------------------------------------------------------------------
// Risk assessment: (severity, penalty points)
// ---------------------------------------------------------------------------

pub const LIQUIDITY_RISK: &[Band<(Severity, f64)>] = &[
    Band::below(1.0, (Severity::High, 30.0)),
    Band::below(1.5, (Severity::Medium, 15.0)),
    Band::otherwise((Severity::Low, 5.0)),
];

pub const CREDIT_RISK: &[Band<(Severity, f64)>] = &[
    Band::above(2.0, (Severity::High, 25.0)),
    Band::above(1.0, (Severity::Medium, 12.0)),
    Band::otherwise((Severity::Low, 3.0)),
];

pub const OPERATIONAL_RISK: &[Band<(Severity, f64)>] = &[
    Band::below(0.0, (Severity::High, 20.0)),
    Band::below(0.05, (Severity::Medium, 10.0)),
    Band::otherwise((Severity::Low, 2.0)),
];

/// Industry contribution = intensity * weight * scale
pub const INDUSTRY_RISK_SCALE: f64 = 20.0;

pub const INDUSTRY_RISK: &[Band<Severity>] = &[
    Band::above(10.0, Severity::Medium),
    Band::otherwise(Severity::Low),
];

pub const RISK_GRADE: &[Band<Grade>] = &[
    Band::at_most(20.0, Grade::A),
    Band::at_most(40.0, Grade::B),
    Band::at_most(60.0, Grade::C),
    Band::otherwise(Grade::D),
];

// ---------------------------------------------------------------------------
// Health score: penalty points subtracted from 100
// ---------------------------------------------------------------------------

pub const HEALTH_PROFITABILITY: &[Band<f64>] = &[
    Band::below(0.0, 25.0),
    Band::below(0.05, 15.0),
    Band::below(0.1, 5.0),
];

pub const HEALTH_LIQUIDITY: &[Band<f64>] = &[
    Band::below(1.0, 25.0),
    Band::below(1.2, 15.0),
    Band::below(1.5, 5.0),
];

pub const HEALTH_LEVERAGE: &[Band<f64>] = &[
    Band::above(2.0, 25.0),
    Band::above(1.5, 15.0),
    Band::above(1.0, 5.0),
];

/// Share of the overall risk score deducted from health
pub const HEALTH_RISK_WEIGHT: f64 = 0.25;

pub const SCORE_GRADE: &[Band<Grade>] = &[
    Band::at_least(80.0, Grade::A),
    Band::at_least(60.0, Grade::B),
    Band::at_least(40.0, Grade::C),
    Band::otherwise(Grade::D),
];

// ---------------------------------------------------------------------------
// Credit assessment: (penalty, risk factor text)
// ---------------------------------------------------------------------------

pub const CREDIT_LIQUIDITY: &[Band<(f64, &str)>] = &[
    Band::below(1.0, (20.0, "Low liquidity - current ratio below 1.0")),
    Band::below(1.2, (10.0, "Moderate liquidity concern")),
];

pub const CREDIT_LEVERAGE: &[Band<(f64, &str)>] = &[Band::above(1.0, (15.0, "High debt burden"))];

pub const CREDIT_PROFITABILITY: &[Band<(f64, &str)>] = &[
    Band::below(0.0, (25.0, "Negative profit margins")),
    Band::below(0.05, (10.0, "Low profit margins")),
];

pub const CREDIT_CASH_FLOW: &[Band<(f64, &str)>] =
    &[Band::below(0.0, (20.0, "Negative operating cash flow"))];

pub const CREDIT_RISK_LEVEL: &[Band<RiskLevel>] = &[
    Band::at_least(70.0, RiskLevel::Low),
    Band::at_least(50.0, RiskLevel::Medium),
    Band::otherwise(RiskLevel::High),
];

// ---------------------------------------------------------------------------
// Report tagging
// ---------------------------------------------------------------------------

pub const STRENGTHS: &[RatioRule<&str>] = &[
    RatioRule { ratio: Ratio::ProfitMargin, band: Band::above(0.1, "Strong profit margins") },
    RatioRule { ratio: Ratio::CurrentRatio, band: Band::above(1.5, "Excellent liquidity position") },
];

pub const CONCERNS: &[RatioRule<&str>] = &[
    RatioRule { ratio: Ratio::DebtToEquity, band: Band::above(1.5, "High debt burden") },
    RatioRule { ratio: Ratio::ProfitMargin, band: Band::below(0.05, "Low profitability") },
];

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Revenue per employee below this share of the benchmark is flagged
pub const PRODUCTIVITY_BENCHMARK_SHARE: f64 = 0.8;
pub const PRODUCTIVITY_SAVINGS_RATE: f64 = 0.10;

/// Operating expenses above this share of revenue are flagged
pub const OPEX_RATIO_CEILING: f64 = 0.8;
pub const OPEX_SAVINGS_RATE: f64 = 0.15;

/// Inventory turning fewer times a year than this is flagged
pub const INVENTORY_TURNOVER_FLOOR: f64 = 4.0;
pub const INVENTORY_SAVINGS_RATE: f64 = 0.20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_band_wins() {
        assert_eq!(classify(0.9, LIQUIDITY_RISK), Some((Severity::High, 30.0)));
        assert_eq!(classify(1.2, LIQUIDITY_RISK), Some((Severity::Medium, 15.0)));
        assert_eq!(classify(2.0, LIQUIDITY_RISK), Some((Severity::Low, 5.0)));
    }

    #[test]
    fn test_penalty_defaults_to_zero() {
        assert_eq!(penalty(0.2, HEALTH_PROFITABILITY), 0.0);
        assert_eq!(penalty(0.07, HEALTH_PROFITABILITY), 5.0);
    }

    #[test]
    fn test_grade_boundaries_are_inclusive() {
        assert_eq!(classify(20.0, RISK_GRADE), Some(Grade::A));
        assert_eq!(classify(20.5, RISK_GRADE), Some(Grade::B));
        assert_eq!(classify(80.0, SCORE_GRADE), Some(Grade::A));
        assert_eq!(classify(39.9, SCORE_GRADE), Some(Grade::D));
    }
}
