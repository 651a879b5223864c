//! Rule-based risk assessment
//!
//! Liquidity, credit and operational risk come from the threshold policy;
//! each industry risk factor adds `intensity * weight * 20` on top. The total
//! is clamped to [0, 100] and mapped to a letter grade.

use analysis_core::policy::{self, Band};
use analysis_core::{
    DenominatorPolicy, FinancialStatement, Grade, Industry, IndustryRiskSignal, Ratio, RatioSet,
    RiskProfile, Severity,
};
use ratio_analysis::RatioCalculator;
use std::collections::BTreeMap;
use tracing::debug;

use crate::signal::MidpointSignal;

const CORE_CATEGORIES: [(&str, Ratio, &[Band<(Severity, f64)>]); 3] = [
    ("liquidity_risk", Ratio::CurrentRatio, policy::LIQUIDITY_RISK),
    ("credit_risk", Ratio::DebtToEquity, policy::CREDIT_RISK),
    ("operational_risk", Ratio::ProfitMargin, policy::OPERATIONAL_RISK),
];

/// Map an overall risk score to its grade.
pub fn risk_grade(score: f64) -> Grade {
    policy::classify(score, policy::RISK_GRADE).unwrap_or(Grade::D)
}

pub struct RiskAssessor {
    calculator: RatioCalculator,
    signal: Box<dyn IndustryRiskSignal>,
}

impl RiskAssessor {
    pub fn new() -> Self {
        Self {
            calculator: RatioCalculator::new(),
            signal: Box::new(MidpointSignal),
        }
    }

    pub fn with_signal(mut self, signal: Box<dyn IndustryRiskSignal>) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_policy(mut self, policy: DenominatorPolicy) -> Self {
        self.calculator = RatioCalculator::with_policy(policy);
        self
    }

    /// Assess a statement from scratch.
    pub fn assess(&self, statement: &FinancialStatement, industry: Industry) -> RiskProfile {
        let ratios = self.calculator.compute(statement);
        self.assess_with_ratios(statement, &ratios, industry)
    }

    /// Assess using ratios that were already computed for this statement.
    pub fn assess_with_ratios(
        &self,
        statement: &FinancialStatement,
        ratios: &RatioSet,
        industry: Industry,
    ) -> RiskProfile {
        let mut risks = BTreeMap::new();
        let mut unassessed = Vec::new();
        let mut risk_score = 0.0;

        for (category, ratio, bands) in CORE_CATEGORIES {
            match ratios.get(ratio).and_then(|v| policy::classify(v, bands)) {
                Some((severity, points)) => {
                    risks.insert(category.to_string(), severity);
                    risk_score += points;
                }
                None => {
                    debug!("{} unassessed: {} missing or undefined", category, ratio);
                    unassessed.push(category.to_string());
                }
            }
        }

        for (factor, weight) in industry.profile().risk_factors {
            let intensity = self.signal.intensity(*factor, statement).clamp(0.0, 1.0);
            let contribution = intensity * weight * policy::INDUSTRY_RISK_SCALE;
            risk_score += contribution;

            let severity =
                policy::classify(contribution, policy::INDUSTRY_RISK).unwrap_or(Severity::Low);
            risks.insert(factor.as_str().to_string(), severity);
        }

        let overall_risk_score = risk_score.clamp(0.0, 100.0);

        RiskProfile {
            risks,
            overall_risk_score,
            risk_grade: risk_grade(overall_risk_score),
            unassessed,
        }
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new()
    }
}
