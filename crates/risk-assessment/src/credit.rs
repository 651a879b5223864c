//! Creditworthiness check: a 100-point score with itemised risk factors.

use analysis_core::policy::{self, Band};
use analysis_core::{CreditAssessment, FinancialStatement, Grade, Metric, Ratio, RatioSet, RiskLevel};

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditAssessor;

impl CreditAssessor {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, statement: &FinancialStatement, ratios: &RatioSet) -> CreditAssessment {
        let checks: [(Option<f64>, &[Band<(f64, &str)>]); 4] = [
            (ratios.get(Ratio::CurrentRatio), policy::CREDIT_LIQUIDITY),
            (ratios.get(Ratio::DebtToEquity), policy::CREDIT_LEVERAGE),
            (ratios.get(Ratio::ProfitMargin), policy::CREDIT_PROFITABILITY),
            (statement.get(Metric::OperatingCashFlow), policy::CREDIT_CASH_FLOW),
        ];

        let mut score = 100.0;
        let mut risk_factors = Vec::new();

        for (value, bands) in checks {
            if let Some((points, factor)) = value.and_then(|v| policy::classify(v, bands)) {
                score -= points;
                risk_factors.push(factor.to_string());
            }
        }

        let score = f64::max(score, 0.0);

        CreditAssessment {
            score,
            grade: policy::classify(score, policy::SCORE_GRADE).unwrap_or(Grade::D),
            risk_level: policy::classify(score, policy::CREDIT_RISK_LEVEL).unwrap_or(RiskLevel::High),
            risk_factors,
        }
    }
}
