use analysis_core::policy::{self, RatioRule};
use analysis_core::{
    FinancialStatement, ForecastSeries, Industry, RatioSet, Recommendation, Report, RiskProfile,
};
use chrono::Utc;

use crate::scoring::HealthScoreAggregator;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler {
    aggregator: HealthScoreAggregator,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the investor-facing report from the pipeline's outputs.
    pub fn assemble(
        &self,
        statement: &FinancialStatement,
        ratios: &RatioSet,
        forecasts: &ForecastSeries,
        risk_profile: &RiskProfile,
        recommendations: &[Recommendation],
        industry: Industry,
    ) -> Report {
        tracing::debug!(
            fields = statement.len(),
            ratios = ratios.len(),
            "assembling report"
        );

        Report {
            industry,
            health_score: self.aggregator.score(ratios, risk_profile),
            risk_grade: risk_profile.risk_grade,
            key_strengths: tags(ratios, policy::STRENGTHS),
            key_concerns: tags(ratios, policy::CONCERNS),
            risk_factors: risk_profile.high_risks(),
            financial_metrics: ratios.clone(),
            forecasts: forecasts.clone(),
            recommendations: recommendations.to_vec(),
            generated_at: Utc::now(),
        }
    }
}

fn tags(ratios: &RatioSet, rules: &[RatioRule<&str>]) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| ratios.get(rule.ratio).is_some_and(|v| rule.band.matches(v)))
        .map(|rule| rule.band.outcome.to_string())
        .collect()
}
