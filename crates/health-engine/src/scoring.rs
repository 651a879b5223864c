use analysis_core::policy;
use analysis_core::{Grade, HealthScore, Ratio, RatioSet, RiskProfile};

/// Composite 0-100 health score.
///
/// Starts at 100 and subtracts profitability, liquidity and leverage
/// penalties plus a quarter of the overall risk score. Missing or undefined
/// ratios cost nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScoreAggregator;

impl HealthScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, ratios: &RatioSet, risk_profile: &RiskProfile) -> HealthScore {
        let penalties = [
            (Ratio::ProfitMargin, policy::HEALTH_PROFITABILITY),
            (Ratio::CurrentRatio, policy::HEALTH_LIQUIDITY),
            (Ratio::DebtToEquity, policy::HEALTH_LEVERAGE),
        ];

        let ratio_penalty: f64 = penalties
            .iter()
            .filter_map(|(ratio, bands)| ratios.get(*ratio).map(|v| policy::penalty(v, bands)))
            .sum();

        let score = (100.0
            - ratio_penalty
            - risk_profile.overall_risk_score * policy::HEALTH_RISK_WEIGHT)
            .clamp(0.0, 100.0);

        HealthScore {
            score,
            grade: policy::classify(score, policy::SCORE_GRADE).unwrap_or(Grade::D),
        }
    }
}
