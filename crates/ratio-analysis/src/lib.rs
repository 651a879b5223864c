use analysis_core::{DenominatorPolicy, FinancialStatement, Metric, Ratio, RatioSet, RatioValue};
use tracing::debug;

pub mod working_capital;

pub use working_capital::WorkingCapitalAnalyzer;

/// Derives the standard liquidity, profitability, leverage and efficiency
/// ratios from a single statement.
///
/// A ratio is only emitted when every operand is present. What happens on a
/// non-positive denominator is decided by the [`DenominatorPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioCalculator {
    policy: DenominatorPolicy,
}

impl RatioCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DenominatorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DenominatorPolicy {
        self.policy
    }

    fn ratio(
        &self,
        statement: &FinancialStatement,
        numerator: Metric,
        denominator: Metric,
    ) -> Option<RatioValue> {
        let n = statement.get(numerator)?;
        let d = statement.get(denominator)?;
        Some(self.policy.divide(n, d))
    }

    fn calculate_current_ratio(&self, statement: &FinancialStatement) -> Option<RatioValue> {
        self.ratio(statement, Metric::CurrentAssets, Metric::CurrentLiabilities)
    }

    fn calculate_profit_margin(&self, statement: &FinancialStatement) -> Option<RatioValue> {
        self.ratio(statement, Metric::NetIncome, Metric::Revenue)
    }

    fn calculate_debt_to_equity(&self, statement: &FinancialStatement) -> Option<RatioValue> {
        self.ratio(statement, Metric::TotalDebt, Metric::TotalEquity)
    }

    fn calculate_asset_turnover(&self, statement: &FinancialStatement) -> Option<RatioValue> {
        self.ratio(statement, Metric::Revenue, Metric::TotalAssets)
    }

    /// current_ratio, profit_margin, debt_to_equity, asset_turnover
    pub fn compute(&self, statement: &FinancialStatement) -> RatioSet {
        let mut ratios = RatioSet::new();

        let candidates = [
            (Ratio::CurrentRatio, self.calculate_current_ratio(statement)),
            (Ratio::ProfitMargin, self.calculate_profit_margin(statement)),
            (Ratio::DebtToEquity, self.calculate_debt_to_equity(statement)),
            (Ratio::AssetTurnover, self.calculate_asset_turnover(statement)),
        ];

        for (ratio, value) in candidates {
            match value {
                Some(v) => ratios.insert(ratio, v),
                None => debug!("{} omitted: operands missing", ratio),
            }
        }

        ratios
    }

    /// Base ratios merged with the working-capital day counts.
    pub fn compute_all(&self, statement: &FinancialStatement) -> RatioSet {
        let mut ratios = self.compute(statement);
        ratios.merge(WorkingCapitalAnalyzer::with_policy(self.policy).compute(statement));
        ratios
    }
}
