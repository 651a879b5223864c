use crate::{AnalysisError, FinancialStatement, RiskFactor};

/// Source of the industry-specific risk term.
///
/// Returns how strongly `factor` applies to the business, in [0, 1]; the
/// assessor scales it by the factor's industry weight.
pub trait IndustryRiskSignal: Send + Sync {
    fn intensity(&self, factor: RiskFactor, statement: &FinancialStatement) -> f64;
}

/// One-feature regression of a metric on its period index.
///
/// Implementations are fitted per call and never shared between requests.
pub trait TrendModel: Sized {
    /// Fit on `(period_index, value)` observations.
    fn fit(observations: &[(f64, f64)]) -> Result<Self, AnalysisError>;

    fn predict(&self, period_index: f64) -> f64;
}
