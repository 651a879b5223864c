//! Working-capital day counts: DSO, DIO, DPO and the cash conversion cycle.

use analysis_core::{DenominatorPolicy, FinancialStatement, Metric, Ratio, RatioSet, RatioValue};

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkingCapitalAnalyzer {
    policy: DenominatorPolicy,
}

impl WorkingCapitalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DenominatorPolicy) -> Self {
        Self { policy }
    }

    fn days(
        &self,
        statement: &FinancialStatement,
        balance: Metric,
        flow: Metric,
    ) -> Option<RatioValue> {
        let b = statement.get(balance)?;
        let f = statement.get(flow)?;
        Some(match self.policy.divide(b, f) {
            RatioValue::Defined(v) => RatioValue::Defined(v * DAYS_PER_YEAR),
            RatioValue::Undefined => RatioValue::Undefined,
        })
    }

    /// dso, dio, dpo, and cash_conversion_cycle when all three are present
    pub fn compute(&self, statement: &FinancialStatement) -> RatioSet {
        let mut metrics = RatioSet::new();

        let dso = self.days(statement, Metric::AccountsReceivable, Metric::Revenue);
        let dio = self.days(statement, Metric::Inventory, Metric::CostOfGoodsSold);
        let dpo = self.days(statement, Metric::AccountsPayable, Metric::CostOfGoodsSold);

        for (ratio, value) in [(Ratio::Dso, dso), (Ratio::Dio, dio), (Ratio::Dpo, dpo)] {
            if let Some(v) = value {
                metrics.insert(ratio, v);
            }
        }

        if let (Some(dso), Some(dio), Some(dpo)) = (dso, dio, dpo) {
            let ccc = match (dso.defined(), dio.defined(), dpo.defined()) {
                (Some(s), Some(i), Some(p)) => RatioValue::Defined(s + i - p),
                _ => RatioValue::Undefined,
            };
            metrics.insert(Ratio::CashConversionCycle, ccc);
        }

        metrics
    }
}
