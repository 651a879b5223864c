use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Statement keys the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    NetIncome,
    CurrentAssets,
    CurrentLiabilities,
    TotalDebt,
    TotalEquity,
    TotalAssets,
    Inventory,
    AccountsReceivable,
    AccountsPayable,
    CostOfGoodsSold,
    OperatingExpenses,
    OperatingCashFlow,
    EmployeeCount,
    /// Period cash flow, only meaningful on history rows
    CashFlow,
}

impl Metric {
    /// The 14 snapshot keys, in schema order.
    pub const SNAPSHOT: [Metric; 14] = [
        Metric::Revenue,
        Metric::NetIncome,
        Metric::CurrentAssets,
        Metric::CurrentLiabilities,
        Metric::TotalDebt,
        Metric::TotalEquity,
        Metric::TotalAssets,
        Metric::Inventory,
        Metric::AccountsReceivable,
        Metric::AccountsPayable,
        Metric::CostOfGoodsSold,
        Metric::OperatingExpenses,
        Metric::OperatingCashFlow,
        Metric::EmployeeCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::NetIncome => "net_income",
            Metric::CurrentAssets => "current_assets",
            Metric::CurrentLiabilities => "current_liabilities",
            Metric::TotalDebt => "total_debt",
            Metric::TotalEquity => "total_equity",
            Metric::TotalAssets => "total_assets",
            Metric::Inventory => "inventory",
            Metric::AccountsReceivable => "accounts_receivable",
            Metric::AccountsPayable => "accounts_payable",
            Metric::CostOfGoodsSold => "cost_of_goods_sold",
            Metric::OperatingExpenses => "operating_expenses",
            Metric::OperatingCashFlow => "operating_cash_flow",
            Metric::EmployeeCount => "employee_count",
            Metric::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One period's financial figures, keyed by metric name.
///
/// A key that is absent means "unknown", never zero. Non-finite values are
/// stored as given but every accessor treats them as absent, so a NaN can
/// never leak into a ratio or a feature vector.
///
/// Deserializing skips fields that are not numbers (names, nulls, flags), so
/// a statement exported with descriptive fields still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FinancialStatement {
    values: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for FinancialStatement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = BTreeMap::<String, FieldValue>::deserialize(deserializer)?;
        let values = fields
            .into_iter()
            .filter_map(|(key, value)| match value {
                FieldValue::Number(v) => Some((key, v)),
                FieldValue::Other(_) => None,
            })
            .collect();
        Ok(Self { values })
    }
}

impl FinancialStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric.as_str().to_string(), value);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.get_raw(metric.as_str())
    }

    /// Lookup by arbitrary key; unrecognized keys are kept for round-tripping.
    pub fn get_raw(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.get(metric).is_some()
    }

    /// Finite values only.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(Metric, f64)> for FinancialStatement {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        let mut statement = Self::new();
        for (metric, value) in iter {
            statement.set(metric, value);
        }
        statement
    }
}
