use crate::{Industry, Metric, RatioSet};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a risk category or an anomalous feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Letter grade shared by risk, credit and health scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

/// Per-category risk severities plus the clamped aggregate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Category key (`liquidity_risk`, `credit_risk`, `inventory_risk`, ...) to severity
    pub risks: BTreeMap<String, Severity>,
    /// 0 to 100
    pub overall_risk_score: f64,
    pub risk_grade: Grade,
    /// Categories skipped because their ratio was missing or undefined
    #[serde(default)]
    pub unassessed: Vec<String>,
}

impl RiskProfile {
    pub fn severity(&self, category: &str) -> Option<Severity> {
        self.risks.get(category).copied()
    }

    /// Categories classified High, in key order.
    pub fn high_risks(&self) -> Vec<String> {
        self.risks
            .iter()
            .filter(|(_, s)| **s == Severity::High)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// How a metric's forecast was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    CompoundGrowth,
    LinearTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Periods after the last observed one, starting at 1
    pub period: usize,
    pub value: f64,
    /// 0.0 to 1.0, a reliability proxy rather than a statistical interval
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricForecast {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
}

impl MetricForecast {
    pub fn predictions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn confidences(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.confidence).collect()
    }
}

/// Forecasts keyed by tracked metric (revenue, net_income, cash_flow)
pub type ForecastSeries = BTreeMap<Metric, MetricForecast>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub metric: String,
    pub value: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomaly_score: f64,
    pub is_anomalous: bool,
    pub anomalies: Vec<Anomaly>,
    pub schema_version: u32,
    /// Observations the model was fitted on, current snapshot included
    pub sample_size: usize,
}

impl AnomalyReport {
    pub fn empty(schema_version: u32) -> Self {
        Self {
            anomaly_score: 0.0,
            is_anomalous: false,
            anomalies: Vec::new(),
            schema_version,
            sample_size: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationCategory {
    Productivity,
    #[serde(rename = "Cost Control")]
    CostControl,
    #[serde(rename = "Inventory Management")]
    InventoryManagement,
    Liquidity,
    Profitability,
    Leverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0 to 100
    pub score: f64,
    pub grade: Grade,
}

/// Coarse band used alongside the credit grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub score: f64,
    pub grade: Grade,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

/// Investor-facing summary of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub industry: Industry,
    pub health_score: HealthScore,
    pub risk_grade: Grade,
    pub key_strengths: Vec<String>,
    pub key_concerns: Vec<String>,
    /// Risk categories classified High
    pub risk_factors: Vec<String>,
    pub financial_metrics: RatioSet,
    pub forecasts: ForecastSeries,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}
