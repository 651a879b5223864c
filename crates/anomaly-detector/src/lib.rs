//! Unusual-metric detection for a single financial snapshot.
//!
//! Features follow a versioned schema so reports stay comparable when the
//! recognized statement keys change. An isolation forest is fitted on data
//! owned by each call, either the snapshot alone or the snapshot plus a
//! reference population of peer or prior-period snapshots.

use analysis_core::stats;
use analysis_core::{AnalysisError, Anomaly, AnomalyReport, FinancialStatement, Metric, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod forest;

pub use forest::{ForestParams, IsolationForest};

/// Feature schema v1: the 14 recognized snapshot keys, in this order.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;
pub const FEATURE_SCHEMA: [Metric; 14] = Metric::SNAPSHOT;

const MIN_FEATURES: usize = 3;
const CONTRIBUTOR_UPPER_PERCENTILE: f64 = 95.0;
const CONTRIBUTOR_LOWER_PERCENTILE: f64 = 5.0;
const HIGH_SEVERITY_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    pub contamination: f64,
    pub trees: usize,
    pub seed: u64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            trees: 100,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Score a snapshot on its own.
    ///
    /// A forest fitted on one observation scores it exactly at its offset,
    /// so this form never flags anything. Use [`Self::detect_against`] when
    /// a reference population exists.
    pub fn detect(&self, statement: &FinancialStatement) -> Result<AnomalyReport, AnalysisError> {
        let features = extract_features(statement);
        if features.len() < MIN_FEATURES {
            debug!(features = features.len(), "too few features for anomaly detection");
            return Ok(AnomalyReport::empty(FEATURE_SCHEMA_VERSION));
        }

        let row: Vec<f64> = features.iter().map(|(_, v)| *v).collect();
        let forest = IsolationForest::fit(std::slice::from_ref(&row), self.params())?;
        let score = forest.decision_function(&row);
        let is_anomalous = score < 0.0;

        let mut anomalies = Vec::new();
        if is_anomalous {
            let magnitudes: Vec<f64> = row.iter().map(|v| v.abs()).collect();
            if let Some(cutoff) = stats::percentile(&magnitudes, CONTRIBUTOR_UPPER_PERCENTILE) {
                anomalies = features
                    .iter()
                    .filter(|(_, v)| v.abs() > cutoff)
                    .map(|(metric, v)| anomaly(*metric, *v, score))
                    .collect();
            }
        }

        Ok(AnomalyReport {
            anomaly_score: score,
            is_anomalous,
            anomalies,
            schema_version: FEATURE_SCHEMA_VERSION,
            sample_size: 1,
        })
    }

    /// Score a snapshot against a reference population.
    ///
    /// The forest uses the features present on `statement`; reference
    /// snapshots missing any of them are left out. Contributors are features
    /// outside the 5th..95th percentile band of that feature across the
    /// reference, on either side.
    pub fn detect_against(
        &self,
        statement: &FinancialStatement,
        reference: &[FinancialStatement],
    ) -> Result<AnomalyReport, AnalysisError> {
        let features = extract_features(statement);
        if features.len() < MIN_FEATURES {
            debug!(features = features.len(), "too few features for anomaly detection");
            return Ok(AnomalyReport::empty(FEATURE_SCHEMA_VERSION));
        }

        let reference_rows: Vec<Vec<f64>> = reference
            .iter()
            .filter_map(|peer| features.iter().map(|(metric, _)| peer.get(*metric)).collect())
            .collect();

        if reference_rows.len() < reference.len() {
            debug!(
                dropped = reference.len() - reference_rows.len(),
                "reference snapshots missing features were skipped"
            );
        }
        if reference_rows.is_empty() {
            return self.detect(statement);
        }

        let current: Vec<f64> = features.iter().map(|(_, v)| *v).collect();
        let mut training = reference_rows.clone();
        training.push(current.clone());

        let forest = IsolationForest::fit(&training, self.params())?;
        let score = forest.decision_function(&current);
        let is_anomalous = score < 0.0;

        let mut anomalies = Vec::new();
        if is_anomalous {
            for (column, (metric, value)) in features.iter().enumerate() {
                let population: Vec<f64> = reference_rows.iter().map(|row| row[column]).collect();
                let above = stats::percentile(&population, CONTRIBUTOR_UPPER_PERCENTILE)
                    .is_some_and(|cutoff| *value > cutoff);
                let below = stats::percentile(&population, CONTRIBUTOR_LOWER_PERCENTILE)
                    .is_some_and(|cutoff| *value < cutoff);
                if above || below {
                    anomalies.push(anomaly(*metric, *value, score));
                }
            }
        }

        debug!(
            score,
            is_anomalous,
            sample_size = training.len(),
            "anomaly detection complete"
        );

        Ok(AnomalyReport {
            anomaly_score: score,
            is_anomalous,
            anomalies,
            schema_version: FEATURE_SCHEMA_VERSION,
            sample_size: training.len(),
        })
    }

    fn params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.config.trees,
            contamination: self.config.contamination,
            seed: self.config.seed,
        }
    }
}

/// Finite schema features present on the statement, in schema order.
pub fn extract_features(statement: &FinancialStatement) -> Vec<(Metric, f64)> {
    FEATURE_SCHEMA
        .iter()
        .filter_map(|metric| {
            statement
                .get(*metric)
                .filter(|v| v.is_finite())
                .map(|v| (*metric, v))
        })
        .collect()
}

fn anomaly(metric: Metric, value: f64, score: f64) -> Anomaly {
    let severity = if score.abs() > HIGH_SEVERITY_SCORE {
        Severity::High
    } else {
        Severity::Medium
    };
    Anomaly {
        metric: metric.as_str().to_string(),
        value,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FinancialStatement {
        FinancialStatement::new()
            .with(Metric::Revenue, 1_000_000.0)
            .with(Metric::NetIncome, 80_000.0)
            .with(Metric::CurrentAssets, 400_000.0)
            .with(Metric::CurrentLiabilities, 250_000.0)
            .with(Metric::TotalDebt, 300_000.0)
            .with(Metric::TotalEquity, 500_000.0)
            .with(Metric::TotalAssets, 900_000.0)
            .with(Metric::Inventory, 120_000.0)
    }

    fn scaled(factor: f64) -> FinancialStatement {
        let mut statement = FinancialStatement::new();
        for (key, value) in base().iter() {
            statement.insert(key, value * factor);
        }
        statement
    }

    fn reference() -> Vec<FinancialStatement> {
        (0..30)
            .map(|k| scaled(1.0 + 0.01 * (k as f64 - 15.0)))
            .collect()
    }

    #[test]
    fn test_too_few_features_gives_empty_report() {
        let statement = FinancialStatement::new()
            .with(Metric::Revenue, 1_000.0)
            .with(Metric::NetIncome, 10.0);
        let report = AnomalyDetector::new().detect(&statement).unwrap();

        assert!(!report.is_anomalous);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.anomaly_score, 0.0);
        assert_eq!(report.schema_version, 1);
        assert_eq!(report.sample_size, 0);
    }

    #[test]
    fn test_single_snapshot_is_never_anomalous() {
        let report = AnomalyDetector::new().detect(&base()).unwrap();

        assert!(!report.is_anomalous);
        assert_eq!(report.anomaly_score, 0.0);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.sample_size, 1);
    }

    #[test]
    fn test_extract_features_follows_schema_order() {
        let statement = FinancialStatement::new()
            .with(Metric::EmployeeCount, 12.0)
            .with(Metric::Revenue, 5.0)
            .with(Metric::CashFlow, 3.0);
        let features = extract_features(&statement);
        assert_eq!(features, vec![(Metric::Revenue, 5.0), (Metric::EmployeeCount, 12.0)]);
    }

    #[test]
    fn test_outlier_against_reference() {
        // every feature blown up except total_equity
        let mut outlier = scaled(10.0);
        outlier.set(Metric::TotalEquity, 500_000.0);

        let report = AnomalyDetector::new()
            .detect_against(&outlier, &reference())
            .unwrap();

        assert!(report.is_anomalous);
        assert!(report.anomaly_score < 0.0);
        assert_eq!(report.sample_size, 31);

        let flagged: Vec<&str> = report.anomalies.iter().map(|a| a.metric.as_str()).collect();
        assert_eq!(flagged.len(), 7);
        assert!(flagged.contains(&"revenue"));
        assert!(!flagged.contains(&"total_equity"));

        let expected = if report.anomaly_score.abs() > 0.5 {
            Severity::High
        } else {
            Severity::Medium
        };
        assert!(report.anomalies.iter().all(|a| a.severity == expected));
    }

    #[test]
    fn test_typical_snapshot_against_reference() {
        let report = AnomalyDetector::new()
            .detect_against(&scaled(1.0), &reference())
            .unwrap();

        assert!(!report.is_anomalous);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_reference_rows_missing_features_are_skipped() {
        let mut peers = reference();
        peers.push(FinancialStatement::new().with(Metric::Revenue, 1.0));

        let report = AnomalyDetector::new()
            .detect_against(&scaled(1.0), &peers)
            .unwrap();
        assert_eq!(report.sample_size, 31);
    }

    #[test]
    fn test_empty_reference_matches_single_snapshot() {
        let detector = AnomalyDetector::new();
        assert_eq!(
            detector.detect_against(&base(), &[]).unwrap(),
            detector.detect(&base()).unwrap()
        );
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = AnomalyDetector::new();
        let outlier = scaled(4.0);
        let first = detector.detect_against(&outlier, &reference()).unwrap();
        let second = detector.detect_against(&outlier, &reference()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_collapse_below_reference_is_reported() {
        let mut outlier = scaled(1.0);
        outlier.set(Metric::NetIncome, -5_000_000.0);
        outlier.set(Metric::TotalEquity, -2_000_000.0);

        let report = AnomalyDetector::new()
            .detect_against(&outlier, &reference())
            .unwrap();

        assert!(report.is_anomalous);
        let flagged: Vec<&str> = report.anomalies.iter().map(|a| a.metric.as_str()).collect();
        assert_eq!(flagged, vec![Metric::NetIncome.as_str(), Metric::TotalEquity.as_str()]);
    }

    #[test]
    fn test_extreme_magnitudes_against_reference() {
        let current = FinancialStatement::new()
            .with(Metric::Revenue, 1e308)
            .with(Metric::NetIncome, -1e308)
            .with(Metric::TotalAssets, 5.0);
        let peers: Vec<FinancialStatement> = (0..10)
            .map(|k| {
                FinancialStatement::new()
                    .with(Metric::Revenue, -1e308 + k as f64)
                    .with(Metric::NetIncome, 1e308)
                    .with(Metric::TotalAssets, 5.0 + k as f64)
            })
            .collect();

        let report = AnomalyDetector::new()
            .detect_against(&current, &peers)
            .unwrap();
        assert!(report.anomaly_score.is_finite());
        assert_eq!(report.sample_size, 11);
    }
}
