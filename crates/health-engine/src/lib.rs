//! Financial health engine
//!
//! Runs one statement through the full pipeline in data-flow order: ratios,
//! risk and credit assessment, anomaly detection, forecasting,
//! recommendations, health score and report. Everything is synchronous and
//! recomputed per request.

use analysis_core::{
    AnalysisError, AnomalyReport, CreditAssessment, FinancialStatement, ForecastSeries,
    HealthScore, Industry, RatioSet, Recommendation, Report, RiskProfile,
};
use anomaly_detector::AnomalyDetector;
use forecast_engine::ForecastEngine;
use ratio_analysis::RatioCalculator;
use recommendation_engine::RecommendationEngine;
use risk_assessment::{CreditAssessor, RiskAssessor};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod report;
pub mod scoring;

pub use config::EngineConfig;
pub use report::ReportAssembler;
pub use scoring::HealthScoreAggregator;

/// One analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub statement: FinancialStatement,
    /// Industry tag, case-insensitive; unknown or absent means services
    #[serde(default)]
    pub industry: Option<String>,
    /// Chronological statements, one per period, for forecasting
    #[serde(default)]
    pub history: Option<Vec<FinancialStatement>>,
    /// Peer or prior-period snapshots for anomaly detection
    #[serde(default)]
    pub reference: Option<Vec<FinancialStatement>>,
    #[serde(default)]
    pub horizon: Option<usize>,
}

impl AnalysisRequest {
    pub fn new(statement: FinancialStatement) -> Self {
        Self {
            statement,
            ..Default::default()
        }
    }

    pub fn industry(mut self, tag: impl Into<String>) -> Self {
        self.industry = Some(tag.into());
        self
    }

    pub fn history(mut self, history: Vec<FinancialStatement>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn reference(mut self, reference: Vec<FinancialStatement>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }
}

/// Everything the pipeline produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub ratios: RatioSet,
    pub risk_profile: RiskProfile,
    pub credit: CreditAssessment,
    pub anomalies: AnomalyReport,
    pub forecasts: ForecastSeries,
    pub recommendations: Vec<Recommendation>,
    pub health_score: HealthScore,
    pub report: Report,
}

pub struct FinancialHealthEngine {
    config: EngineConfig,
    calculator: RatioCalculator,
    risk_assessor: RiskAssessor,
    credit_assessor: CreditAssessor,
    anomaly_detector: AnomalyDetector,
    forecaster: ForecastEngine,
    recommender: RecommendationEngine,
    assembler: ReportAssembler,
}

impl FinancialHealthEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine configured from `.env` and `HEALTH_*` variables.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Ok(Self::with_config(EngineConfig::from_env()?))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let signal = config.industry_signal.build(config.industry_signal_seed);

        Self {
            calculator: RatioCalculator::with_policy(config.denominator_policy),
            risk_assessor: RiskAssessor::new()
                .with_policy(config.denominator_policy)
                .with_signal(signal),
            credit_assessor: CreditAssessor::new(),
            anomaly_detector: AnomalyDetector::with_config(config.anomaly),
            forecaster: ForecastEngine::new(),
            recommender: RecommendationEngine::new(),
            assembler: ReportAssembler::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<FinancialAnalysis, AnalysisError> {
        let industry = Industry::resolve(request.industry.as_deref());
        let span = tracing::info_span!("analyze", industry = industry.as_str());
        let _guard = span.enter();

        let statement = &request.statement;
        let horizon = request.horizon.unwrap_or(self.config.default_horizon);

        let ratios = self.calculator.compute_all(statement);
        let risk_profile = self
            .risk_assessor
            .assess_with_ratios(statement, &ratios, industry);
        let credit = self.credit_assessor.assess(statement, &ratios);

        let anomalies = match request.reference.as_deref() {
            Some(reference) if !reference.is_empty() => {
                self.anomaly_detector.detect_against(statement, reference)?
            }
            _ => self.anomaly_detector.detect(statement)?,
        };

        let forecasts = match request.history.as_deref() {
            Some(history) if !history.is_empty() => self.forecaster.forecast(history, horizon)?,
            _ => self
                .forecaster
                .forecast(std::slice::from_ref(statement), horizon)?,
        };

        let recommendations = self.recommender.generate(statement, &ratios, industry);
        let report = self.assembler.assemble(
            statement,
            &ratios,
            &forecasts,
            &risk_profile,
            &recommendations,
            industry,
        );
        let health_score = report.health_score;

        tracing::info!(
            "Analysis complete: health {:.1} ({}), risk {:.1} ({}), {} recommendations",
            health_score.score,
            health_score.grade.as_str(),
            risk_profile.overall_risk_score,
            risk_profile.risk_grade.as_str(),
            recommendations.len()
        );
        if anomalies.is_anomalous {
            tracing::warn!(
                "Statement flagged anomalous (score {:.3}, {} contributing metrics)",
                anomalies.anomaly_score,
                anomalies.anomalies.len()
            );
        }

        Ok(FinancialAnalysis {
            ratios,
            risk_profile,
            credit,
            anomalies,
            forecasts,
            recommendations,
            health_score,
            report,
        })
    }
}

impl Default for FinancialHealthEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        ForecastMethod, Grade, Metric, Ratio, RecommendationCategory, RiskLevel,
    };
    use approx::assert_relative_eq;

    fn statement() -> FinancialStatement {
        FinancialStatement::new()
            .with(Metric::Revenue, 1_000_000.0)
            .with(Metric::NetIncome, 80_000.0)
            .with(Metric::CurrentAssets, 400_000.0)
            .with(Metric::CurrentLiabilities, 250_000.0)
            .with(Metric::TotalDebt, 300_000.0)
            .with(Metric::TotalEquity, 500_000.0)
            .with(Metric::TotalAssets, 900_000.0)
            .with(Metric::Inventory, 120_000.0)
            .with(Metric::AccountsReceivable, 100_000.0)
            .with(Metric::AccountsPayable, 60_000.0)
            .with(Metric::CostOfGoodsSold, 600_000.0)
            .with(Metric::OperatingExpenses, 850_000.0)
            .with(Metric::OperatingCashFlow, 90_000.0)
            .with(Metric::EmployeeCount, 10.0)
    }

    #[test]
    fn test_full_pipeline() {
        let request = AnalysisRequest::new(statement()).industry("Manufacturing");
        let analysis = FinancialHealthEngine::new().analyze(&request).unwrap();

        assert_relative_eq!(analysis.ratios.get(Ratio::CurrentRatio).unwrap(), 1.6);
        assert!(analysis.ratios.contains(Ratio::CashConversionCycle));

        // 5 + 3 + 2 + 9
        assert_relative_eq!(analysis.risk_profile.overall_risk_score, 19.0, epsilon = 1e-9);
        assert_eq!(analysis.risk_profile.risk_grade, Grade::A);

        // 100 - 5 - 19 * 0.25
        assert_relative_eq!(analysis.health_score.score, 90.25, epsilon = 1e-9);
        assert_eq!(analysis.health_score.grade, Grade::A);
        assert_eq!(analysis.report.health_score, analysis.health_score);

        assert_relative_eq!(analysis.credit.score, 100.0);
        assert_eq!(analysis.credit.risk_level, RiskLevel::Low);

        let categories: Vec<_> = analysis.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![RecommendationCategory::Productivity, RecommendationCategory::CostControl]
        );

        assert_eq!(analysis.report.key_strengths, vec!["Excellent liquidity position"]);
        assert!(analysis.report.key_concerns.is_empty());
        assert!(analysis.report.risk_factors.is_empty());
        assert_eq!(analysis.report.industry, Industry::Manufacturing);

        assert!(!analysis.anomalies.is_anomalous);
        assert_eq!(analysis.anomalies.sample_size, 1);
    }

    #[test]
    fn test_single_period_forecast_uses_default_horizon() {
        let analysis = FinancialHealthEngine::new()
            .analyze(&AnalysisRequest::new(statement()))
            .unwrap();

        assert_eq!(analysis.forecasts.len(), 3);
        let cash_flow = &analysis.forecasts[&Metric::CashFlow];
        assert_eq!(cash_flow.method, ForecastMethod::CompoundGrowth);
        assert_eq!(cash_flow.points.len(), 12);
        assert_relative_eq!(cash_flow.points[0].value, 94_500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_history_and_horizon_drive_forecast() {
        let history: Vec<FinancialStatement> = (0..6)
            .map(|i| FinancialStatement::new().with(Metric::Revenue, 500_000.0 + 50_000.0 * i as f64))
            .collect();
        let request = AnalysisRequest::new(statement()).history(history).horizon(2);
        let analysis = FinancialHealthEngine::new().analyze(&request).unwrap();

        let revenue = &analysis.forecasts[&Metric::Revenue];
        assert_eq!(revenue.method, ForecastMethod::LinearTrend);
        assert_relative_eq!(revenue.points[1].value, 850_000.0, epsilon = 1e-6);
        assert!(!analysis.forecasts.contains_key(&Metric::NetIncome));
    }

    #[test]
    fn test_reference_population_is_used() {
        let reference: Vec<FinancialStatement> = (0..20).map(|_| statement()).collect();
        let request = AnalysisRequest::new(statement()).reference(reference);
        let analysis = FinancialHealthEngine::new().analyze(&request).unwrap();
        assert_eq!(analysis.anomalies.sample_size, 21);
    }

    #[test]
    fn test_unknown_industry_falls_back_to_services() {
        let engine = FinancialHealthEngine::new();
        let unknown = engine
            .analyze(&AnalysisRequest::new(statement()).industry("asteroid mining"))
            .unwrap();
        let services = engine
            .analyze(&AnalysisRequest::new(statement()).industry("services"))
            .unwrap();

        assert_eq!(unknown.report.industry, Industry::Services);
        assert_eq!(unknown.risk_profile, services.risk_profile);
        assert_eq!(unknown.recommendations, services.recommendations);
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        let request = AnalysisRequest::new(statement()).horizon(0);
        assert!(matches!(
            FinancialHealthEngine::new().analyze(&request),
            Err(AnalysisError::InvalidData(_))
        ));
    }

    #[test]
    fn test_empty_statement() {
        let analysis = FinancialHealthEngine::new()
            .analyze(&AnalysisRequest::default())
            .unwrap();

        assert!(analysis.ratios.is_empty());
        assert!(analysis.forecasts.is_empty());
        assert!(analysis.recommendations.is_empty());
        assert_eq!(analysis.risk_profile.unassessed.len(), 3);
    }

    #[test]
    fn test_request_from_json() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{
                "statement": {"revenue": 100000, "net_income": -5000, "total_equity": 0, "total_debt": 1000},
                "industry": "RETAIL",
                "horizon": 3
            }"#,
        )
        .unwrap();
        let analysis = FinancialHealthEngine::new().analyze(&request).unwrap();

        assert!(analysis.ratios.is_undefined(Ratio::DebtToEquity));
        assert_eq!(analysis.report.industry, Industry::Retail);
        assert_eq!(analysis.forecasts[&Metric::Revenue].points.len(), 3);

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["ratios"]["debt_to_equity"].is_null());
        assert_eq!(json["report"]["industry"], "retail");
    }

    #[test]
    fn test_clamp_policy_from_config() {
        let config = EngineConfig {
            denominator_policy: analysis_core::DenominatorPolicy::ClampToOne,
            ..EngineConfig::default()
        };
        let statement = FinancialStatement::new()
            .with(Metric::TotalDebt, 1_000.0)
            .with(Metric::TotalEquity, 0.0);
        let analysis = FinancialHealthEngine::with_config(config)
            .analyze(&AnalysisRequest::new(statement))
            .unwrap();

        assert_relative_eq!(analysis.ratios.get(Ratio::DebtToEquity).unwrap(), 1_000.0);
        assert_eq!(
            analysis.risk_profile.severity("credit_risk"),
            Some(analysis_core::Severity::High)
        );
    }
}
