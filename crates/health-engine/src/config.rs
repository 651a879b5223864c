use analysis_core::{AnalysisError, DenominatorPolicy};
use anomaly_detector::AnomalyConfig;
use risk_assessment::IndustrySignalKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Engine settings. Every field has a default, so a partial JSON object or
/// an empty environment both work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forecast periods when a request does not name a horizon
    pub default_horizon: usize,
    pub denominator_policy: DenominatorPolicy,
    pub anomaly: AnomalyConfig,
    pub industry_signal: IndustrySignalKind,
    /// Only used by the sampled signal
    pub industry_signal_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_horizon: 12,
            denominator_policy: DenominatorPolicy::Undefined,
            anomaly: AnomalyConfig::default(),
            industry_signal: IndustrySignalKind::Midpoint,
            industry_signal_seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `HEALTH_*` variables, after loading `.env`.
    pub fn from_env() -> Result<Self, AnalysisError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("HEALTH_FORECAST_HORIZON") {
            config.default_horizon = parse("HEALTH_FORECAST_HORIZON", &raw)?;
            if config.default_horizon == 0 {
                return Err(AnalysisError::InvalidData(
                    "HEALTH_FORECAST_HORIZON must be at least 1".to_string(),
                ));
            }
        }

        if let Some(raw) = lookup("HEALTH_DENOMINATOR_POLICY") {
            config.denominator_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "clamp" | "clamp_to_one" => DenominatorPolicy::ClampToOne,
                "undefined" => DenominatorPolicy::Undefined,
                other => {
                    return Err(AnalysisError::InvalidData(format!(
                        "HEALTH_DENOMINATOR_POLICY must be clamp or undefined, got '{}'",
                        other
                    )))
                }
            };
        }

        if let Some(raw) = lookup("HEALTH_ANOMALY_CONTAMINATION") {
            let contamination: f64 = parse("HEALTH_ANOMALY_CONTAMINATION", &raw)?;
            if !(contamination > 0.0 && contamination <= 0.5) {
                return Err(AnalysisError::InvalidData(format!(
                    "HEALTH_ANOMALY_CONTAMINATION must be in (0, 0.5], got {}",
                    contamination
                )));
            }
            config.anomaly.contamination = contamination;
        }

        if let Some(raw) = lookup("HEALTH_ANOMALY_TREES") {
            config.anomaly.trees = parse("HEALTH_ANOMALY_TREES", &raw)?;
            if config.anomaly.trees == 0 {
                return Err(AnalysisError::InvalidData(
                    "HEALTH_ANOMALY_TREES must be at least 1".to_string(),
                ));
            }
        }

        if let Some(raw) = lookup("HEALTH_ANOMALY_SEED") {
            config.anomaly.seed = parse("HEALTH_ANOMALY_SEED", &raw)?;
        }

        if let Some(raw) = lookup("HEALTH_INDUSTRY_SIGNAL") {
            config.industry_signal = match raw.trim().to_ascii_lowercase().as_str() {
                "midpoint" => IndustrySignalKind::Midpoint,
                "sampled" => IndustrySignalKind::Sampled,
                other => {
                    return Err(AnalysisError::InvalidData(format!(
                        "HEALTH_INDUSTRY_SIGNAL must be midpoint or sampled, got '{}'",
                        other
                    )))
                }
            };
        }

        if let Some(raw) = lookup("HEALTH_INDUSTRY_SIGNAL_SEED") {
            config.industry_signal_seed = Some(parse("HEALTH_INDUSTRY_SIGNAL_SEED", &raw)?);
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AnalysisError> {
    raw.trim()
        .parse()
        .map_err(|_| AnalysisError::InvalidData(format!("{} has an invalid value: '{}'", key, raw)))
}
