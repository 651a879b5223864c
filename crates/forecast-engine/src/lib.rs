//! Multi-period forecasts of revenue, net income and cash flow.
//!
//! Short histories (fewer than six periods) are extrapolated with a fixed 5%
//! compound growth rate. Longer ones get a one-feature trend fitted on the
//! period index. Every call fits its own model; nothing is cached between
//! requests.

use analysis_core::stats;
use analysis_core::{
    AnalysisError, FinancialStatement, ForecastMethod, ForecastPoint, ForecastSeries, Metric,
    MetricForecast, TrendModel,
};
use std::marker::PhantomData;
use tracing::debug;

pub mod trend;

pub use trend::LinearTrend;

/// Metrics the engine projects, in output order.
pub const TRACKED_METRICS: [Metric; 3] = [Metric::Revenue, Metric::NetIncome, Metric::CashFlow];

/// Histories shorter than this use the compound-growth fallback.
pub const MIN_TREND_HISTORY: usize = 6;

const FALLBACK_GROWTH_RATE: f64 = 0.05;
const FALLBACK_CONFIDENCE: f64 = 0.7;
const MIN_TREND_CONFIDENCE: f64 = 0.5;

pub struct ForecastEngine<M: TrendModel = LinearTrend> {
    _model: PhantomData<M>,
}

impl ForecastEngine<LinearTrend> {
    pub fn new() -> Self {
        Self { _model: PhantomData }
    }
}

impl<M: TrendModel> ForecastEngine<M> {
    /// Engine backed by a custom trend model.
    pub fn with_model() -> Self {
        Self { _model: PhantomData }
    }

    /// Project each tracked metric `horizon` periods past the end of
    /// `history` (chronological, one statement per period).
    pub fn forecast(
        &self,
        history: &[FinancialStatement],
        horizon: usize,
    ) -> Result<ForecastSeries, AnalysisError> {
        if horizon == 0 {
            return Err(AnalysisError::InvalidData(
                "forecast horizon must be at least 1".to_string(),
            ));
        }

        let mut series = ForecastSeries::new();
        let Some(last) = history.last() else {
            return Ok(series);
        };

        if history.len() < MIN_TREND_HISTORY {
            debug!(
                periods = history.len(),
                "short history, using {:.0}% compound growth",
                FALLBACK_GROWTH_RATE * 100.0
            );
            for metric in TRACKED_METRICS {
                if let Some(value) = observe(last, metric) {
                    series.insert(metric, compound_growth(value, horizon));
                }
            }
            return Ok(series);
        }

        for metric in TRACKED_METRICS {
            let observations: Vec<(f64, f64)> = history
                .iter()
                .enumerate()
                .filter_map(|(i, s)| observe(s, metric).map(|v| (i as f64, v)))
                .collect();

            match observations.as_slice() {
                [] => continue,
                [(_, only)] => {
                    debug!(%metric, "single observation, using compound growth");
                    series.insert(metric, compound_growth(*only, horizon));
                }
                _ => {
                    let forecast = self.fit_trend(&observations, history.len(), horizon)?;
                    series.insert(metric, forecast);
                }
            }
        }

        Ok(series)
    }

    fn fit_trend(
        &self,
        observations: &[(f64, f64)],
        periods: usize,
        horizon: usize,
    ) -> Result<MetricForecast, AnalysisError> {
        let model = M::fit(observations)?;

        let observed: Vec<f64> = observations.iter().map(|(_, y)| *y).collect();
        let fitted: Vec<f64> = observations.iter().map(|(x, _)| model.predict(*x)).collect();
        let confidence = trend_confidence(&observed, &fitted);

        // Offset i lands i periods after the last observed index (periods - 1).
        let last_index = (periods - 1) as f64;
        let points = (1..=horizon)
            .map(|i| ForecastPoint {
                period: i,
                value: model.predict(last_index + i as f64),
                confidence,
            })
            .collect();

        Ok(MetricForecast {
            method: ForecastMethod::LinearTrend,
            points,
        })
    }
}

impl Default for ForecastEngine<LinearTrend> {
    fn default() -> Self {
        Self::new()
    }
}

/// `cash_flow` falls back to `operating_cash_flow` on rows that lack it.
fn observe(statement: &FinancialStatement, metric: Metric) -> Option<f64> {
    match metric {
        Metric::CashFlow => statement
            .get(Metric::CashFlow)
            .or_else(|| statement.get(Metric::OperatingCashFlow)),
        other => statement.get(other),
    }
}

fn compound_growth(last_value: f64, horizon: usize) -> MetricForecast {
    let points = (1..=horizon)
        .map(|i| ForecastPoint {
            period: i,
            value: last_value * (1.0 + FALLBACK_GROWTH_RATE).powi(i as i32),
            confidence: FALLBACK_CONFIDENCE,
        })
        .collect();

    MetricForecast {
        method: ForecastMethod::CompoundGrowth,
        points,
    }
}

/// max(0.5, 1 - MAE / mean(observed)), kept within [0, 1].
///
/// A non-positive mean gets the 0.5 floor instead of the formula. There the
/// ratio flips sign and would push even a poor fit of a loss-making series
/// to full confidence.
fn trend_confidence(observed: &[f64], fitted: &[f64]) -> f64 {
    let mean = stats::mean(observed);
    if mean <= 0.0 {
        return MIN_TREND_CONFIDENCE;
    }
    let mae = stats::mean_absolute_error(observed, fitted);
    (1.0 - mae / mean).max(MIN_TREND_CONFIDENCE).min(1.0)
}
