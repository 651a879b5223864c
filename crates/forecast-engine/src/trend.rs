use analysis_core::{AnalysisError, TrendModel};
use nalgebra::{DMatrix, DVector};

/// Ordinary least squares line through `(period_index, value)` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendModel for LinearTrend {
    fn fit(observations: &[(f64, f64)]) -> Result<Self, AnalysisError> {
        if observations.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "linear trend needs at least 2 observations, got {}",
                observations.len()
            )));
        }

        let n = observations.len();
        let design = DMatrix::from_fn(n, 2, |row, col| {
            if col == 0 {
                1.0
            } else {
                observations[row].0
            }
        });
        let target = DVector::from_iterator(n, observations.iter().map(|(_, y)| *y));

        let coefficients = design
            .svd(true, true)
            .solve(&target, 1e-12)
            .map_err(|e| AnalysisError::CalculationError(format!("least squares failed: {}", e)))?;

        let (intercept, slope) = (coefficients[0], coefficients[1]);
        if !intercept.is_finite() || !slope.is_finite() {
            return Err(AnalysisError::CalculationError(
                "least squares produced a non-finite coefficient".to_string(),
            ));
        }

        Ok(Self { intercept, slope })
    }

    fn predict(&self, period_index: f64) -> f64 {
        self.intercept + self.slope * period_index
    }
}
