//! Industry risk signals
//!
//! The industry-specific term of the risk score has no real business input
//! behind it yet: historically it was a uniform draw in [0.1, 0.8] scaled by
//! the factor weight. These signals keep that contract behind
//! [`IndustryRiskSignal`] so a metric-driven source can replace them without
//! touching the assessor.

use analysis_core::{FinancialStatement, IndustryRiskSignal, RiskFactor};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const DRAW_LOW: f64 = 0.1;
const DRAW_HIGH: f64 = 0.8;

/// Which built-in signal to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustrySignalKind {
    #[default]
    Midpoint,
    Sampled,
}

impl IndustrySignalKind {
    pub fn build(&self, seed: Option<u64>) -> Box<dyn IndustryRiskSignal> {
        match self {
            IndustrySignalKind::Midpoint => Box::new(MidpointSignal),
            IndustrySignalKind::Sampled => Box::new(SampledSignal { seed }),
        }
    }
}

/// Deterministic: the expected value of the legacy draw for every factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSignal;

impl IndustryRiskSignal for MidpointSignal {
    fn intensity(&self, _factor: RiskFactor, _statement: &FinancialStatement) -> f64 {
        (DRAW_LOW + DRAW_HIGH) / 2.0
    }
}

/// The legacy uniform draw. With a seed, each factor gets its own
/// reproducible stream; without one, the thread RNG is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledSignal {
    pub seed: Option<u64>,
}

impl IndustryRiskSignal for SampledSignal {
    fn intensity(&self, factor: RiskFactor, _statement: &FinancialStatement) -> f64 {
        match self.seed {
            Some(seed) => {
                let stream = (factor as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                StdRng::seed_from_u64(seed ^ stream).gen_range(DRAW_LOW..DRAW_HIGH)
            }
            None => thread_rng().gen_range(DRAW_LOW..DRAW_HIGH),
        }
    }
}
