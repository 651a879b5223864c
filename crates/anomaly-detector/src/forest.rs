//! Isolation forest
//!
//! Each tree recursively splits a random subsample on a random feature at a
//! random threshold between that feature's min and max. Points that are easy
//! to isolate (short average path length) are anomalous.

use analysis_core::stats;
use analysis_core::AnalysisError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Subsample ceiling per tree.
const MAX_SAMPLES: usize = 256;
const EULER_GAMMA: f64 = 0.5772156649;

/// Average path length of an unsuccessful BST search over `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub contamination: f64,
    pub seed: u64,
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(data: &[Vec<f64>], max_samples: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let indices = rand::seq::index::sample(&mut rng, data.len(), max_samples).into_vec();
        let max_depth = (max_samples as f64).log2().ceil() as usize;

        Self {
            root: split(data, indices, 0, max_depth, &mut rng),
        }
    }

    fn path_length(&self, x: &[f64]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn split(
    data: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= max_depth || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features that still vary within this node can split it.
    let n_features = data[indices[0]].len();
    let candidates: Vec<(usize, f64, f64)> = (0..n_features)
        .filter_map(|f| {
            let (lo, hi) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                (lo.min(data[i][f]), hi.max(data[i][f]))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    // Interpolated rather than `gen_range(lo..hi)`: the span of two finite
    // extremes can overflow to infinity. Kept in [lo, hi) so both sides get rows.
    let u: f64 = rng.gen();
    let threshold = match (lo * (1.0 - u) + hi * u).clamp(lo, hi) {
        t if t < hi => t,
        _ => lo,
    };
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| data[i][feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(split(data, left, depth + 1, max_depth, rng)),
        right: Box::new(split(data, right, depth + 1, max_depth, rng)),
    }
}

/// Fitted forest. Built per call and dropped with it.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    max_samples: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fit on `data` (one row per observation, equal widths).
    pub fn fit(data: &[Vec<f64>], params: ForestParams) -> Result<Self, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "isolation forest needs at least one observation".to_string(),
            ));
        }
        let width = data[0].len();
        if data.iter().any(|row| row.len() != width) {
            return Err(AnalysisError::InvalidData(
                "observations have differing feature counts".to_string(),
            ));
        }
        if params.n_trees == 0 {
            return Err(AnalysisError::InvalidData(
                "isolation forest needs at least one tree".to_string(),
            ));
        }
        if !(params.contamination > 0.0 && params.contamination <= 0.5) {
            return Err(AnalysisError::InvalidData(format!(
                "contamination must be in (0, 0.5], got {}",
                params.contamination
            )));
        }

        let max_samples = data.len().min(MAX_SAMPLES);

        // Draw per-tree seeds up front so the parallel build stays deterministic.
        let mut seeder = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| seeder.gen()).collect();

        let trees: Vec<IsolationTree> = seeds
            .into_par_iter()
            .map(|seed| IsolationTree::grow(data, max_samples, seed))
            .collect();

        let mut forest = Self {
            trees,
            max_samples,
            offset: 0.0,
        };

        let training_scores: Vec<f64> = data.iter().map(|x| forest.score_samples(x)).collect();
        forest.offset = stats::percentile(&training_scores, 100.0 * params.contamination)
            .ok_or_else(|| AnalysisError::CalculationError("empty training scores".to_string()))?;

        Ok(forest)
    }

    /// Negated anomaly score in [-1, 0]; lower is more abnormal.
    pub fn score_samples(&self, x: &[f64]) -> f64 {
        let normaliser = average_path_length(self.max_samples);
        if normaliser == 0.0 {
            return -0.5;
        }
        let mean_depth =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        -(2f64).powf(-mean_depth / normaliser)
    }

    /// Negative values are outliers.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.score_samples(x) - self.offset
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}
