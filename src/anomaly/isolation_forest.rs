//! Isolation Forest anomaly detection

use crate::anomaly::AnomalyDetector;
use crate::error::{AnacomusError, Result};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand::seq::index;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsolationTree {
    /// Internal node with split
    Internal {
        /// Feature index for split
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Left subtree (values < threshold)
        left: Box<IsolationTree>,
        /// Right subtree (values >= threshold)
        right: Box<IsolationTree>,
    },
    /// External (leaf) node
    External {
        /// Number of samples in this node
        size: usize,
    },
}

impl IsolationTree {
    /// Build an isolation tree over the rows in `indices`
    pub fn build(
        x: &Array2<f64>,
        indices: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let n_samples = indices.len();

        if height >= max_height || n_samples <= 1 {
            return IsolationTree::External { size: n_samples };
        }

        // Only features that still vary within this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|feature| {
                let (min_val, max_val) = indices.iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &i| (lo.min(x[[i, feature]]), hi.max(x[[i, feature]])),
                );
                (max_val - min_val > 1e-12).then_some((feature, min_val, max_val))
            })
            .collect();

        let Some(&(feature, min_val, max_val)) = candidates.choose(&mut *rng) else {
            return IsolationTree::External { size: n_samples };
        };

        let threshold = rng.gen_range(min_val..max_val);

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature]] <= threshold);

        // threshold in [min, max): the minimum goes left, the maximum right
        debug_assert!(!left_indices.is_empty() && !right_indices.is_empty());

        let left = Box::new(Self::build(x, &left_indices, height + 1, max_height, rng));
        let right = Box::new(Self::build(x, &right_indices, height + 1, max_height, rng));

        IsolationTree::Internal {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Compute path length for a sample
    pub fn path_length(&self, sample: &[f64], current_height: usize) -> f64 {
        match self {
            IsolationTree::External { size } => current_height as f64 + average_path_length(*size),
            IsolationTree::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] <= *threshold {
                    left.path_length(sample, current_height + 1)
                } else {
                    right.path_length(sample, current_height + 1)
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            IsolationTree::External { .. } => 1,
            IsolationTree::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

/// Average path length of an unsuccessful search in a BST of `n` nodes.
///
/// c(n) = 2 * H(n-1) - 2(n-1)/n, with H(i) ~ ln(i) + Euler's constant.
pub fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else if n == 2 {
        1.0
    } else {
        let n_f = n as f64;
        2.0 * ((n_f - 1.0).ln() + EULER_GAMMA) - 2.0 * (n_f - 1.0) / n_f
    }
}

/// How many rows each tree is grown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxSamples {
    /// min(256, n_samples)
    Auto,
    /// Fixed count, capped at n_samples
    Count(usize),
}

impl MaxSamples {
    fn resolve(self, n_samples: usize) -> usize {
        match self {
            MaxSamples::Auto => n_samples.min(256),
            MaxSamples::Count(k) => k.clamp(1, n_samples),
        }
    }
}

impl Default for MaxSamples {
    fn default() -> Self {
        MaxSamples::Auto
    }
}

/// Isolation Forest anomaly detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Number of trees
    n_estimators: usize,
    /// Rows drawn (without replacement) per tree
    max_samples: MaxSamples,
    /// Contamination ratio (expected proportion of outliers)
    contamination: f64,
    /// Random seed
    seed: Option<u64>,
    /// Fitted trees
    trees: Option<Vec<IsolationTree>>,
    /// Decision offset
    offset: Option<f64>,
    /// Rows each tree was grown on
    samples_per_tree: Option<usize>,
    /// Feature count seen during fit
    n_features: Option<usize>,
}

impl IsolationForest {
    /// Create new Isolation Forest
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            max_samples: MaxSamples::Auto,
            contamination: 0.1,
            seed: None,
            trees: None,
            offset: None,
            samples_per_tree: None,
            n_features: None,
        }
    }

    /// Set number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    /// Set rows per tree
    pub fn with_max_samples(mut self, max_samples: MaxSamples) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Set contamination ratio; validated in `fit`
    pub fn with_contamination(mut self, c: f64) -> Self {
        self.contamination = c;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn is_fitted(&self) -> bool {
        self.trees.is_some()
    }

    fn validate(&self, x: &Array2<f64>) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnacomusError::InvalidParameter {
                name: "contamination".to_string(),
                value: self.contamination.to_string(),
                reason: "must be in (0, 0.5]".to_string(),
            });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(AnacomusError::InvalidInput(format!(
                "cannot fit on a {}x{} matrix",
                x.nrows(),
                x.ncols()
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(AnacomusError::InvalidInput(
                "input contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Positive anomaly score 2^(-E[h(x)] / c(psi)); higher = more anomalous
    fn compute_scores(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let trees = self.trees.as_ref().ok_or(AnacomusError::ModelNotFitted)?;
        let n_features = self.n_features.unwrap_or(0);
        if x.ncols() != n_features {
            return Err(AnacomusError::ShapeError {
                expected: format!("{} features", n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let c_n = average_path_length(self.samples_per_tree.unwrap_or(256));

        let scores: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|row| {
                let sample: Vec<f64> = row.iter().copied().collect();

                let avg_path_length: f64 = trees
                    .iter()
                    .map(|tree| tree.path_length(&sample, 0))
                    .sum::<f64>()
                    / trees.len() as f64;

                if c_n > 0.0 {
                    2.0_f64.powf(-avg_path_length / c_n)
                } else {
                    // A single-row forest cannot isolate anything
                    0.5
                }
            })
            .collect();

        Ok(Array1::from_vec(scores))
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector for IsolationForest {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        self.validate(x)?;

        let n_samples = x.nrows();
        let samples_per_tree = self.max_samples.resolve(n_samples);
        let max_height = (samples_per_tree.max(2) as f64).log2().ceil() as usize;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Per-tree seeds are drawn up front so the forest does not depend on
        // how rayon schedules the builds
        let tree_seeds: Vec<u64> = (0..self.n_estimators).map(|_| rng.gen()).collect();

        let trees: Vec<IsolationTree> = tree_seeds
            .par_iter()
            .map(|&seed| {
                let mut tree_rng = StdRng::seed_from_u64(seed);
                let indices = index::sample(&mut tree_rng, n_samples, samples_per_tree).into_vec();
                IsolationTree::build(x, &indices, 0, max_height, &mut tree_rng)
            })
            .collect();

        debug!(
            n_estimators = trees.len(),
            samples_per_tree,
            max_height,
            "isolation forest grown"
        );

        self.trees = Some(trees);
        self.samples_per_tree = Some(samples_per_tree);
        self.n_features = Some(x.ncols());

        // Offset = contamination-th percentile of the training raw scores
        let raw = self.score_samples(x)?;
        let mut sorted: Vec<f64> = raw.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        self.offset = Some(percentile(&sorted, self.contamination * 100.0));

        Ok(())
    }

    fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.compute_scores(x)?.mapv(|s| -s))
    }

    fn offset(&self) -> f64 {
        self.offset.unwrap_or(-0.5)
    }
}

/// Linear-interpolated percentile of an ascending slice, `q` in [0, 100]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (q / 100.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
