//! Anomaly detection module
//!
//! Provides the isolation forest detector and the helpers that turn its
//! ±1 output into binary anomaly labels.

mod isolation_forest;

pub use isolation_forest::{IsolationForest, IsolationTree, MaxSamples};

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Label the detectors emit for inliers
pub const INLIER: i32 = 1;
/// Label the detectors emit for outliers
pub const OUTLIER: i32 = -1;

/// Anomaly detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Raw scores (lower = more anomalous)
    pub scores: Array1<f64>,
    /// Detector labels (-1 = anomaly, 1 = normal)
    pub labels: Array1<i32>,
    /// Offset subtracted from the raw scores to get the decision function
    pub offset: f64,
    /// Number of anomalies detected
    pub n_anomalies: usize,
}

impl AnomalyResult {
    /// Labels remapped to 1 = anomalous, 0 = normal
    pub fn binary_labels(&self) -> Array1<i32> {
        to_binary_labels(&self.labels)
    }

    /// Row indices flagged as anomalous, in row order
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == OUTLIER)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Trait for anomaly detectors
pub trait AnomalyDetector: Send + Sync {
    /// Fit the detector on training data
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Raw anomaly scores for new data (lower = more anomalous)
    fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Offset between raw scores and the decision function
    fn offset(&self) -> f64;

    /// Shifted scores: negative values are anomalies
    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let offset = self.offset();
        Ok(self.score_samples(x)?.mapv(|s| s - offset))
    }

    /// Predict labels (-1 = anomaly, 1 = normal)
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i32>> {
        Ok(self
            .decision_function(x)?
            .mapv(|d| if d < 0.0 { OUTLIER } else { INLIER }))
    }

    /// Fit and predict in one step
    fn fit_predict(&mut self, x: &Array2<f64>) -> Result<Array1<i32>> {
        self.fit(x)?;
        self.predict(x)
    }

    /// Get detection results with scores and labels
    fn detect(&self, x: &Array2<f64>) -> Result<AnomalyResult> {
        let scores = self.score_samples(x)?;
        let offset = self.offset();
        let labels = scores.mapv(|s| if s - offset < 0.0 { OUTLIER } else { INLIER });
        let n_anomalies = labels.iter().filter(|&&l| l == OUTLIER).count();

        Ok(AnomalyResult {
            scores,
            labels,
            offset,
            n_anomalies,
        })
    }
}

/// Remap detector output {-1, +1} to {1, 0} so it lines up with
/// ground-truth labels (1 = anomalous).
pub fn to_binary_labels(labels: &Array1<i32>) -> Array1<i32> {
    labels.mapv(|l| if l == OUTLIER { 1 } else { 0 })
}
