//! Per-class precision / recall / F1 report

use crate::error::{AnacomusError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Metrics for a single class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: i32,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true members of the class
    pub support: usize,
}

/// Averaged metrics across classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Classification report over discrete labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per label seen in either input, ascending
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    pub n_samples: usize,
}

impl ClassificationReport {
    /// Compute the report for ground truth `y_true` and predictions `y_pred`.
    ///
    /// Undefined ratios (no predicted or no true members of a class) are
    /// reported as 0.0 and logged as a warning.
    pub fn compute(y_true: &Array1<i32>, y_pred: &Array1<i32>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(AnacomusError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(AnacomusError::InvalidInput(
                "cannot score an empty label set".to_string(),
            ));
        }

        let labels: BTreeSet<i32> = y_true.iter().chain(y_pred.iter()).copied().collect();

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|&label| Self::class_metrics(label, y_true, y_pred))
            .collect();

        let n_samples = y_true.len();
        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();
        let accuracy = correct as f64 / n_samples as f64;

        let n_classes = classes.len() as f64;
        let macro_avg = AveragedMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
            support: n_samples,
        };

        let weighted = |f: fn(&ClassMetrics) -> f64| -> f64 {
            classes
                .iter()
                .map(|c| f(c) * c.support as f64)
                .sum::<f64>()
                / n_samples as f64
        };
        let weighted_avg = AveragedMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: n_samples,
        };

        Ok(Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
            n_samples,
        })
    }

    fn class_metrics(label: i32, y_true: &Array1<i32>, y_pred: &Array1<i32>) -> ClassMetrics {
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == label, p == label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            warn!(label, "precision is ill-defined: no predicted samples, set to 0.0");
            0.0
        };

        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            warn!(label, "recall is ill-defined: no true samples, set to 0.0");
            0.0
        };

        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            label,
            precision,
            recall,
            f1_score,
            support: tp + fn_,
        }
    }

    /// Metrics for one label, if it appeared in the inputs
    pub fn class(&self, label: i32) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

const LABEL_WIDTH: usize = 12; // len("weighted avg")

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = LABEL_WIDTH;
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for c in &self.classes {
            writeln!(
                f,
                "{:>w$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1_score, c.support
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.n_samples
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>w$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1_score, avg.support
            )?;
        }
        Ok(())
    }
}
