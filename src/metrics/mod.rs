//! Evaluation metrics
//!
//! Scores binary anomaly predictions against ground-truth labels.

mod classification;

pub use classification::{AveragedMetrics, ClassMetrics, ClassificationReport};
