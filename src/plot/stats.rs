//! Five-number summaries for box plots

use crate::error::{AnacomusError, Result};
use serde::{Deserialize, Serialize};

/// Box plot statistics for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest datum within q1 - whis * IQR
    pub whisker_low: f64,
    /// Highest datum within q3 + whis * IQR
    pub whisker_high: f64,
    /// Data beyond the whiskers
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Summarise `values` with whiskers at 1.5 IQR
    pub fn from_values(values: &[f64]) -> Result<Self> {
        Self::with_whisker(values, 1.5)
    }

    pub fn with_whisker(values: &[f64], whis: f64) -> Result<Self> {
        if values.is_empty() {
            return Err(AnacomusError::PlotError(
                "box plot needs at least one value".to_string(),
            ));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;

        let low_limit = q1 - whis * iqr;
        let high_limit = q3 + whis * iqr;

        // Whiskers stop at the last datum inside the limits, never inside the box
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_limit)
            .unwrap_or(q1)
            .min(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_limit)
            .unwrap_or(q3)
            .max(q3);

        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Ok(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            fliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolated quantile of an ascending slice, `q` in [0, 1]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
