//! Analysis configuration

use crate::anomaly::MaxSamples;
use crate::data::FEATURE_COLUMNS;
use crate::error::{AnacomusError, Result};
use crate::preprocessing::ScalerType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a contamination sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Expected anomaly shares to test, in order
    pub contamination_values: Vec<f64>,

    /// Number of isolation trees
    pub n_estimators: usize,

    /// Rows drawn per tree
    pub max_samples: MaxSamples,

    /// Random seed; `None` draws from entropy
    pub random_state: Option<u64>,

    /// Scaling applied to the feature columns before fitting
    pub scaler_type: ScalerType,

    /// Numeric columns the detector is trained on
    pub feature_columns: Vec<String>,

    /// Directory the SVG figures are written to
    pub output_dir: PathBuf,

    /// Whether to write figures at all
    pub render_plots: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            contamination_values: vec![0.1, 0.2, 0.3],
            n_estimators: 100,
            max_samples: MaxSamples::Auto,
            random_state: Some(42),
            scaler_type: ScalerType::Standard,
            feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("plots"),
            render_plots: true,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the contamination values
    pub fn with_contamination_values(mut self, values: Vec<f64>) -> Self {
        self.contamination_values = values;
        self
    }

    /// Builder method to set the number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set rows per tree
    pub fn with_max_samples(mut self, max_samples: MaxSamples) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Builder method to set the random seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Builder method to set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method to enable or disable figure rendering
    pub fn with_plots(mut self, render: bool) -> Self {
        self.render_plots = render;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.contamination_values.is_empty() {
            return Err(AnacomusError::ConfigError(
                "at least one contamination value is required".to_string(),
            ));
        }
        for &c in &self.contamination_values {
            if !(c > 0.0 && c <= 0.5) {
                return Err(AnacomusError::InvalidParameter {
                    name: "contamination".to_string(),
                    value: c.to_string(),
                    reason: "must be in (0, 0.5]".to_string(),
                });
            }
        }
        if self.n_estimators == 0 {
            return Err(AnacomusError::InvalidParameter {
                name: "n_estimators".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.feature_columns.is_empty() {
            return Err(AnacomusError::ConfigError(
                "at least one feature column is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.contamination_values, vec![0.1, 0.2, 0.3]);
        assert_eq!(config.random_state, Some(42));
        assert_eq!(config.feature_columns.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalysisConfig::new()
            .with_contamination_values(vec![0.05])
            .with_n_estimators(10)
            .with_random_state(7)
            .with_plots(false);

        assert_eq!(config.contamination_values, vec![0.05]);
        assert_eq!(config.n_estimators, 10);
        assert_eq!(config.random_state, Some(7));
        assert!(!config.render_plots);
    }

    #[test]
    fn test_validate_rejects_bad_contamination() {
        let config = AnalysisConfig::new().with_contamination_values(vec![0.1, 0.9]);
        assert!(matches!(
            config.validate(),
            Err(AnacomusError::InvalidParameter { .. })
        ));

        let empty = AnalysisConfig::new().with_contamination_values(vec![]);
        assert!(matches!(empty.validate(), Err(AnacomusError::ConfigError(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "n_estimators": 25, "scaler_type": "min_max" }"#).unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.n_estimators, 25);
        assert_eq!(config.scaler_type, ScalerType::MinMax);
        assert_eq!(config.contamination_values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AnalysisConfig::from_json_file(&path),
            Err(AnacomusError::SerializationError(_))
        ));
    }
}
