//! Anacomus - anomaly detection over network request tables
//!
//! Scales a small table of request features, fits an isolation forest at
//! several expected anomaly shares, remaps its verdicts to binary labels and
//! reports or plots the flagged requests.
//!
//! # Modules
//!
//! - [`data`] - Request records, built-in tables, CSV/JSON loading
//! - [`preprocessing`] - Feature scaling
//! - [`anomaly`] - Isolation forest and label remapping
//! - [`metrics`] - Classification report
//! - [`plot`] - SVG scatter and box plots
//! - [`analysis`] - Scenarios and the contamination sweep
//! - [`config`] - Sweep configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data and models
pub mod data;
pub mod preprocessing;
pub mod anomaly;
pub mod metrics;

// Output
pub mod plot;

// Orchestration
pub mod config;
pub mod analysis;

// Services
pub mod cli;

pub use error::{AnacomusError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{AnacomusError, Result};

    // Data
    pub use crate::data::{load_table, RequestRecord, RequestTable, TableVariant, FEATURE_COLUMNS};

    // Preprocessing
    pub use crate::preprocessing::{Scaler, ScalerType};

    // Anomaly detection
    pub use crate::anomaly::{to_binary_labels, AnomalyDetector, AnomalyResult, IsolationForest, MaxSamples};

    // Metrics
    pub use crate::metrics::ClassificationReport;

    // Plotting
    pub use crate::plot::{BoxStats, PlotKind};

    // Analysis
    pub use crate::analysis::{AnomalySweep, ContaminationOutcome, Scenario, ScenarioKind, SweepReport};
    pub use crate::config::AnalysisConfig;
}
