//! Contamination sweep over one scenario

use super::scenario::{Scenario, ScenarioKind};
use crate::anomaly::{AnomalyDetector, IsolationForest};
use crate::config::AnalysisConfig;
use crate::data::{IP_ADDRESS, PREDICTED_LABEL, TRUE_LABEL};
use crate::error::Result;
use crate::metrics::ClassificationReport;
use crate::plot::{self, plot_file_name, PlotInput, PlotKind};
use crate::preprocessing::Scaler;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// A row the detector flagged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedRow {
    pub index: usize,
    pub ip_address: String,
    pub true_label: Option<i64>,
    pub predicted_label: i32,
}

/// Result of one contamination value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContaminationOutcome {
    pub contamination: f64,
    /// 1 = anomalous, 0 = normal
    pub predicted_labels: Array1<i32>,
    /// Raw isolation scores (lower = more anomalous)
    pub scores: Array1<f64>,
    pub offset: f64,
    pub flagged: Vec<FlaggedRow>,
    pub report: Option<ClassificationReport>,
    pub plot_path: Option<PathBuf>,
}

impl ContaminationOutcome {
    pub fn n_flagged(&self) -> usize {
        self.flagged.len()
    }

    pub fn flagged_ips(&self) -> Vec<&str> {
        self.flagged.iter().map(|r| r.ip_address.as_str()).collect()
    }

    /// Flagged rows as a DataFrame for console display.
    ///
    /// The `true_label` column is included only when `with_true_label` is set
    /// and the rows carry ground truth.
    pub fn flagged_frame(&self, with_true_label: bool) -> Result<DataFrame> {
        let ips: Vec<&str> = self.flagged_ips();
        let predicted: Vec<i32> = self.flagged.iter().map(|r| r.predicted_label).collect();

        let mut columns: Vec<Column> = vec![Series::new(IP_ADDRESS.into(), ips).into()];

        let labels: Option<Vec<i64>> = self.flagged.iter().map(|r| r.true_label).collect();
        if with_true_label {
            if let Some(labels) = labels {
                columns.push(Series::new(TRUE_LABEL.into(), labels).into());
            }
        }
        columns.push(Series::new(PREDICTED_LABEL.into(), predicted).into());

        Ok(DataFrame::new(columns)?)
    }
}

/// All outcomes for one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub scenario: ScenarioKind,
    pub n_records: usize,
    pub features: Vec<String>,
    pub outcomes: Vec<ContaminationOutcome>,
}

impl SweepReport {
    pub fn outcome(&self, contamination: f64) -> Option<&ContaminationOutcome> {
        self.outcomes
            .iter()
            .find(|o| (o.contamination - contamination).abs() < 1e-12)
    }
}

/// Runs the scale → fit → predict → remap → evaluate → plot sequence for
/// every configured contamination value.
#[derive(Debug, Clone)]
pub struct AnomalySweep {
    config: AnalysisConfig,
}

impl AnomalySweep {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, scenario: &Scenario) -> Result<SweepReport> {
        self.config.validate()?;
        let start = Instant::now();
        let kind = scenario.kind();
        let table = scenario.table();

        info!(
            scenario = %kind,
            rows = table.len(),
            contaminations = ?self.config.contamination_values,
            "starting sweep"
        );

        let raw = table.feature_matrix(&self.config.feature_columns)?;
        let mut scaler = Scaler::new(self.config.scaler_type);
        let scaled = scaler.fit_transform(&raw)?;
        debug!(centers = ?scaler.centers(), scales = ?scaler.scales(), "features scaled");

        let truth = if scenario.has_ground_truth() {
            table.true_labels()
        } else {
            None
        };

        let outcomes = self
            .config
            .contamination_values
            .iter()
            .map(|&c| self.run_one(scenario, &scaled, truth.as_ref(), c))
            .collect::<Result<Vec<_>>>()?;

        info!(
            scenario = %kind,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sweep finished"
        );

        Ok(SweepReport {
            scenario: kind,
            n_records: table.len(),
            features: self.config.feature_columns.clone(),
            outcomes,
        })
    }

    fn build_forest(&self, contamination: f64) -> IsolationForest {
        let forest = IsolationForest::new()
            .with_n_estimators(self.config.n_estimators)
            .with_max_samples(self.config.max_samples)
            .with_contamination(contamination);
        match self.config.random_state {
            Some(seed) => forest.with_seed(seed),
            None => forest,
        }
    }

    fn run_one(
        &self,
        scenario: &Scenario,
        scaled: &Array2<f64>,
        truth: Option<&Array1<i32>>,
        contamination: f64,
    ) -> Result<ContaminationOutcome> {
        let kind = scenario.kind();
        let table = scenario.table();

        let mut forest = self.build_forest(contamination);
        forest.fit(scaled)?;
        let detection = forest.detect(scaled)?;
        let predicted = detection.binary_labels();

        let flagged: Vec<FlaggedRow> = detection
            .anomaly_indices()
            .into_iter()
            .map(|i| {
                let record = &table.records()[i];
                FlaggedRow {
                    index: i,
                    ip_address: record.ip_address.clone(),
                    // Only scenarios that use ground truth expose it
                    true_label: truth.and(record.true_label),
                    predicted_label: predicted[i],
                }
            })
            .collect();

        info!(
            contamination,
            flagged = flagged.len(),
            offset = detection.offset,
            "anomalies detected"
        );

        let report = match truth {
            Some(y_true) if kind.reports_metrics() => {
                Some(ClassificationReport::compute(y_true, &predicted)?)
            }
            _ => None,
        };

        let plot_kind = if self.config.render_plots {
            kind.plot_kind()
        } else {
            PlotKind::None
        };
        let input = PlotInput {
            table,
            predicted: &predicted,
            contamination,
            annotate_true_label: truth.is_some() && kind.shows_true_label(),
        };
        let path = self
            .config
            .output_dir
            .join(plot_file_name(kind.name(), contamination));
        let plot_path = plot::render(plot_kind, &input, &path)?;

        Ok(ContaminationOutcome {
            contamination,
            predicted_labels: predicted,
            scores: detection.scores,
            offset: detection.offset,
            flagged,
            report,
            plot_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RequestTable, TableVariant};

    fn headless() -> AnalysisConfig {
        AnalysisConfig::new().with_plots(false)
    }

    #[test]
    fn test_flag_counts_follow_contamination() {
        let scenario = Scenario::builtin(ScenarioKind::ScatterLabeled);
        let report = AnomalySweep::new(headless()).run(&scenario).unwrap();

        let counts: Vec<usize> = report.outcomes.iter().map(|o| o.n_flagged()).collect();
        assert_eq!(counts, vec![1, 1, 2]);
        for outcome in &report.outcomes {
            assert!(outcome.flagged_ips().contains(&"192.168.0.3"));
        }
    }

    #[test]
    fn test_report_only_for_scatter_scenario() {
        let sweep = AnomalySweep::new(headless());

        let scatter = sweep
            .run(&Scenario::builtin(ScenarioKind::ScatterLabeled))
            .unwrap();
        assert!(scatter.outcomes.iter().all(|o| o.report.is_some()));

        let boxed = sweep
            .run(&Scenario::builtin(ScenarioKind::BoxPlotLabeled))
            .unwrap();
        assert!(boxed.outcomes.iter().all(|o| o.report.is_none()));
    }

    #[test]
    fn test_flagged_frame_columns() {
        let scenario = Scenario::builtin(ScenarioKind::BoxPlotLabeled);
        let report = AnomalySweep::new(headless()).run(&scenario).unwrap();
        let outcome = &report.outcomes[0];

        let with_truth = outcome.flagged_frame(true).unwrap();
        let names: Vec<&str> = with_truth
            .get_column_names()
            .into_iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(names, vec![IP_ADDRESS, TRUE_LABEL, PREDICTED_LABEL]);

        let without = outcome.flagged_frame(false).unwrap();
        assert_eq!(without.width(), 2);
        assert_eq!(without.height(), outcome.n_flagged());
    }

    #[test]
    fn test_unlabeled_scenario_hides_table_labels() {
        let table = RequestTable::builtin(TableVariant::BoxPlot, true);
        let scenario = Scenario::with_table(ScenarioKind::BoxPlotUnlabeled, table);
        let report = AnomalySweep::new(headless()).run(&scenario).unwrap();

        for outcome in &report.outcomes {
            assert!(outcome.n_flagged() >= 1);
            assert!(outcome.flagged.iter().all(|r| r.true_label.is_none()));
            assert_eq!(outcome.flagged_frame(true).unwrap().width(), 2);
        }

        let json = serde_json::to_value(&report).unwrap();
        for outcome in json["outcomes"].as_array().unwrap() {
            for row in outcome["flagged"].as_array().unwrap() {
                assert!(row["true_label"].is_null());
            }
        }
    }

    #[test]
    fn test_unlabeled_scenario_plot_omits_labels() {
        let dir = tempfile::tempdir().unwrap();
        let table = RequestTable::builtin(TableVariant::BoxPlot, true);
        let scenario = Scenario::with_table(ScenarioKind::BoxPlotUnlabeled, table);
        let config = AnalysisConfig::new()
            .with_contamination_values(vec![0.3])
            .with_output_dir(dir.path());
        let report = AnomalySweep::new(config).run(&scenario).unwrap();

        let svg = std::fs::read_to_string(report.outcomes[0].plot_path.as_ref().unwrap()).unwrap();
        assert!(svg.contains(">192.168.0.3</text>"));
        assert!(!svg.contains("(True:"));
    }

    #[test]
    fn test_plots_written_per_contamination() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::new().with_output_dir(dir.path());
        let scenario = Scenario::builtin(ScenarioKind::BoxPlotUnlabeled);
        let report = AnomalySweep::new(config).run(&scenario).unwrap();

        for outcome in &report.outcomes {
            let path = outcome.plot_path.as_ref().unwrap();
            let svg = std::fs::read_to_string(path).unwrap();
            for ip in outcome.flagged_ips() {
                assert!(svg.contains(ip));
            }
        }
    }
}
