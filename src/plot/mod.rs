//! Plot rendering
//!
//! Renders the per-contamination figures as standalone SVG files:
//! - [`scatter`]: timestamp vs. query-field scatter, anomalies annotated
//! - [`boxplot`]: paired horizontal box plots with anomalies highlighted

pub mod boxplot;
pub mod scatter;
pub mod stats;
pub mod svg;

pub use boxplot::render_box_plots;
pub use scatter::render_scatter;
pub use stats::BoxStats;

use crate::data::RequestTable;
use crate::error::{AnacomusError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) const ANOMALY_RED: &str = "#ff0000";
pub(crate) const EDGE_BLACK: &str = "#000000";

/// Which figure a scenario draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Scatter,
    BoxPlot,
    None,
}

/// Everything a figure needs for one contamination value
#[derive(Debug, Clone, Copy)]
pub struct PlotInput<'a> {
    pub table: &'a RequestTable,
    /// Binary predictions, 1 = anomalous
    pub predicted: &'a Array1<i32>,
    pub contamination: f64,
    /// Append "(True: label)" to anomaly annotations
    pub annotate_true_label: bool,
}

impl PlotInput<'_> {
    /// Indices of rows predicted anomalous
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.predicted
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Annotation text for row `i`
    pub fn annotation(&self, i: usize) -> String {
        let record = &self.table.records()[i];
        match (self.annotate_true_label, record.true_label) {
            (true, Some(label)) => format!("{} (True: {})", record.ip_address, label),
            _ => record.ip_address.clone(),
        }
    }

    fn check(&self) -> Result<()> {
        if self.predicted.len() != self.table.len() {
            return Err(AnacomusError::ShapeError {
                expected: format!("{} predictions", self.table.len()),
                actual: format!("{} predictions", self.predicted.len()),
            });
        }
        Ok(())
    }
}

/// "0.1 or 10%" style description of a contamination value
pub fn describe_contamination(contamination: f64) -> String {
    let percent = (contamination * 100.0 * 1e6).round() / 1e6;
    format!("{} or {}%", contamination, percent)
}

/// File name for a scenario's figure at one contamination value
pub fn plot_file_name(scenario: &str, contamination: f64) -> String {
    let tag = format!("{}", contamination).replace('.', "_");
    format!("{}_c{}.svg", scenario, tag)
}

/// Render the SVG for `kind` and write it to `path`.
///
/// Returns `Ok(None)` without touching the filesystem for [`PlotKind::None`].
pub fn render(kind: PlotKind, input: &PlotInput<'_>, path: &Path) -> Result<Option<PathBuf>> {
    input.check()?;

    let svg = match kind {
        PlotKind::Scatter => render_scatter(input)?,
        PlotKind::BoxPlot => render_box_plots(input)?,
        PlotKind::None => return Ok(None),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, svg)?;

    info!(path = %path.display(), ?kind, "plot written");
    Ok(Some(path.to_path_buf()))
}
