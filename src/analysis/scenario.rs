//! The three analysis scenarios

use crate::data::{RequestTable, TableVariant};
use crate::error::AnacomusError;
use crate::plot::PlotKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table variant × ground truth × figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Labelled table A, classification report, scatter plot
    #[serde(rename = "scatter-labeled")]
    ScatterLabeled,
    /// Labelled table B, paired box plots annotated with ground truth
    #[serde(rename = "boxplot-labeled")]
    BoxPlotLabeled,
    /// Table B without ground truth, paired box plots
    #[serde(rename = "boxplot-unlabeled")]
    BoxPlotUnlabeled,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::ScatterLabeled,
        ScenarioKind::BoxPlotLabeled,
        ScenarioKind::BoxPlotUnlabeled,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::ScatterLabeled => "scatter-labeled",
            ScenarioKind::BoxPlotLabeled => "boxplot-labeled",
            ScenarioKind::BoxPlotUnlabeled => "boxplot-unlabeled",
        }
    }

    pub fn variant(&self) -> TableVariant {
        match self {
            ScenarioKind::ScatterLabeled => TableVariant::Scatter,
            ScenarioKind::BoxPlotLabeled | ScenarioKind::BoxPlotUnlabeled => TableVariant::BoxPlot,
        }
    }

    pub fn uses_ground_truth(&self) -> bool {
        !matches!(self, ScenarioKind::BoxPlotUnlabeled)
    }

    pub fn plot_kind(&self) -> PlotKind {
        match self {
            ScenarioKind::ScatterLabeled => PlotKind::Scatter,
            ScenarioKind::BoxPlotLabeled | ScenarioKind::BoxPlotUnlabeled => PlotKind::BoxPlot,
        }
    }

    /// Whether the scenario scores predictions with a classification report
    pub fn reports_metrics(&self) -> bool {
        matches!(self, ScenarioKind::ScatterLabeled)
    }

    /// Whether flagged rows and annotations show the ground-truth label
    pub fn shows_true_label(&self) -> bool {
        matches!(self, ScenarioKind::BoxPlotLabeled)
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = AnacomusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                AnacomusError::InvalidInput(format!(
                    "Unknown scenario: {} (expected one of scatter-labeled, boxplot-labeled, boxplot-unlabeled)",
                    s
                ))
            })
    }
}

/// A scenario bound to the table it runs on
#[derive(Debug, Clone)]
pub struct Scenario {
    kind: ScenarioKind,
    table: RequestTable,
}

impl Scenario {
    /// Scenario over its built-in six-row table
    pub fn builtin(kind: ScenarioKind) -> Self {
        Self {
            kind,
            table: RequestTable::builtin(kind.variant(), kind.uses_ground_truth()),
        }
    }

    /// Scenario over an externally supplied table
    pub fn with_table(kind: ScenarioKind, table: RequestTable) -> Self {
        Self { kind, table }
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn table(&self) -> &RequestTable {
        &self.table
    }

    /// Ground truth is used only when both the scenario and the table have it
    pub fn has_ground_truth(&self) -> bool {
        self.kind.uses_ground_truth() && self.table.has_labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
        }
        assert!("histogram".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn test_builtin_scenarios() {
        let scatter = Scenario::builtin(ScenarioKind::ScatterLabeled);
        assert!(scatter.has_ground_truth());
        assert_eq!(scatter.table().records()[2].query_field, 4);

        let unlabelled = Scenario::builtin(ScenarioKind::BoxPlotUnlabeled);
        assert!(!unlabelled.has_ground_truth());
        assert_eq!(unlabelled.table().records()[2].query_field, 14);
    }

    #[test]
    fn test_scenario_traits() {
        assert_eq!(ScenarioKind::ScatterLabeled.plot_kind(), PlotKind::Scatter);
        assert!(ScenarioKind::ScatterLabeled.reports_metrics());
        assert!(!ScenarioKind::BoxPlotLabeled.reports_metrics());
        assert!(ScenarioKind::BoxPlotLabeled.shows_true_label());
        assert!(!ScenarioKind::BoxPlotUnlabeled.shows_true_label());
    }
}
