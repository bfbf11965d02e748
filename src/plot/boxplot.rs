//! Paired horizontal box plots with anomalies highlighted

use super::stats::BoxStats;
use super::svg::{format_tick, Anchor, LinearScale, Style, SvgDocument};
use super::{describe_contamination, PlotInput, ANOMALY_RED, EDGE_BLACK};
use crate::data::{QUERY_FIELD, TIMESTAMP};
use crate::error::Result;

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 600.0;
const PANEL_WIDTH: f64 = WIDTH / 2.0;
const MARGIN_X: f64 = 50.0;
const MARGIN_TOP: f64 = 90.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MEDIAN_RED: &str = "#ff0000";

/// One variable's panel
#[derive(Debug, Clone, Copy)]
pub struct BoxPlotPanel<'a> {
    pub column: &'a str,
    pub label: &'a str,
    pub fill: &'a str,
    pub line: &'a str,
}

/// The two panels drawn side by side
pub const PANELS: [BoxPlotPanel<'static>; 2] = [
    BoxPlotPanel {
        column: TIMESTAMP,
        label: "Timestamp",
        fill: "#add8e6",
        line: "#0000ff",
    },
    BoxPlotPanel {
        column: QUERY_FIELD,
        label: "Query Field",
        fill: "#90ee90",
        line: "#008000",
    },
];

/// Render both box-plot panels as one SVG string
pub fn render_box_plots(input: &PlotInput<'_>) -> Result<String> {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);

    for (n, panel) in PANELS.iter().enumerate() {
        let left = n as f64 * PANEL_WIDTH + MARGIN_X;
        let right = (n + 1) as f64 * PANEL_WIDTH - MARGIN_X;
        let with_legend = n == PANELS.len() - 1;
        draw_panel(&mut doc, input, panel, (left, right), with_legend)?;
    }

    Ok(doc.finish())
}

fn draw_panel(
    doc: &mut SvgDocument,
    input: &PlotInput<'_>,
    panel: &BoxPlotPanel<'_>,
    (left, right): (f64, f64),
    with_legend: bool,
) -> Result<()> {
    let values = input.table.column_values(panel.column)?;
    let stats = BoxStats::from_values(&values)?;

    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let center_y = (top + bottom) / 2.0;
    // Box spans half of the axis height
    let half_box = (bottom - top) / 8.0;

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let scale = LinearScale::padded(min, max, (left, right));
    let mid = (left + right) / 2.0;

    doc.text(
        mid,
        36.0,
        &format!("Box Plot for the {} Variable", panel.label),
        16.0,
        Anchor::Middle,
    );
    doc.text(
        mid,
        58.0,
        &format!(
            "(Expected Anomaly Share = {})",
            describe_contamination(input.contamination)
        ),
        16.0,
        Anchor::Middle,
    );

    doc.rect(left, top, right - left, bottom - top, Style::outlined("none", EDGE_BLACK, 1.0));

    for tick in scale.ticks(6) {
        let x = scale.map(tick);
        doc.line(x, bottom, x, bottom + 5.0, EDGE_BLACK, 1.0);
        doc.text(x, bottom + 20.0, &format_tick(tick), 12.0, Anchor::Middle);
    }
    doc.text(mid, HEIGHT - 20.0, panel.label, 14.0, Anchor::Middle);

    // Whiskers and caps
    let (wl, wh) = (scale.map(stats.whisker_low), scale.map(stats.whisker_high));
    let (q1, q3) = (scale.map(stats.q1), scale.map(stats.q3));
    let cap = half_box / 2.0;
    doc.line(wl, center_y, q1, center_y, panel.line, 1.5);
    doc.line(q3, center_y, wh, center_y, panel.line, 1.5);
    doc.line(wl, center_y - cap, wl, center_y + cap, panel.line, 1.5);
    doc.line(wh, center_y - cap, wh, center_y + cap, panel.line, 1.5);

    doc.rect(
        q1,
        center_y - half_box,
        (q3 - q1).max(1.0),
        half_box * 2.0,
        Style::outlined(panel.fill, panel.line, 1.5),
    );

    let median = scale.map(stats.median);
    doc.line(median, center_y - half_box, median, center_y + half_box, MEDIAN_RED, 2.0);

    for &flier in &stats.fliers {
        doc.circle(scale.map(flier), center_y, 4.0, Style::outlined("none", EDGE_BLACK, 1.0));
    }

    for i in input.anomaly_indices() {
        let cx = scale.map(values[i]);
        doc.circle(cx, center_y, 8.0, Style::outlined(ANOMALY_RED, EDGE_BLACK, 1.0));
        doc.text(cx + 12.0, center_y + 4.0, &input.annotation(i), 11.0, Anchor::Start);
    }

    if with_legend {
        let lx = right - 110.0;
        let ly = top + 20.0;
        doc.rect(lx - 12.0, ly - 14.0, 112.0, 28.0, Style::outlined("#ffffff", "#cccccc", 1.0));
        doc.circle(lx, ly, 7.0, Style::outlined(ANOMALY_RED, EDGE_BLACK, 1.0));
        doc.text(lx + 14.0, ly + 4.0, "Anomalies", 12.0, Anchor::Start);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RequestTable, TableVariant};
    use ndarray::array;

    fn svg_for(with_labels: bool, annotate: bool) -> String {
        let table = RequestTable::builtin(TableVariant::BoxPlot, with_labels);
        let predicted = array![0, 0, 1, 0, 1, 0];
        let input = PlotInput {
            table: &table,
            predicted: &predicted,
            contamination: 0.3,
            annotate_true_label: annotate,
        };
        render_box_plots(&input).unwrap()
    }

    #[test]
    fn test_both_panels_present() {
        let svg = svg_for(false, false);
        assert!(svg.contains("Box Plot for the Timestamp Variable"));
        assert!(svg.contains("Box Plot for the Query Field Variable"));
        assert!(svg.contains("#add8e6"));
        assert!(svg.contains("#90ee90"));
    }

    #[test]
    fn test_annotations_repeat_per_panel() {
        let svg = svg_for(false, false);
        assert_eq!(svg.matches(">192.168.0.3</text>").count(), 2);
        assert_eq!(svg.matches(">192.168.0.5</text>").count(), 2);
    }

    #[test]
    fn test_annotations_carry_true_label() {
        let svg = svg_for(true, true);
        assert!(svg.contains(">192.168.0.3 (True: 1)</text>"));
        assert!(svg.contains(">192.168.0.5 (True: 1)</text>"));
    }

    #[test]
    fn test_single_legend() {
        let svg = svg_for(false, false);
        assert_eq!(svg.matches(">Anomalies</text>").count(), 1);
    }
}
