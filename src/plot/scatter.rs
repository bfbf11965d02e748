//! Timestamp vs. query-field scatter plot

use super::svg::{format_tick, Anchor, LinearScale, Style, SvgDocument};
use super::{describe_contamination, PlotInput, ANOMALY_RED, EDGE_BLACK};
use crate::data::{QUERY_FIELD, TIMESTAMP};
use crate::error::Result;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 70.0;

// Ends of the cool-warm colormap
const NORMAL_BLUE: &str = "#3b4cc0";
const ANOMALY_WARM: &str = "#b40426";

/// Render the scatter figure as an SVG string.
///
/// Every row is coloured by its predicted label; anomalies are drawn again
/// as larger red markers and annotated with their IP just above the point.
pub fn render_scatter(input: &PlotInput<'_>) -> Result<String> {
    let xs = input.table.column_values(TIMESTAMP)?;
    let ys = input.table.column_values(QUERY_FIELD)?;
    let anomalies = input.anomaly_indices();

    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let (x_min, x_max) = min_max(&xs);
    let (y_min, y_max) = min_max(&ys);
    let x_scale = LinearScale::padded(x_min, x_max, (plot_left, plot_right));
    let y_scale = LinearScale::padded(y_min, y_max, (plot_bottom, plot_top));

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);

    doc.styled_text(
        WIDTH / 2.0,
        32.0,
        "Data Distribution with Anomaly Detection",
        16.0,
        Anchor::Middle,
        EDGE_BLACK,
        false,
    );
    doc.styled_text(
        WIDTH / 2.0,
        54.0,
        &format!(
            "(expected anomaly share = {})",
            describe_contamination(input.contamination)
        ),
        16.0,
        Anchor::Middle,
        EDGE_BLACK,
        false,
    );

    doc.rect(
        plot_left,
        plot_top,
        plot_right - plot_left,
        plot_bottom - plot_top,
        Style::outlined("none", EDGE_BLACK, 1.0),
    );

    for tick in x_scale.ticks(6) {
        let x = x_scale.map(tick);
        doc.line(x, plot_bottom, x, plot_bottom + 5.0, EDGE_BLACK, 1.0);
        doc.text(x, plot_bottom + 20.0, &format_tick(tick), 12.0, Anchor::Middle);
    }
    for tick in y_scale.ticks(6) {
        let y = y_scale.map(tick);
        doc.line(plot_left - 5.0, y, plot_left, y, EDGE_BLACK, 1.0);
        doc.text(plot_left - 8.0, y + 4.0, &format_tick(tick), 12.0, Anchor::End);
    }

    doc.text(
        (plot_left + plot_right) / 2.0,
        HEIGHT - 20.0,
        "Timestamp",
        14.0,
        Anchor::Middle,
    );
    doc.rotated_text(24.0, (plot_top + plot_bottom) / 2.0, "Query Field", 14.0);

    for (i, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
        let fill = if input.predicted[i] == 1 {
            ANOMALY_WARM
        } else {
            NORMAL_BLUE
        };
        doc.circle(x_scale.map(x), y_scale.map(y), 5.0, Style::filled(fill));
    }

    for &i in &anomalies {
        let cx = x_scale.map(xs[i]);
        let cy = y_scale.map(ys[i]);
        doc.circle(cx, cy, 8.0, Style::outlined(ANOMALY_RED, EDGE_BLACK, 1.0));
        doc.text(cx, cy - 14.0, &input.annotation(i), 12.0, Anchor::Middle);
    }

    // Legend
    let lx = plot_right - 130.0;
    let ly = plot_top + 20.0;
    doc.rect(
        lx - 12.0,
        ly - 16.0,
        132.0,
        52.0,
        Style::outlined("#ffffff", "#cccccc", 1.0),
    );
    doc.circle(lx, ly, 5.0, Style::filled(NORMAL_BLUE));
    doc.text(lx + 14.0, ly + 4.0, "Predicted", 12.0, Anchor::Start);
    doc.circle(lx, ly + 22.0, 7.0, Style::outlined(ANOMALY_RED, EDGE_BLACK, 1.0));
    doc.text(lx + 14.0, ly + 26.0, "Anomalies", 12.0, Anchor::Start);

    Ok(doc.finish())
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}
