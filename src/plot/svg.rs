//! Minimal SVG document builder and axis scaling

use std::fmt::Write as _;

/// Text anchor for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Stroke/fill pair for shapes
#[derive(Debug, Clone, Copy)]
pub struct Style<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
    pub stroke_width: f64,
}

impl<'a> Style<'a> {
    pub fn filled(fill: &'a str) -> Self {
        Self {
            fill,
            stroke: "none",
            stroke_width: 0.0,
        }
    }

    pub fn outlined(fill: &'a str, stroke: &'a str, stroke_width: f64) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
        }
    }
}

/// SVG document assembled as a string
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        doc.rect(0.0, 0.0, width, height, Style::filled("#ffffff"));
        doc
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: Style<'_>) {
        let _ = writeln!(
            self.body,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            x, y, w, h, style.fill, style.stroke, style.stroke_width
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.body,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            x1, y1, x2, y2, stroke, width
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: Style<'_>) {
        let _ = writeln!(
            self.body,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            cx, cy, r, style.fill, style.stroke, style.stroke_width
        );
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: Anchor) {
        self.styled_text(x, y, content, size, anchor, "#000000", false);
    }

    pub fn styled_text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        size: f64,
        anchor: Anchor,
        fill: &str,
        bold: bool,
    ) {
        let weight = if bold { "bold" } else { "normal" };
        let _ = writeln!(
            self.body,
            r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            y,
            size,
            weight,
            fill,
            anchor.as_str(),
            escape(content)
        );
    }

    /// Vertical text, rotated about its anchor point
    pub fn rotated_text(&mut self, x: f64, y: f64, content: &str, size: f64) {
        let _ = writeln!(
            self.body,
            r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}" text-anchor="middle" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
            x,
            y,
            size,
            x,
            y,
            escape(content)
        );
    }

    pub fn finish(self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Escape the XML special characters in text content
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Maps a data interval onto a pixel interval
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Scale over `[min, max]` padded by 5% on each side
    pub fn padded(min: f64, max: f64, range: (f64, f64)) -> Self {
        let (lo, hi) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        };
        Self {
            domain: (lo, hi),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round-numbered ticks inside the domain
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let step = nice_step((hi - lo) / target.max(1) as f64);
        let first = (lo / step).ceil() * step;

        let mut ticks = Vec::new();
        let mut t = first;
        while t <= hi + step * 1e-9 {
            // Snap values like 0.30000000000000004
            ticks.push((t / step).round() * step);
            t += step;
        }
        ticks
    }
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick label without trailing zeros
pub fn format_tick(v: f64) -> String {
    if v == v.trunc() {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_scale_maps_endpoints() {
        let scale = LinearScale {
            domain: (0.0, 10.0),
            range: (100.0, 200.0),
        };
        assert_eq!(scale.map(0.0), 100.0);
        assert_eq!(scale.map(10.0), 200.0);
        assert_eq!(scale.map(5.0), 150.0);
    }

    #[test]
    fn test_inverted_range() {
        // y axes grow downward in SVG
        let scale = LinearScale {
            domain: (0.0, 4.0),
            range: (500.0, 100.0),
        };
        assert_eq!(scale.map(4.0), 100.0);
    }

    #[test]
    fn test_ticks_are_round() {
        let scale = LinearScale::padded(1.0, 3000.0, (0.0, 800.0));
        let ticks = scale.ticks(6);
        assert!(ticks.contains(&0.0));
        assert!(ticks.contains(&3000.0));
        assert!(ticks.iter().all(|t| t % 500.0 == 0.0));
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = LinearScale::padded(2.0, 2.0, (0.0, 100.0));
        assert_eq!(scale.domain(), (1.0, 3.0));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(3000.0), "3000");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(-2.0), "-2");
    }

    #[test]
    fn test_document_wraps_body() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.text(10.0, 10.0, "hello", 12.0, Anchor::Start);
        let svg = doc.finish();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(">hello</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
