//! SVG line chart of the portfolio value curve.
//!
//! The x axis spans exactly the evaluation window; the y axis is labelled in
//! percent of the starting value (1.0 = 100%).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::error::EvalError;
use crate::domain::evaluation::EvaluationReport;
use crate::ports::report_port::ReportPort;

const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            padding: 60.0,
        }
    }
}

pub struct SvgChartAdapter {
    size: ChartSize,
}

impl SvgChartAdapter {
    pub fn new(size: ChartSize) -> Self {
        Self { size }
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new(ChartSize::default())
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, report: &EvaluationReport, output_path: &Path) -> Result<(), EvalError> {
        let svg = render_value_chart(report, self.size);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, svg).map_err(|e| EvalError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        tracing::info!(path = %output_path.display(), "chart written");
        Ok(())
    }
}

/// Curve points including the 1.0 anchor at the base date.
fn curve_points(report: &EvaluationReport) -> Vec<(NaiveDate, f64)> {
    let series = &report.series;
    let mut points = Vec::with_capacity(series.values.len() + 1);
    if let Some(base) = series.base_date {
        points.push((base, 1.0));
    }
    points.extend(series.values.iter().map(|v| (v.date, v.value)));
    points
}

/// `value` on `[lo, hi]` mapped to `[0, 1]`; degenerate ranges map to 0.5.
fn unit(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo { (value - lo) / (hi - lo) } else { 0.5 }
}

pub fn format_percent_tick(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

pub fn render_value_chart(report: &EvaluationReport, size: ChartSize) -> String {
    let ChartSize {
        width,
        height,
        padding,
    } = size;
    let plot_width = width - 2.0 * padding;
    let plot_height = height - 2.0 * padding;

    let points = curve_points(report);

    let (mut lo, mut hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        lo = 1.0;
        hi = 1.0;
    }
    if hi - lo < 1e-9 {
        lo -= 0.05;
        hi += 0.05;
    }

    let start = report.start_date;
    let span_days = (report.end_date - start).num_days().max(1) as f64;
    let x_of = |date: NaiveDate| {
        let frac = ((date - start).num_days() as f64 / span_days).clamp(0.0, 1.0);
        padding + frac * plot_width
    };
    let y_of = |v: f64| height - padding - unit(v, lo, hi) * plot_height;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{width:.0}" height="{height:.0}" fill="white"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">Portfolio value</text>"#,
        width / 2.0,
        padding / 2.0
    );

    // Grid and y ticks.
    for i in 0..=Y_TICKS {
        let v = lo + (hi - lo) * i as f64 / Y_TICKS as f64;
        let y = y_of(v);
        let _ = writeln!(
            svg,
            r##"<line x1="{padding:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            width - padding
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            padding - 6.0,
            y + 4.0,
            format_percent_tick(v)
        );
    }

    // Grid and x ticks.
    for i in 0..=X_TICKS {
        let offset = (span_days * i as f64 / X_TICKS as f64).round() as i64;
        let date = start + chrono::Duration::days(offset);
        let x = x_of(date);
        let _ = writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{padding:.1}" x2="{x:.1}" y2="{:.1}" stroke="#dddddd"/>"##,
            height - padding
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            height - padding + 18.0,
            date.format("%Y-%m-%d")
        );
    }

    // Axes.
    let _ = writeln!(
        svg,
        r#"<line x1="{padding:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        height - padding,
        width - padding,
        height - padding
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{padding:.1}" y1="{padding:.1}" x2="{padding:.1}" y2="{:.1}" stroke="black"/>"#,
        height - padding
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Date</text>"#,
        width / 2.0,
        height - padding / 4.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" transform="rotate(-90 {:.1} {:.1})">Value</text>"#,
        padding / 4.0,
        height / 2.0,
        padding / 4.0,
        height / 2.0
    );

    if points.is_empty() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">No value data available.</text>"#,
            width / 2.0,
            height / 2.0
        );
    } else {
        let polyline: Vec<String> = points
            .iter()
            .map(|&(d, v)| format!("{:.1},{:.1}", x_of(d), y_of(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="steelblue" stroke-width="1.5" points="{}"/>"#,
            polyline.join(" ")
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::returns::{PortfolioSeries, ValuePoint};
    use crate::domain::statistics::Summary;
    use crate::domain::weights::{WeightPolicy, WeightVector};
    use tempfile::TempDir;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn report(values: &[(u32, f64)]) -> EvaluationReport {
        let values: Vec<ValuePoint> = values
            .iter()
            .map(|&(day, value)| ValuePoint {
                date: d(day),
                value,
            })
            .collect();
        let series = PortfolioSeries {
            base_date: if values.is_empty() { None } else { Some(d(1)) },
            returns: Vec::new(),
            values,
            assets: Vec::new(),
            dropped_dates: Vec::new(),
        };
        EvaluationReport {
            name: "test".into(),
            start_date: d(1),
            end_date: d(31),
            weights: WeightVector::from_pairs([("A", 1.0)])
                .unwrap()
                .normalize(WeightPolicy::default())
                .unwrap(),
            summary: Summary::from_parts(&series.returns, &series.values, 252.0),
            series,
        }
    }

    #[test]
    fn percent_ticks() {
        assert_eq!(format_percent_tick(1.0), "100%");
        assert_eq!(format_percent_tick(0.956), "96%");
        assert_eq!(format_percent_tick(1.2), "120%");
    }

    #[test]
    fn chart_contains_title_axes_and_curve() {
        let svg = render_value_chart(&report(&[(2, 1.1), (3, 0.9)]), ChartSize::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Portfolio value"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-31"));
        assert!(svg.contains('%'));
    }

    #[test]
    fn curve_starts_at_left_edge_with_anchor() {
        let r = report(&[(2, 1.1)]);
        let points = curve_points(&r);
        assert_eq!(points[0], (d(1), 1.0));
        assert_eq!(points.len(), 2);

        let svg = render_value_chart(&r, ChartSize::default());
        assert!(svg.contains("points=\"60.0,"));
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = render_value_chart(&report(&[]), ChartSize::default());
        assert!(svg.contains("No value data available."));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn custom_size_is_used() {
        let size = ChartSize {
            width: 400.0,
            height: 300.0,
            padding: 40.0,
        };
        let svg = render_value_chart(&report(&[(2, 1.0)]), size);
        assert!(svg.contains(r#"width="400" height="300""#));
    }

    #[test]
    fn write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("charts").join("value.svg");
        SvgChartAdapter::default()
            .write(&report(&[(2, 1.05)]), &path)
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }
}
