//! Plain-text summary printed to stdout.

use crate::domain::evaluation::EvaluationReport;
use crate::domain::statistics::Summary;

/// The three headline lines: final value, risk-adjusted ratio, drawdown.
pub fn format_summary(summary: &Summary) -> String {
    let sharpe = summary
        .sharpe_ratio
        .map(|s| format!("{s:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Portfolio value: {:.2}%\nAnnualized Sharpe ratio: {}\nMax drawdown: {:.2}%\n",
        summary.final_value * 100.0,
        sharpe,
        summary.max_drawdown * 100.0,
    )
}

/// Headline lines plus holdings and secondary figures.
pub fn format_detailed(report: &EvaluationReport) -> String {
    let s = &report.summary;
    let mut out = format_summary(s);

    out.push_str(&format!(
        "\nWindow:           {} to {}\n",
        report.start_date, report.end_date
    ));
    out.push_str(&format!("Observations:     {}\n", s.observations));
    if !report.series.dropped_dates.is_empty() {
        out.push_str(&format!(
            "Dropped dates:    {}\n",
            report.series.dropped_dates.len()
        ));
    }
    out.push_str(&format!("Total Return:     {:.2}%\n", s.total_return * 100.0));
    match s.annualized_volatility {
        Some(v) => out.push_str(&format!("Volatility (ann): {:.2}%\n", v * 100.0)),
        None => out.push_str("Volatility (ann): n/a\n"),
    }
    out.push_str(&format!(
        "Drawdown length:  {} days\n",
        s.max_drawdown_duration
    ));

    out.push_str("\n=== Holdings ===\n");
    for h in report.weights.holdings() {
        out.push_str(&format!("  {:<8} {:>7.2}%\n", h.symbol, h.weight * 100.0));
    }
    out
}
