//! Text rendering of metric summaries.

use std::fmt::Write as _;

use crate::MetricSummary;

/// Placeholder shown for values that cannot be displayed.
pub const MISSING: &str = "-";

const HEADERS: [&str; 7] = ["Feature", "Count", "Sum", "Mean", "StdDev", "Min", "Max"];

/// Formats a number with a fixed number of fraction digits and `,`
/// thousands separators, e.g. `1,234.50`. Non-finite values render as
/// [`MISSING`].
#[must_use]
pub fn format_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let fixed = format!("{:.digits$}", value.abs());
    let (integer, fraction) = fixed
        .split_once('.')
        .map_or((fixed.as_str(), None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value.is_sign_negative() && value != 0.0 {
        out.push('-');
    }
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }

    out
}

/// Display cells for one summary row, each value at its metric's precision.
#[must_use]
pub fn row_cells(summary: &MetricSummary) -> [String; 7] {
    let digits = summary.metric.precision();

    #[allow(clippy::cast_precision_loss)]
    let count = summary.count as f64;

    [
        summary.metric.label().to_string(),
        format_number(count, 0),
        format_number(summary.sum, digits),
        format_number(summary.mean, digits),
        format_number(summary.std_dev, digits),
        format_number(summary.min, digits),
        format_number(summary.max, digits),
    ]
}

/// Renders summaries as an aligned plain-text table. The feature column is
/// left-aligned and numeric columns are right-aligned.
#[must_use]
pub fn render_table(summaries: &[MetricSummary]) -> String {
    let rows: Vec<[String; 7]> = summaries.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }

    out
}

fn write_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (cell, &width))| {
            if idx == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();

    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
