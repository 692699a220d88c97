use std::io;

use preemptviz_stats::quartiles::QuartileSummary;

use crate::number::NumberFormat;

/// Placeholder for the min/max columns when the observation stays inside
/// the whiskers.
pub const NO_OUTLIER: &str = " - ";

/// Renders one LaTeX table row for a quartile record.
///
/// Columns: label, outlier minimum, lower whisker, Q1, median, Q3, upper
/// whisker, outlier maximum. All numeric fields carry two grouped decimals;
/// the min/max columns show [`NO_OUTLIER`] unless the observation falls
/// beyond the whisker; the row ends with the LaTeX row terminator.
///
/// # Examples
///
/// ```
/// use preemptviz_report::{number::NumberFormat, table::quartile_row};
/// use preemptviz_stats::quartiles::QuartileSummary;
///
/// let summary =
///     QuartileSummary::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 100.0], "EV1").unwrap();
/// let row = quartile_row(&summary, NumberFormat::EN);
/// assert_eq!(
///     row,
///     "EV1 &  -  & 1.00 & 2.50 & 3.50 & 4.50 & 5.00 & 100.00 \\\\"
/// );
/// ```
#[must_use]
pub fn quartile_row(summary: &QuartileSummary, fmt: NumberFormat) -> String {
    let min = if summary.min_is_outlier {
        fmt.format(summary.min, 2)
    } else {
        NO_OUTLIER.to_owned()
    };
    let max = if summary.max_is_outlier {
        fmt.format(summary.max, 2)
    } else {
        NO_OUTLIER.to_owned()
    };
    format!(
        "{} & {} & {} & {} & {} & {} & {} & {} \\\\",
        summary.label,
        min,
        fmt.format(summary.lower_fence, 2),
        fmt.format(summary.q1, 2),
        fmt.format(summary.median, 2),
        fmt.format(summary.q3, 2),
        fmt.format(summary.upper_fence, 2),
        max,
    )
}

/// Writes one quartile row per summary to `writer`.
///
/// # Errors
///
/// Propagates the underlying write error.
pub fn write_quartile_table<W>(
    writer: &mut W,
    summaries: &[QuartileSummary],
    fmt: NumberFormat,
) -> io::Result<()>
where
    W: io::Write,
{
    for summary in summaries {
        writeln!(writer, "{}", quartile_row(summary, fmt))?;
    }
    Ok(())
}
