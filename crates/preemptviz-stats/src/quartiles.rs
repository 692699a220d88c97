use crate::quantile::midpoint_quantile;

/// Error returned when a quartile summary is requested for an empty sample
/// set.
///
/// Raised before any computation; callers are expected to skip such groups.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("cannot summarize empty sample set for '{label}'")]
pub struct EmptySampleError {
    /// Group label the empty sample belonged to.
    pub label: String,
}

/// Five-number summary of a metric sample with Tukey whisker fences.
///
/// Quartiles use the midpoint quantile convention. The fences start from the
/// usual `q1 - 1.5*IQR` / `q3 + 1.5*IQR` candidates and are then adjusted to
/// the nearest real observation inside them, matching box-plot whisker
/// placement. The observed extremes are flagged as outliers only when they
/// lie strictly beyond the adjusted fences.
///
/// The summary is immutable and computed on demand; it feeds both chart
/// overlays and table rows.
///
/// # Examples
///
/// ```
/// use preemptviz_stats::quartiles::QuartileSummary;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let summary = QuartileSummary::from_values(values, "EV1").unwrap();
///
/// // The upper whisker snaps back to 5.0, leaving 100.0 outside.
/// assert_eq!(summary.upper_fence, 5.0);
/// assert!(summary.max_is_outlier);
/// assert!(!summary.min_is_outlier);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileSummary {
    /// Display label of the summarized group.
    pub label: String,
    /// Observed minimum of the sample.
    pub min: f64,
    /// Observed maximum of the sample.
    pub max: f64,
    /// Lower whisker: smallest observation at or above `q1 - 1.5*IQR`.
    pub lower_fence: f64,
    /// First quartile (midpoint convention).
    pub q1: f64,
    /// Median (midpoint convention).
    pub median: f64,
    /// Third quartile (midpoint convention).
    pub q3: f64,
    /// Upper whisker: largest observation at or below `q3 + 1.5*IQR`.
    pub upper_fence: f64,
    /// `true` when the minimum lies strictly below the lower whisker.
    pub min_is_outlier: bool,
    /// `true` when the maximum lies strictly above the upper whisker.
    pub max_is_outlier: bool,
}

impl QuartileSummary {
    /// Summarizes an unsorted sample.
    ///
    /// The values are sorted internally; the input is not mutated and the
    /// computation has no hidden state, so repeated calls on the same input
    /// yield identical summaries.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySampleError`] when `values` yields no elements.
    pub fn from_values<I>(values: I, label: &str) -> Result<Self, EmptySampleError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, label)
    }

    /// Summarizes a pre-sorted sample, skipping the sorting step.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySampleError`] when `sorted_values` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64], label: &str) -> Result<Self, EmptySampleError> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Err(EmptySampleError {
                label: label.to_owned(),
            });
        };

        let q1 = midpoint_quantile(sorted_values, 0.25);
        let median = midpoint_quantile(sorted_values, 0.5);
        let q3 = midpoint_quantile(sorted_values, 0.75);

        let iqr = q3 - q1;
        let lower_candidate = q1 - 1.5 * iqr;
        let upper_candidate = q3 + 1.5 * iqr;

        // Whiskers snap to the nearest observation inside the candidate
        // fences; with no such observation they fall back to the extremes.
        // Clamped against the quartiles so a whisker never falls inside the
        // box, which tiny samples with a zero IQR would otherwise allow.
        let lower_fence = sorted_values
            .iter()
            .copied()
            .find(|value| *value >= lower_candidate)
            .unwrap_or(min)
            .min(q1);
        let upper_fence = sorted_values
            .iter()
            .rev()
            .copied()
            .find(|value| *value <= upper_candidate)
            .unwrap_or(max)
            .max(q3);

        Ok(Self {
            label: label.to_owned(),
            min,
            max,
            lower_fence,
            q1,
            median,
            q3,
            upper_fence,
            min_is_outlier: min < lower_fence,
            max_is_outlier: max > upper_fence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_point_sample_uses_midpoint_quartiles() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let summary = QuartileSummary::from_values(values, "g").unwrap();

        assert_eq!(summary.q1, 2.5);
        assert_eq!(summary.median, 4.5);
        assert_eq!(summary.q3, 6.5);
        // Candidates -3.5 and 12.5 snap back to the observed extremes.
        assert_eq!(summary.lower_fence, 1.0);
        assert_eq!(summary.upper_fence, 8.0);
        assert!(!summary.min_is_outlier);
        assert!(!summary.max_is_outlier);
    }

    #[test]
    fn extreme_maximum_is_flagged() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = QuartileSummary::from_values(values, "g").unwrap();

        assert_eq!(summary.q1, 2.5);
        assert_eq!(summary.q3, 4.5);
        assert_eq!(summary.upper_fence, 5.0);
        assert_eq!(summary.max, 100.0);
        assert!(summary.max_is_outlier);
        assert!(!summary.min_is_outlier);
    }

    #[test]
    fn ordering_invariants_hold() {
        let values = [4.0, 1.0, 7.0, 2.0, 9.0, 3.0, 8.0];
        let summary = QuartileSummary::from_values(values, "g").unwrap();

        assert!(summary.q1 <= summary.median);
        assert!(summary.median <= summary.q3);
        assert!(summary.lower_fence <= summary.q1);
        assert!(summary.upper_fence >= summary.q3);
    }

    #[test]
    fn all_equal_values_collapse_without_outliers() {
        let values = [5.0; 7];
        let summary = QuartileSummary::from_values(values, "g").unwrap();

        assert_eq!(summary.q1, 5.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.q3, 5.0);
        assert_eq!(summary.lower_fence, 5.0);
        assert_eq!(summary.upper_fence, 5.0);
        assert!(!summary.min_is_outlier);
        assert!(!summary.max_is_outlier);
    }

    #[test]
    fn single_value_collapses_without_outliers() {
        let summary = QuartileSummary::from_values([3.25], "g").unwrap();

        assert_eq!(summary.min, 3.25);
        assert_eq!(summary.max, 3.25);
        assert_eq!(summary.median, 3.25);
        assert_eq!(summary.lower_fence, 3.25);
        assert_eq!(summary.upper_fence, 3.25);
        assert!(!summary.min_is_outlier);
        assert!(!summary.max_is_outlier);
    }

    #[test]
    fn two_point_sample_keeps_fences_outside_the_box() {
        // Zero IQR puts both fence candidates at the midpoint; neither
        // observation sits on it, so the fences clamp to the quartiles.
        let summary = QuartileSummary::from_values([1.0, 2.0], "g").unwrap();
        assert_eq!(summary.q1, 1.5);
        assert_eq!(summary.q3, 1.5);
        assert!(summary.lower_fence <= summary.q1);
        assert!(summary.upper_fence >= summary.q3);
    }

    #[test]
    fn empty_sample_is_an_error() {
        let err = QuartileSummary::from_values([], "EV2").unwrap_err();
        assert_eq!(err.label, "EV2");
    }

    #[test]
    fn summarization_is_idempotent() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let first = QuartileSummary::from_values(values, "g").unwrap();
        let second = QuartileSummary::from_values(values, "g").unwrap();
        assert_eq!(first, second);
    }
}
