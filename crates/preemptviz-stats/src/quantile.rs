/// Computes the quantile at `fraction` from sorted data, using the midpoint
/// convention.
///
/// For a sorted sequence of length `n`, the quantile rank is
/// `(n - 1) * fraction`. When the rank lands exactly on an order statistic,
/// that value is returned; when it falls between two order statistics, the
/// result is the average of the two bracketing values. This is the midpoint
/// rule, not linear interpolation: the fractional part of the rank does not
/// weight the result.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `fraction` - The quantile to compute (0.0 to 1.0)
///
/// # Returns
///
/// The quantile value. Returns `f64::NAN` if the input is empty.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order or `fraction`
/// is outside `0.0..=1.0`.
///
/// # Examples
///
/// ```
/// use preemptviz_stats::quantile::midpoint_quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
///
/// // Rank 1.75 falls between the order statistics 2.0 and 3.0.
/// assert_eq!(midpoint_quantile(&values, 0.25), 2.5);
/// assert_eq!(midpoint_quantile(&values, 0.5), 4.5);
/// assert_eq!(midpoint_quantile(&values, 0.75), 6.5);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn midpoint_quantile(sorted_values: &[f64], fraction: f64) -> f64 {
    assert!(
        (0.0..=1.0).contains(&fraction),
        "fraction must be within 0.0..=1.0"
    );
    assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );

    if sorted_values.is_empty() {
        return f64::NAN;
    }

    let rank = (sorted_values.len() - 1) as f64 * fraction;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    if below == above {
        sorted_values[below]
    } else {
        (sorted_values[below] + sorted_values[above]) / 2.0
    }
}
