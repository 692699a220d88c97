/// Two-sided 95% critical values of Student's t distribution for degrees of
/// freedom 1 through 30.
const T_CRITICAL_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

/// Normal-distribution limit used beyond the tabulated degrees of freedom.
const T_CRITICAL_95_LIMIT: f64 = 1.960;

fn t_critical_95(degrees_of_freedom: usize) -> f64 {
    assert!(degrees_of_freedom > 0, "t distribution needs at least 1 df");
    T_CRITICAL_95
        .get(degrees_of_freedom - 1)
        .copied()
        .unwrap_or(T_CRITICAL_95_LIMIT)
}

/// Sample mean with a two-sided 95% confidence half-width.
///
/// The half-width is `t * s / sqrt(n)` where `s` is the sample standard
/// deviation (n−1 denominator) and `t` the two-sided 95% Student-t critical
/// value at `n − 1` degrees of freedom. Line and bar graphs use the
/// half-width directly as the error-bar extent.
///
/// # Examples
///
/// ```
/// use preemptviz_stats::confidence::MeanConfidence;
///
/// let confidence = MeanConfidence::from_values([10.0, 12.0, 14.0]).unwrap();
/// assert_eq!(confidence.mean, 12.0);
/// assert_eq!(confidence.count, 3);
///
/// // A single observation has no confidence interval.
/// assert!(MeanConfidence::from_values([10.0]).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanConfidence {
    /// Arithmetic mean of the sample.
    pub mean: f64,
    /// Half-width of the 95% confidence interval around the mean.
    pub half_width: f64,
    /// Number of observations in the sample.
    pub count: usize,
}

impl MeanConfidence {
    /// Computes the mean and confidence half-width of a sample.
    ///
    /// Returns `None` for samples with fewer than two observations, where
    /// the interval is undefined.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let count = values.len();
        if count < 2 {
            return None;
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let sample_variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let standard_error = (sample_variance / n).sqrt();
        let half_width = t_critical_95(count - 1) * standard_error;

        Some(Self {
            mean,
            half_width,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_samples_have_no_interval() {
        assert!(MeanConfidence::from_values([]).is_none());
        assert!(MeanConfidence::from_values([7.5]).is_none());
    }

    #[test]
    fn three_point_sample_matches_hand_computation() {
        // s = 1, se = 1/sqrt(3), t(df=2) = 4.303
        let confidence = MeanConfidence::from_values([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(confidence.mean, 2.0);
        assert_eq!(confidence.count, 3);
        let expected = 4.303 / 3.0_f64.sqrt();
        assert!((confidence.half_width - expected).abs() < 1e-9);
    }

    #[test]
    fn half_width_is_never_negative() {
        let confidence = MeanConfidence::from_values([5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(confidence.half_width, 0.0);
    }

    #[test]
    fn large_samples_use_the_normal_limit() {
        let values = (0..200).map(f64::from);
        let confidence = MeanConfidence::from_values(values).unwrap();
        // With df = 199 the tabulated range is exceeded; the limit applies.
        let n = 200.0_f64;
        let mean = (0.0 + 199.0) / 2.0;
        assert!((confidence.mean - mean).abs() < 1e-9);
        let variance = (0..200)
            .map(|v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let expected = 1.960 * (variance / n).sqrt();
        assert!((confidence.half_width - expected).abs() < 1e-9);
    }
}
