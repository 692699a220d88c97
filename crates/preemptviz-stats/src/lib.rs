//! Statistical summarization for the preemption study.
//!
//! This crate provides the numeric building blocks shared by the chart and
//! table generators:
//!
//! - **Quantiles**: the midpoint quantile convention used throughout the study
//! - **Quartile summaries**: five-number summaries with Tukey whisker fences
//!   adjusted to the nearest real observation, plus outlier flags
//! - **Mean confidence**: per-group means with two-sided 95% Student-t
//!   confidence half-widths for error bars
//!
//! # Modules
//!
//! - [`quantile`]: quantile computation over sorted samples
//! - [`quartiles`]: box-plot statistics and outlier detection
//! - [`confidence`]: confidence intervals around sample means
//!
//! # Examples
//!
//! ## Summarizing a metric sample
//!
//! ```
//! use preemptviz_stats::quartiles::QuartileSummary;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let summary = QuartileSummary::from_values(values, "EV1").unwrap();
//! assert_eq!(summary.median, 4.5);
//! assert_eq!(summary.q1, 2.5);
//! assert_eq!(summary.q3, 6.5);
//! ```
//!
//! ## Computing an error bar
//!
//! ```
//! use preemptviz_stats::confidence::MeanConfidence;
//!
//! let confidence = MeanConfidence::from_values([1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(confidence.mean, 2.0);
//! assert!(confidence.half_width > 0.0);
//! ```

pub mod confidence;
pub mod quantile;
pub mod quartiles;
