use std::collections::BTreeMap;

use geo_types::{Coord, LineString, MultiLineString};
use tracing::warn;

use crate::record::PositionRecord;

/// Grouping key of one trajectory: the scenario and the entity that produced
/// the samples.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrajectoryKey {
    pub scenario: String,
    pub ev: String,
}

/// Line geometry backing a trajectory.
///
/// A trajectory built from one contiguous run of samples is `Simple`; a
/// geometry made of disconnected segments is `Multi`. Consumers must handle
/// each variant explicitly; the parts of a `Multi` geometry are never to be
/// connected to each other.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryGeometry {
    Simple(LineString<f64>),
    Multi(MultiLineString<f64>),
}

impl TrajectoryGeometry {
    /// Connected parts of the geometry, one line string per segment.
    #[must_use]
    pub fn parts(&self) -> &[LineString<f64>] {
        match self {
            TrajectoryGeometry::Simple(line) => std::slice::from_ref(line),
            TrajectoryGeometry::Multi(lines) => &lines.0,
        }
    }
}

/// An ordered route of one entity through one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub key: TrajectoryKey,
    pub geometry: TrajectoryGeometry,
}

impl Trajectory {
    /// Flattens the geometry into a renderer coordinate stream.
    ///
    /// Each part's `(lon, lat)` pairs are followed by a `None` pen-up marker,
    /// so a renderer drawing the stream as one path never joins disconnected
    /// segments with a stray line.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo_types::line_string;
    /// use preemptviz_trajectory::builder::{Trajectory, TrajectoryGeometry, TrajectoryKey};
    ///
    /// let trajectory = Trajectory {
    ///     key: TrajectoryKey {
    ///         scenario: "turin".to_owned(),
    ///         ev: "vehev1".to_owned(),
    ///     },
    ///     geometry: TrajectoryGeometry::Simple(line_string![
    ///         (x: 0.0, y: 0.0),
    ///         (x: 1.0, y: 1.0),
    ///     ]),
    /// };
    /// let stream = trajectory.points_with_breaks();
    /// assert_eq!(stream, vec![Some((0.0, 0.0)), Some((1.0, 1.0)), None]);
    /// ```
    #[must_use]
    pub fn points_with_breaks(&self) -> Vec<Option<(f64, f64)>> {
        let mut stream = vec![];
        for part in self.geometry.parts() {
            stream.extend(part.coords().map(|coord| Some((coord.x, coord.y))));
            stream.push(None);
        }
        stream
    }
}

/// How the builder treats groups that cannot form a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Omit one-point groups from the output, logging a warning.
    #[default]
    Skip,
    /// Fail the whole build on the first one-point group.
    Fail,
}

/// Error for a position group with too few samples to form a line.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("group ({scenario}, {ev}) has {count} point(s), a line needs at least two")]
pub struct DegenerateTrajectoryError {
    pub scenario: String,
    pub ev: String,
    pub count: usize,
}

/// Groups position rows into one trajectory per (scenario, ev) pair.
///
/// Grouping is stable: rows sharing a key keep their original relative
/// order, and samples are never re-sorted by coordinate. Reordering would
/// change the rendered path.
///
/// # Errors
///
/// With [`DegeneratePolicy::Fail`], returns [`DegenerateTrajectoryError`]
/// for the first group holding fewer than two points. With
/// [`DegeneratePolicy::Skip`] such groups are omitted with a warning.
///
/// # Examples
///
/// ```
/// use preemptviz_trajectory::{
///     builder::{DegeneratePolicy, build_trajectories},
///     record::PositionRecord,
/// };
///
/// let rows = vec![
///     PositionRecord::new("a", "x", 0.0, 0.0),
///     PositionRecord::new("a", "x", 1.0, 1.0),
///     PositionRecord::new("a", "y", 5.0, 5.0),
/// ];
///
/// // The one-point group (a, y) is skipped.
/// let trajectories = build_trajectories(&rows, DegeneratePolicy::Skip).unwrap();
/// assert_eq!(trajectories.len(), 1);
///
/// // Or reported, under the strict policy.
/// let err = build_trajectories(&rows, DegeneratePolicy::Fail).unwrap_err();
/// assert_eq!(err.ev, "y");
/// ```
pub fn build_trajectories(
    rows: &[PositionRecord],
    policy: DegeneratePolicy,
) -> Result<BTreeMap<TrajectoryKey, Trajectory>, DegenerateTrajectoryError> {
    let mut groups: BTreeMap<TrajectoryKey, Vec<Coord<f64>>> = BTreeMap::new();
    for row in rows {
        let key = TrajectoryKey {
            scenario: row.scenario.clone(),
            ev: row.ev.clone(),
        };
        groups.entry(key).or_default().push(Coord {
            x: row.lon,
            y: row.lat,
        });
    }

    let mut trajectories = BTreeMap::new();
    for (key, points) in groups {
        if points.len() < 2 {
            match policy {
                DegeneratePolicy::Skip => {
                    warn!(
                        scenario = %key.scenario,
                        ev = %key.ev,
                        "skipping trajectory group with fewer than two points"
                    );
                    continue;
                }
                DegeneratePolicy::Fail => {
                    return Err(DegenerateTrajectoryError {
                        scenario: key.scenario,
                        ev: key.ev,
                        count: points.len(),
                    });
                }
            }
        }
        let geometry = TrajectoryGeometry::Simple(LineString::from(points));
        trajectories.insert(key.clone(), Trajectory { key, geometry });
    }
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(scenario: &str, ev: &str) -> TrajectoryKey {
        TrajectoryKey {
            scenario: scenario.to_owned(),
            ev: ev.to_owned(),
        }
    }

    #[test]
    fn groups_by_scenario_and_entity() {
        let rows = vec![
            PositionRecord::new("a", "x", 0.0, 0.0),
            PositionRecord::new("a", "x", 1.0, 1.0),
            PositionRecord::new("a", "y", 5.0, 5.0),
            PositionRecord::new("a", "y", 6.0, 6.0),
        ];
        let trajectories = build_trajectories(&rows, DegeneratePolicy::Skip).unwrap();

        assert_eq!(trajectories.len(), 2);
        let x = &trajectories[&key("a", "x")];
        assert_eq!(
            x.points_with_breaks(),
            vec![Some((0.0, 0.0)), Some((1.0, 1.0)), None]
        );
    }

    #[test]
    fn point_order_follows_row_order() {
        // Coordinates deliberately not monotonic; re-sorting would corrupt
        // the driving direction.
        let rows = vec![
            PositionRecord::new("a", "x", 2.0, 2.0),
            PositionRecord::new("a", "x", 0.0, 0.0),
            PositionRecord::new("a", "x", 1.0, 1.0),
        ];
        let trajectories = build_trajectories(&rows, DegeneratePolicy::Skip).unwrap();
        let stream = trajectories[&key("a", "x")].points_with_breaks();
        assert_eq!(
            stream,
            vec![Some((2.0, 2.0)), Some((0.0, 0.0)), Some((1.0, 1.0)), None]
        );
    }

    #[test]
    fn interleaved_groups_stay_stable() {
        let interleaved = vec![
            PositionRecord::new("a", "x", 0.0, 0.0),
            PositionRecord::new("a", "y", 9.0, 9.0),
            PositionRecord::new("a", "x", 1.0, 1.0),
            PositionRecord::new("a", "y", 8.0, 8.0),
        ];
        let separated = vec![
            PositionRecord::new("a", "y", 9.0, 9.0),
            PositionRecord::new("a", "y", 8.0, 8.0),
            PositionRecord::new("a", "x", 0.0, 0.0),
            PositionRecord::new("a", "x", 1.0, 1.0),
        ];
        let from_interleaved = build_trajectories(&interleaved, DegeneratePolicy::Skip).unwrap();
        let from_separated = build_trajectories(&separated, DegeneratePolicy::Skip).unwrap();
        assert_eq!(from_interleaved, from_separated);
    }

    #[test]
    fn degenerate_group_is_skipped_or_fatal() {
        let rows = vec![
            PositionRecord::new("a", "x", 0.0, 0.0),
            PositionRecord::new("a", "x", 1.0, 1.0),
            PositionRecord::new("a", "y", 5.0, 5.0),
        ];

        let skipped = build_trajectories(&rows, DegeneratePolicy::Skip).unwrap();
        assert_eq!(skipped.len(), 1);
        assert!(!skipped.contains_key(&key("a", "y")));

        let err = build_trajectories(&rows, DegeneratePolicy::Fail).unwrap_err();
        assert_eq!(err.scenario, "a");
        assert_eq!(err.ev, "y");
        assert_eq!(err.count, 1);
    }

    #[test]
    fn multi_part_geometry_breaks_after_every_part() {
        let trajectory = Trajectory {
            key: key("a", "x"),
            geometry: TrajectoryGeometry::Multi(MultiLineString(vec![
                LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
                LineString::from(vec![(5.0, 5.0), (6.0, 6.0)]),
            ])),
        };
        let stream = trajectory.points_with_breaks();
        assert_eq!(stream.iter().filter(|point| point.is_none()).count(), 2);
        assert_eq!(stream[2], None);
        assert_eq!(stream[5], None);
    }
}
