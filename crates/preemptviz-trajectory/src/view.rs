use crate::record::PositionRecord;

/// Default entity id marking the experiment-area boundary points.
pub const BOUNDARY_EV: &str = "boundary";

/// Map view center derived from the boundary entity's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Computes the map view center from the boundary entity's rows.
///
/// The center is the mean of the distinct latitudes and the mean of the
/// distinct longitudes among rows whose entity id equals `boundary_ev`.
/// Returns `None` when no such rows exist.
///
/// The boundary rows mark reference points, not a vehicle route; whether
/// they are also drawn is the caller's decision.
///
/// # Examples
///
/// ```
/// use preemptviz_trajectory::{record::PositionRecord, view::boundary_center};
///
/// let rows = vec![
///     PositionRecord::new("sp", "boundary", -46.0, -23.0),
///     PositionRecord::new("sp", "boundary", -47.0, -24.0),
///     PositionRecord::new("sp", "vehev1", 0.0, 0.0),
/// ];
/// let center = boundary_center(&rows, "boundary").unwrap();
/// assert_eq!(center.lon, -46.5);
/// assert_eq!(center.lat, -23.5);
/// ```
#[must_use]
pub fn boundary_center(rows: &[PositionRecord], boundary_ev: &str) -> Option<MapCenter> {
    let boundary_rows = || rows.iter().filter(|row| row.ev == boundary_ev);
    let lat = mean_of_distinct(boundary_rows().map(|row| row.lat))?;
    let lon = mean_of_distinct(boundary_rows().map(|row| row.lon))?;
    Some(MapCenter { lat, lon })
}

/// Mean over the distinct values of the sequence, first-appearance order.
/// Duplicated reference points must not skew the center.
#[expect(clippy::cast_precision_loss)]
fn mean_of_distinct<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut distinct: Vec<f64> = vec![];
    for value in values {
        if !distinct.iter().any(|seen| seen.to_bits() == value.to_bits()) {
            distinct.push(value);
        }
    }
    if distinct.is_empty() {
        return None;
    }
    Some(distinct.iter().sum::<f64>() / distinct.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_boundary_points_do_not_skew_the_center() {
        let rows = vec![
            PositionRecord::new("sp", BOUNDARY_EV, 10.0, 0.0),
            PositionRecord::new("sp", BOUNDARY_EV, 10.0, 0.0),
            PositionRecord::new("sp", BOUNDARY_EV, 10.0, 0.0),
            PositionRecord::new("sp", BOUNDARY_EV, 20.0, 4.0),
        ];
        let center = boundary_center(&rows, BOUNDARY_EV).unwrap();
        assert_eq!(center.lon, 15.0);
        assert_eq!(center.lat, 2.0);
    }

    #[test]
    fn missing_boundary_rows_yield_no_center() {
        let rows = vec![PositionRecord::new("sp", "vehev1", 1.0, 2.0)];
        assert!(boundary_center(&rows, BOUNDARY_EV).is_none());
    }

    #[test]
    fn other_entities_are_ignored() {
        let rows = vec![
            PositionRecord::new("sp", BOUNDARY_EV, 0.0, 0.0),
            PositionRecord::new("sp", BOUNDARY_EV, 2.0, 2.0),
            PositionRecord::new("sp", "vehev1", 100.0, 100.0),
        ];
        let center = boundary_center(&rows, BOUNDARY_EV).unwrap();
        assert_eq!(center.lon, 1.0);
        assert_eq!(center.lat, 1.0);
    }
}
