use preemptviz_trajectory::{
    builder::{DegeneratePolicy, DegenerateTrajectoryError, build_trajectories},
    record::PositionRecord,
    view::{MapCenter, boundary_center},
};

use crate::labels::{LabelCatalog, UnknownLabelError};

/// Errors from route map construction.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RouteMapError {
    /// No rows of the boundary entity exist to center the view on.
    #[display("no '{boundary_ev}' rows to center the map view on")]
    #[from(ignore)]
    MissingBoundary { boundary_ev: String },
    /// An entity id had no display name.
    #[display("{_0}")]
    Label(#[error(source)] UnknownLabelError),
    /// A one-point group was found under the strict policy.
    #[display("{_0}")]
    Degenerate(#[error(source)] DegenerateTrajectoryError),
}

/// One drawable route: a display name and a coordinate stream where `None`
/// is the pen-up marker between disconnected parts.
#[derive(Debug, Clone)]
pub struct RoutePath {
    pub name: String,
    pub points: Vec<Option<(f64, f64)>>,
}

/// Route map figure: per-trajectory polylines around a boundary-derived
/// view center.
#[derive(Debug, Clone)]
pub struct RouteMapFigure {
    pub title: String,
    pub center: MapCenter,
    pub zoom: f64,
    pub paths: Vec<RoutePath>,
}

/// Builds the route map figure for `rows`.
///
/// Rows are grouped into trajectories per (scenario, ev); the boundary
/// entity's rows only center the view and are not drawn. Numeric entity
/// ids are labeled verbatim, others through the catalog.
///
/// # Errors
///
/// Returns [`RouteMapError::MissingBoundary`] when no boundary rows exist,
/// [`RouteMapError::Label`] for an unknown entity id, and
/// [`RouteMapError::Degenerate`] for one-point groups under
/// [`DegeneratePolicy::Fail`].
pub fn route_map(
    rows: &[PositionRecord],
    catalog: &LabelCatalog,
    boundary_ev: &str,
    policy: DegeneratePolicy,
    zoom: f64,
    title: String,
) -> Result<RouteMapFigure, RouteMapError> {
    let center =
        boundary_center(rows, boundary_ev).ok_or_else(|| RouteMapError::MissingBoundary {
            boundary_ev: boundary_ev.to_owned(),
        })?;

    let drawable: Vec<PositionRecord> = rows
        .iter()
        .filter(|row| row.ev != boundary_ev)
        .cloned()
        .collect();
    let trajectories = build_trajectories(&drawable, policy)?;

    let mut paths = vec![];
    for (key, trajectory) in &trajectories {
        let name = catalog.map_entity(&key.ev)?;
        paths.push(RoutePath {
            name,
            points: trajectory.points_with_breaks(),
        });
    }

    Ok(RouteMapFigure {
        title,
        center,
        zoom,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Locale;

    fn rows() -> Vec<PositionRecord> {
        vec![
            PositionRecord::new("sp", "boundary", -46.0, -23.0),
            PositionRecord::new("sp", "boundary", -47.0, -24.0),
            PositionRecord::new("sp", "vehev1", -46.2, -23.2),
            PositionRecord::new("sp", "vehev1", -46.3, -23.3),
            PositionRecord::new("sp", "11651", -46.4, -23.4),
            PositionRecord::new("sp", "11651", -46.5, -23.5),
        ]
    }

    #[test]
    fn boundary_rows_center_the_view_but_are_not_drawn() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let figure = route_map(
            &rows(),
            &catalog,
            "boundary",
            DegeneratePolicy::Skip,
            11.0,
            "t".to_owned(),
        )
        .unwrap();

        assert_eq!(figure.center.lon, -46.5);
        assert_eq!(figure.center.lat, -23.5);
        assert_eq!(figure.paths.len(), 2);
        assert!(figure.paths.iter().all(|path| path.name != "Experiment Area"));
    }

    #[test]
    fn numeric_entities_keep_their_id_as_name() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let figure = route_map(
            &rows(),
            &catalog,
            "boundary",
            DegeneratePolicy::Skip,
            11.0,
            "t".to_owned(),
        )
        .unwrap();

        let mut names: Vec<&str> = figure.paths.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["11651", "EV1"]);
    }

    #[test]
    fn missing_boundary_is_an_error() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let only_vehicles = vec![
            PositionRecord::new("sp", "vehev1", 0.0, 0.0),
            PositionRecord::new("sp", "vehev1", 1.0, 1.0),
        ];
        let err = route_map(
            &only_vehicles,
            &catalog,
            "boundary",
            DegeneratePolicy::Skip,
            11.0,
            "t".to_owned(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteMapError::MissingBoundary { .. }));
    }

    #[test]
    fn strict_policy_propagates_degenerate_groups() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let mut with_stub = rows();
        with_stub.push(PositionRecord::new("sp", "vehev2", 0.0, 0.0));
        let err = route_map(
            &with_stub,
            &catalog,
            "boundary",
            DegeneratePolicy::Fail,
            11.0,
            "t".to_owned(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteMapError::Degenerate(_)));
    }
}
