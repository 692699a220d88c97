use std::{collections::BTreeMap, fs::File, io, path::Path};

use preemptviz_stats::confidence::MeanConfidence;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{ExperimentRow, ExperimentTable},
    labels::{LabelCatalog, UnknownLabelError},
};

/// Simulation instance number → vehicle count, the x axis of the
/// instance-scaled line and bar graphs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstanceCounts(pub BTreeMap<u32, f64>);

impl InstanceCounts {
    /// Vehicle counts of the synthetic São Paulo network instances.
    #[must_use]
    pub fn synth_sp() -> Self {
        Self(
            [
                (1, 7016.0),
                (2, 12842.0),
                (3, 17500.0),
                (4, 22154.0),
                (5, 25882.0),
            ]
            .into_iter()
            .collect(),
        )
    }

    /// Vehicle counts of the synthetic New York network instances.
    #[must_use]
    pub fn synth_ny() -> Self {
        Self(
            [
                (1, 4265.0),
                (2, 7789.0),
                (3, 10799.0),
                (4, 13622.0),
                (5, 16454.0),
            ]
            .into_iter()
            .collect(),
        )
    }

    /// Loads an instance→count map from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened, or a JSON error
    /// wrapped in `io::Error` when it cannot be parsed.
    pub fn from_path<P>(path: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(io::Error::from)
    }
}

/// One x position of a series: the instance's vehicle count and the metric
/// mean with its 95% confidence half-width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub mean: f64,
    pub half_width: f64,
}

/// A named series of mean±confidence points.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

/// Line graph of per-instance metric means with confidence error bars.
#[derive(Debug, Clone)]
pub struct LineGraphFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Grouped bar graph of per-instance means, one bar group per algorithm.
#[derive(Debug, Clone)]
pub struct BarGraphFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Builds the line graph of one or more metrics over instance size.
///
/// Teleported runs are excluded. Each metric becomes one series; the y axis
/// is labeled after the first metric. Instances whose cells hold fewer than
/// two observations produce no point.
///
/// # Errors
///
/// Returns [`UnknownLabelError`] when a metric has no catalog entry.
pub fn line_graph(
    table: &ExperimentTable,
    catalog: &LabelCatalog,
    counts: &InstanceCounts,
    metrics: &[&str],
    title: String,
) -> Result<LineGraphFigure, UnknownLabelError> {
    let rows: Vec<&ExperimentRow> = table.rows.iter().filter(|row| !row.teleported()).collect();

    let mut series = vec![];
    for &metric in metrics {
        let name = catalog.metric(metric)?.to_owned();
        series.push(instance_series(&rows, counts, metric, name));
    }

    Ok(LineGraphFigure {
        title,
        x_label: catalog.metric("n_vehicles")?.to_owned(),
        y_label: series.first().map(|s| s.name.clone()).unwrap_or_default(),
        series,
    })
}

/// Builds the grouped bar graph of `metric` per algorithm over instance
/// size.
///
/// Bars follow the catalog's algorithm order; algorithms absent from the
/// table, or with no plottable points, are skipped.
///
/// # Errors
///
/// Returns [`UnknownLabelError`] when the metric or an algorithm id has no
/// catalog entry.
pub fn bar_graph(
    table: &ExperimentTable,
    catalog: &LabelCatalog,
    counts: &InstanceCounts,
    metric: &str,
    title: String,
) -> Result<BarGraphFigure, UnknownLabelError> {
    let available = table.algs();

    let mut series = vec![];
    for alg in catalog.ordered_algorithms(&available) {
        let name = catalog.algorithm(alg)?.to_owned();
        let rows: Vec<&ExperimentRow> = table.rows.iter().filter(|row| row.alg == alg).collect();
        let alg_series = instance_series(&rows, counts, metric, name);
        if !alg_series.points.is_empty() {
            series.push(alg_series);
        }
    }

    Ok(BarGraphFigure {
        title,
        x_label: catalog.metric("n_vehicles")?.to_owned(),
        y_label: catalog.metric(metric)?.to_owned(),
        series,
    })
}

fn instance_series(
    rows: &[&ExperimentRow],
    counts: &InstanceCounts,
    metric: &str,
    name: String,
) -> Series {
    let mut points = vec![];
    for (&instance, &x) in &counts.0 {
        let values = rows
            .iter()
            .filter(|row| row.instance() == Some(instance))
            .filter_map(|row| row.metric(metric));
        let Some(confidence) = MeanConfidence::from_values(values) else {
            continue;
        };
        points.push(SeriesPoint {
            x,
            mean: confidence.mean,
            half_width: confidence.half_width,
        });
    }
    Series { name, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Locale;

    const CSV: &str = "\
alg,instance,tl,perc,teleported
rfid,1,10.0,50.0,False
rfid,1,12.0,54.0,False
rfid,1,11.0,52.0,False
rfid,2,20.0,40.0,False
rfid,2,22.0,44.0,False
allgreen,1,30.0,10.0,False
allgreen,1,34.0,14.0,False
rfid,1,99.0,99.0,True
";

    fn fixtures() -> (ExperimentTable, LabelCatalog, InstanceCounts) {
        let table = ExperimentTable::from_reader(CSV.as_bytes()).unwrap();
        let counts = InstanceCounts([(1, 1000.0), (2, 2000.0)].into_iter().collect());
        (table, LabelCatalog::builtin(Locale::En), counts)
    }

    #[test]
    fn line_graph_excludes_teleported_runs() {
        let (table, catalog, counts) = fixtures();
        let figure = line_graph(&table, &catalog, &counts, &["tl"], "t".to_owned()).unwrap();

        assert_eq!(figure.series.len(), 1);
        let points = &figure.series[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 1000.0);
        // Mean of {10, 11, 12, 30, 34} at instance 1; the teleported 99.0
        // row is excluded.
        assert!((points[0].mean - 19.4).abs() < 1e-9);
        assert!(points[0].half_width > 0.0);
    }

    #[test]
    fn bar_graph_groups_by_algorithm_in_catalog_order() {
        let (table, catalog, counts) = fixtures();
        let figure = bar_graph(&table, &catalog, &counts, "perc", "t".to_owned()).unwrap();

        assert_eq!(figure.series.len(), 2);
        assert_eq!(figure.series[0].name, "RFId");
        assert_eq!(figure.series[1].name, "All Green");
        // rfid has points at both instances, allgreen only at the first.
        assert_eq!(figure.series[0].points.len(), 2);
        assert_eq!(figure.series[1].points.len(), 1);
        assert_eq!(figure.y_label, "Time-Loss Improvement (%)");
    }

    #[test]
    fn undersized_instances_produce_no_point() {
        let (table, catalog, _) = fixtures();
        // Instance 3 has no rows at all; instance 2 has two.
        let counts = InstanceCounts([(2, 2000.0), (3, 3000.0)].into_iter().collect());
        let figure = line_graph(&table, &catalog, &counts, &["tl"], "t".to_owned()).unwrap();
        assert_eq!(figure.series[0].points.len(), 1);
    }
}
