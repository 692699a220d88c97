use std::iter;

use preemptviz_stats::quartiles::QuartileSummary;

use crate::{
    dataset::{ExperimentTable, without_lowest},
    labels::{LabelCatalog, UnknownLabelError},
};

/// One box of a box plot, carrying the full quartile record so the same
/// data feeds both the drawing and the table output.
#[derive(Debug, Clone)]
pub struct LabeledBox {
    /// Category position on the x axis (entity display name).
    pub category: String,
    pub summary: QuartileSummary,
}

/// Box plot of one metric for a single algorithm, one box per entity.
#[derive(Debug, Clone)]
pub struct BoxPlotFigure {
    pub title: String,
    pub y_label: String,
    pub boxes: Vec<LabeledBox>,
}

impl BoxPlotFigure {
    /// Quartile records of all boxes, for table output.
    pub fn summaries(&self) -> impl Iterator<Item = &QuartileSummary> {
        self.boxes.iter().map(|labeled| &labeled.summary)
    }
}

/// One algorithm's trace within a grouped box plot.
#[derive(Debug, Clone)]
pub struct BoxTraceGroup {
    /// Algorithm display name.
    pub name: String,
    /// One entry per category; `None` where the (algorithm, entity) cell has
    /// no samples.
    pub boxes: Vec<Option<QuartileSummary>>,
}

/// Grouped box plot of one metric: one trace per algorithm, one box per
/// entity inside each trace.
#[derive(Debug, Clone)]
pub struct GroupedBoxPlotFigure {
    pub title: String,
    pub y_label: String,
    /// Entity display names forming the x axis categories.
    pub categories: Vec<String>,
    pub traces: Vec<BoxTraceGroup>,
}

impl GroupedBoxPlotFigure {
    /// Quartile records of all non-empty cells, trace by trace.
    pub fn summaries(&self) -> impl Iterator<Item = &QuartileSummary> {
        self.traces
            .iter()
            .flat_map(|trace| trace.boxes.iter().flatten())
    }
}

/// Builds the per-entity box plot of `metric` for one algorithm (the
/// study's baseline figures use the no-preemption runs).
///
/// Entities appear in sorted id order. Each cell's values are filtered
/// non-null, stripped of their lowest observation, and summarized; empty
/// cells produce no box.
///
/// # Errors
///
/// Returns [`UnknownLabelError`] when the metric or an entity id has no
/// catalog entry.
pub fn box_plot(
    table: &ExperimentTable,
    catalog: &LabelCatalog,
    metric: &str,
    alg: &str,
    title: String,
) -> Result<BoxPlotFigure, UnknownLabelError> {
    let y_label = catalog.metric(metric)?.to_owned();

    let mut boxes = vec![];
    for ev in table.sorted_evs() {
        let ev_name = catalog.entity(&ev)?;
        let values = without_lowest(&table.metric_values(alg, &ev, metric));
        let Ok(summary) = QuartileSummary::from_values(values, ev_name) else {
            continue;
        };
        boxes.push(LabeledBox {
            category: ev_name.to_owned(),
            summary,
        });
    }

    Ok(BoxPlotFigure {
        title,
        y_label,
        boxes,
    })
}

/// Builds the grouped box plot of `metric` across algorithms and entities.
///
/// Traces follow the catalog's algorithm order; algorithms absent from the
/// table are skipped. Within each trace there is one box per entity, with
/// the same sample selection as [`box_plot`]; empty cells stay `None`.
///
/// # Errors
///
/// Returns [`UnknownLabelError`] when the metric, an entity id, or an
/// algorithm id has no catalog entry.
pub fn grouped_box_plot(
    table: &ExperimentTable,
    catalog: &LabelCatalog,
    metric: &str,
    title: String,
) -> Result<GroupedBoxPlotFigure, UnknownLabelError> {
    let y_label = catalog.metric(metric)?.to_owned();

    let evs = table.sorted_evs();
    let mut categories = vec![];
    for ev in &evs {
        categories.push(catalog.entity(ev)?.to_owned());
    }

    let available = table.algs();
    let mut traces = vec![];
    for alg in catalog.ordered_algorithms(&available) {
        let name = catalog.algorithm(alg)?.to_owned();
        let mut boxes = vec![];
        for (ev, ev_name) in iter::zip(&evs, &categories) {
            let values = without_lowest(&table.metric_values(alg, ev, metric));
            boxes.push(QuartileSummary::from_values(values, ev_name).ok());
        }
        traces.push(BoxTraceGroup { name, boxes });
    }

    Ok(GroupedBoxPlotFigure {
        title,
        y_label,
        categories,
        traces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Locale;

    const CSV: &str = "\
ev,alg,tl
vehev1,no-preemption,10.0
vehev1,no-preemption,12.0
vehev1,no-preemption,11.0
vehev1,no-preemption,14.0
vehev2,no-preemption,20.0
vehev2,no-preemption,22.0
vehev2,no-preemption,21.0
vehev1,rfid,5.0
vehev1,rfid,6.0
vehev1,rfid,4.0
";

    fn fixtures() -> (ExperimentTable, LabelCatalog) {
        let table = ExperimentTable::from_reader(CSV.as_bytes()).unwrap();
        (table, LabelCatalog::builtin(Locale::En))
    }

    #[test]
    fn box_plot_summarizes_each_entity() {
        let (table, catalog) = fixtures();
        let figure = box_plot(&table, &catalog, "tl", "no-preemption", "t".to_owned()).unwrap();

        assert_eq!(figure.y_label, "Time-Loss (s)");
        assert_eq!(figure.boxes.len(), 2);
        assert_eq!(figure.boxes[0].category, "EV1");
        // The lowest of {10, 11, 12, 14} is dropped before summarization.
        assert_eq!(figure.boxes[0].summary.min, 11.0);
        assert_eq!(figure.boxes[0].summary.median, 12.0);
    }

    #[test]
    fn box_plot_skips_entities_without_samples() {
        let (table, catalog) = fixtures();
        // vehev2 has no rfid rows; only vehev1 gets a box.
        let figure = box_plot(&table, &catalog, "tl", "rfid", "t".to_owned()).unwrap();
        assert_eq!(figure.boxes.len(), 1);
        assert_eq!(figure.boxes[0].category, "EV1");
    }

    #[test]
    fn grouped_box_plot_orders_traces_and_keeps_empty_cells() {
        let (table, catalog) = fixtures();
        let figure = grouped_box_plot(&table, &catalog, "tl", "t".to_owned()).unwrap();

        assert_eq!(figure.categories, vec!["EV1", "EV2"]);
        // Catalog order puts rfid before no-preemption.
        assert_eq!(figure.traces[0].name, "RFId");
        assert_eq!(figure.traces[1].name, "No Preemption");
        assert!(figure.traces[0].boxes[0].is_some());
        assert!(figure.traces[0].boxes[1].is_none());
        assert_eq!(figure.summaries().count(), 3);
    }

    #[test]
    fn unknown_metric_is_fatal_to_the_call() {
        let (table, catalog) = fixtures();
        let err = box_plot(&table, &catalog, "nope", "rfid", "t".to_owned()).unwrap_err();
        assert_eq!(err.key, "nope");
    }
}
